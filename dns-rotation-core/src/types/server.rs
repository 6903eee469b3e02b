//! 服务器相关类型

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;

use super::{ClusterId, ClusterInfo, cluster_info};

/// Server identifier, unique within an inventory.
pub type ServerId = u32;

/// One server of the fleet.
///
/// `name` and `cluster_name` are derived from the cluster table and the
/// per-cluster ordinal. Only `dns` changes after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server {
    id: ServerId,
    cluster: &'static ClusterInfo,
    ordinal: u32,
    ip: Ipv4Addr,
    dns: Option<String>,
}

impl Server {
    pub fn new(id: ServerId, cluster_id: ClusterId, ordinal: u32, ip: Ipv4Addr) -> CoreResult<Self> {
        Ok(Self {
            id,
            cluster: cluster_info(cluster_id)?,
            ordinal,
            ip,
            dns: None,
        })
    }

    pub fn id(&self) -> ServerId {
        self.id
    }

    pub fn cluster_id(&self) -> ClusterId {
        self.cluster.id
    }

    /// 1-based position within the cluster.
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }

    pub fn ip(&self) -> Ipv4Addr {
        self.ip
    }

    /// Name of the record currently publishing this server's IP, if known.
    pub fn dns(&self) -> Option<&str> {
        self.dns.as_deref()
    }

    /// `<subdomain>-<ordinal>`, e.g. `hk-2`.
    pub fn name(&self) -> String {
        format!("{}-{}", self.cluster.subdomain, self.ordinal)
    }

    pub fn cluster_name(&self) -> &'static str {
        self.cluster.name
    }

    pub fn subdomain(&self) -> &'static str {
        self.cluster.subdomain
    }

    pub(crate) fn set_dns(&mut self, dns: Option<String>) {
        self.dns = dns;
    }
}

/// Input to inventory construction: which cluster a server belongs to and its address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSeed {
    #[serde(rename = "cluster")]
    pub cluster_id: ClusterId,
    pub ip: Ipv4Addr,
}

impl ServerSeed {
    pub fn new(cluster_id: ClusterId, ip: Ipv4Addr) -> Self {
        Self { cluster_id, ip }
    }
}
