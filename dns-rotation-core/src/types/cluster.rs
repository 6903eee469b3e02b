//! 集群相关类型

use serde::Serialize;

use crate::error::{CoreError, CoreResult};

use super::ServerId;

/// Cluster identifier, an index into [`CLUSTER_TABLE`].
pub type ClusterId = u32;

/// Static metadata of one cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClusterInfo {
    pub id: ClusterId,
    /// Display name, e.g. `"Hong Kong"`.
    pub name: &'static str,
    /// DNS label of the cluster's A record, e.g. `"hk"`.
    pub subdomain: &'static str,
}

/// Every cluster the fleet can be deployed to. Ids are contiguous from 1.
pub const CLUSTER_TABLE: [ClusterInfo; 6] = [
    ClusterInfo {
        id: 1,
        name: "Los Angeles",
        subdomain: "la",
    },
    ClusterInfo {
        id: 2,
        name: "New York",
        subdomain: "nyc",
    },
    ClusterInfo {
        id: 3,
        name: "Frankfurt",
        subdomain: "fra",
    },
    ClusterInfo {
        id: 4,
        name: "Hong Kong",
        subdomain: "hk",
    },
    ClusterInfo {
        id: 5,
        name: "Tokyo",
        subdomain: "tyo",
    },
    ClusterInfo {
        id: 6,
        name: "Dublin",
        subdomain: "dub",
    },
];

/// Look up cluster metadata by id.
pub fn cluster_info(id: ClusterId) -> CoreResult<&'static ClusterInfo> {
    let index = usize::try_from(id)
        .ok()
        .and_then(|id| id.checked_sub(1))
        .ok_or(CoreError::UnknownCluster(id))?;
    CLUSTER_TABLE
        .get(index)
        .filter(|info| info.id == id)
        .ok_or(CoreError::UnknownCluster(id))
}

/// A cluster and the servers deployed to it, in creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    info: &'static ClusterInfo,
    server_ids: Vec<ServerId>,
}

impl Cluster {
    /// Create an empty cluster. Fails with [`CoreError::UnknownCluster`]
    /// when `id` is not in [`CLUSTER_TABLE`].
    pub fn new(id: ClusterId) -> CoreResult<Self> {
        Ok(Self {
            info: cluster_info(id)?,
            server_ids: Vec::new(),
        })
    }

    pub fn id(&self) -> ClusterId {
        self.info.id
    }

    pub fn name(&self) -> &'static str {
        self.info.name
    }

    pub fn subdomain(&self) -> &'static str {
        self.info.subdomain
    }

    pub fn info(&self) -> &'static ClusterInfo {
        self.info
    }

    /// Servers of this cluster, in creation order.
    pub fn server_ids(&self) -> &[ServerId] {
        &self.server_ids
    }

    pub(crate) fn push_server(&mut self, id: ServerId) {
        self.server_ids.push(id);
    }
}
