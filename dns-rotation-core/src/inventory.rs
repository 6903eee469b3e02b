//! Fleet inventory
//!
//! Clusters and servers for the lifetime of the process. Built once from
//! seeds, owned by the caller, never persisted.

use crate::error::{CoreError, CoreResult};
use crate::types::{
    CLUSTER_TABLE, Cluster, ClusterId, Server, ServerId, ServerSeed, cluster_info,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    clusters: Vec<Cluster>,
    servers: Vec<Server>,
}

impl Inventory {
    /// Clusters in table order.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Servers sorted by name.
    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    pub fn servers_mut(&mut self) -> &mut [Server] {
        &mut self.servers
    }

    pub fn cluster(&self, id: ClusterId) -> CoreResult<&Cluster> {
        self.clusters
            .iter()
            .find(|c| c.id() == id)
            .ok_or(CoreError::UnknownCluster(id))
    }

    pub fn server(&self, id: ServerId) -> CoreResult<&Server> {
        self.servers
            .iter()
            .find(|s| s.id() == id)
            .ok_or(CoreError::ServerNotFound(id))
    }

    pub fn server_mut(&mut self, id: ServerId) -> CoreResult<&mut Server> {
        self.servers
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or(CoreError::ServerNotFound(id))
    }
}

/// Build the inventory.
///
/// Every cluster of [`CLUSTER_TABLE`] is created, in table order, and receives
/// the seeds naming it, in seed order. Server ids are assigned from 1 in that
/// creation order; ordinals restart at 1 per cluster. The server list is
/// then sorted lexicographically by name (`hk-10` sorts before `hk-2`).
pub fn create_infrastructure(seeds: &[ServerSeed]) -> CoreResult<Inventory> {
    for seed in seeds {
        cluster_info(seed.cluster_id)?;
    }

    let mut clusters = Vec::with_capacity(CLUSTER_TABLE.len());
    let mut servers = Vec::with_capacity(seeds.len());
    let mut next_id: ServerId = 1;

    for info in &CLUSTER_TABLE {
        let mut cluster = Cluster::new(info.id)?;
        let mut ordinal = 0;
        for seed in seeds.iter().filter(|s| s.cluster_id == info.id) {
            ordinal += 1;
            servers.push(Server::new(next_id, info.id, ordinal, seed.ip)?);
            cluster.push_server(next_id);
            next_id += 1;
        }
        clusters.push(cluster);
    }

    servers.sort_by_key(Server::name);
    log::debug!(
        "Inventory built: {} clusters, {} servers",
        clusters.len(),
        servers.len()
    );

    Ok(Inventory { clusters, servers })
}
