//! DNS Rotation Core Library
//!
//! Keeps a fleet of servers, grouped into geographic clusters, in and out of
//! their cluster's shared A record:
//! - Inventory: clusters and servers built once per process
//! - Zone: the hosted zone and live A-record snapshots
//! - Rotation: add or remove one server's IP with a single record-set change
//! - Status: reconcile servers against the records currently published
//!
//! Nothing here runs at load time. The caller builds an [`Inventory`] with
//! [`create_infrastructure`], connects a [`Zone`], and owns both.

pub mod error;
pub mod inventory;
pub mod services;
pub mod types;
pub mod zone;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use inventory::{Inventory, create_infrastructure};
pub use services::{
    Membership, PlannedChange, RecordMembers, RotationPlan, RotationService, record_members,
    update_servers,
};
pub use types::{
    CLUSTER_TABLE, Cluster, ClusterId, ClusterInfo, Record, Server, ServerId, ServerSeed,
    cluster_info,
};
pub use zone::{DEFAULT_TTL, Zone};
