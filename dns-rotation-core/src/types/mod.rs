//! Core type definitions

mod cluster;
mod record;
mod server;

pub use cluster::{CLUSTER_TABLE, Cluster, ClusterId, ClusterInfo, cluster_info};
pub use record::Record;
pub use server::{Server, ServerId, ServerSeed};

// Re-export provider types used in core signatures
pub use dns_rotation_provider::RecordType;
