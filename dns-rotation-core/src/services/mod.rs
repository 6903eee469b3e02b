//! 业务逻辑服务层

mod rotation_service;
mod status_service;

pub use rotation_service::{Membership, PlannedChange, RotationPlan, RotationService};
pub use status_service::{RecordMembers, record_members, update_servers};
