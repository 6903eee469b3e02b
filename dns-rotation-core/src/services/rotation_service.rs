//! Rotation engine
//!
//! Adds or removes one server's IP in its cluster's A record. Every
//! operation reads the record fresh, computes the new IP set, and issues
//! exactly one change. `server.dns` is updated only after the provider
//! accepts the change.
//!
//! Reading and writing are separate steps ([`RotationService::plan_add`] /
//! [`RotationService::plan_remove`], then [`RotationService::apply`]). No
//! concurrency token is carried from one to the other: two plans built from
//! the same snapshot both apply, and the later write wins.

use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::sync::Arc;

use dns_rotation_provider::{RecordChange, same_name};
use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::types::{Record, Server, ServerId};
use crate::zone::Zone;

/// Direction of a rotation change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Membership {
    Join,
    Leave,
}

/// The single provider change a rotation resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum PlannedChange {
    /// Publish exactly these addresses.
    Upsert { ips: BTreeSet<Ipv4Addr> },
    /// Delete the record, which holds only `ip`.
    Delete { ip: Ipv4Addr, ttl: u32 },
    /// Nothing to do; no provider call.
    Noop,
}

/// Outcome of the read phase for one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RotationPlan {
    pub server_id: ServerId,
    pub membership: Membership,
    pub fqdn: String,
    pub change: PlannedChange,
}

impl RotationPlan {
    pub fn is_noop(&self) -> bool {
        self.change == PlannedChange::Noop
    }
}

/// A 记录轮换服务
pub struct RotationService {
    zone: Arc<Zone>,
}

impl RotationService {
    #[must_use]
    pub fn new(zone: Arc<Zone>) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    /// Current IP set of the record named `fqdn`, empty if it does not exist.
    async fn current(&self, fqdn: &str) -> CoreResult<Option<(Record, BTreeSet<Ipv4Addr>)>> {
        let records = self.zone.records().await?;
        match records.into_iter().find(|r| same_name(&r.name, fqdn)) {
            Some(record) => {
                let ips = Zone::ips_from_record(&record)?;
                Ok(Some((record, ips)))
            }
            None => Ok(None),
        }
    }

    /// Plan publishing `server`'s IP under its cluster record.
    ///
    /// Always an UPSERT, even when the IP is already present.
    pub async fn plan_add(&self, server: &Server) -> CoreResult<RotationPlan> {
        let fqdn = self.zone.fqdn(server.subdomain());
        let mut ips = self
            .current(&fqdn)
            .await?
            .map(|(_, ips)| ips)
            .unwrap_or_default();
        ips.insert(server.ip());

        let plan = RotationPlan {
            server_id: server.id(),
            membership: Membership::Join,
            fqdn,
            change: PlannedChange::Upsert { ips },
        };
        log::debug!("Planned add of {}: {plan:?}", server.name());
        Ok(plan)
    }

    /// Plan withdrawing `server`'s IP from its cluster record.
    ///
    /// Absent record or absent IP is a no-op. Removing the last IP deletes
    /// the record.
    pub async fn plan_remove(&self, server: &Server) -> CoreResult<RotationPlan> {
        let fqdn = self.zone.fqdn(server.subdomain());
        let change = match self.current(&fqdn).await? {
            Some((record, mut ips)) => {
                if !ips.remove(&server.ip()) {
                    PlannedChange::Noop
                } else if ips.is_empty() {
                    PlannedChange::Delete {
                        ip: server.ip(),
                        ttl: record.ttl,
                    }
                } else {
                    PlannedChange::Upsert { ips }
                }
            }
            None => PlannedChange::Noop,
        };

        let plan = RotationPlan {
            server_id: server.id(),
            membership: Membership::Leave,
            fqdn,
            change,
        };
        log::debug!("Planned remove of {}: {plan:?}", server.name());
        Ok(plan)
    }

    /// Issue the planned change and update `server.dns` once it succeeds.
    pub async fn apply(&self, plan: &RotationPlan, server: &mut Server) -> CoreResult<()> {
        if plan.server_id != server.id() {
            return Err(CoreError::ValidationError(format!(
                "plan for server {} applied to server {}",
                plan.server_id,
                server.id()
            )));
        }

        let name = server.name();
        let change = match &plan.change {
            PlannedChange::Noop => {
                log::info!("{name} ({}) is not in {}, nothing to remove", server.ip(), plan.fqdn);
                return Ok(());
            }
            PlannedChange::Upsert { ips } => {
                let values: Vec<String> = ips.iter().map(ToString::to_string).collect();
                let verb = match plan.membership {
                    Membership::Join => "add",
                    Membership::Leave => "remove",
                };
                let comment = format!("{verb} {name} -> {}", values.join(", "));
                RecordChange::upsert_a(&plan.fqdn, self.zone.ttl(), values).with_comment(comment)
            }
            PlannedChange::Delete { ip, ttl } => {
                RecordChange::delete_a(&plan.fqdn, *ttl, vec![ip.to_string()])
                    .with_comment(format!("remove {name}"))
            }
        };

        log::info!("{} {} {:?} ({name})", change.action, change.name, change.values);
        if let Err(e) = self
            .zone
            .provider()
            .change_resource_record_sets(self.zone.id(), &change)
            .await
        {
            if e.is_expected() {
                log::warn!("Change to {} rejected by {}: {e}", plan.fqdn, e.provider());
            } else {
                log::error!("Change to {} failed on {}: {e}", plan.fqdn, e.provider());
            }
            return Err(e.into());
        }

        match plan.membership {
            Membership::Join => server.set_dns(Some(plan.fqdn.clone())),
            Membership::Leave => server.set_dns(None),
        }
        Ok(())
    }

    /// Publish `server`'s IP in its cluster record.
    pub async fn add_server(&self, server: &mut Server) -> CoreResult<RotationPlan> {
        let plan = self.plan_add(server).await?;
        self.apply(&plan, server).await?;
        Ok(plan)
    }

    /// Withdraw `server`'s IP from its cluster record.
    pub async fn remove_server(&self, server: &mut Server) -> CoreResult<RotationPlan> {
        let plan = self.plan_remove(server).await?;
        self.apply(&plan, server).await?;
        Ok(plan)
    }
}
