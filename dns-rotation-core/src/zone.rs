//! Zone accessor
//!
//! The single point of contact with the DNS provider. The hosted zone is
//! resolved once; records are re-read on every call.

use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::sync::Arc;

use dns_rotation_provider::{RecordType, ZoneProvider, normalize_domain_name, same_name};

use crate::error::{CoreError, CoreResult};
use crate::types::Record;

/// TTL, in seconds, of every record written by the rotation engine.
pub const DEFAULT_TTL: u32 = 30;

pub struct Zone {
    id: String,
    name: String,
    ttl: u32,
    provider: Arc<dyn ZoneProvider>,
}

impl Zone {
    /// Resolve the hosted zone whose name is exactly `domain`.
    ///
    /// A trailing dot on either side is ignored. No match is
    /// [`CoreError::ZoneNotFound`].
    pub async fn connect(provider: Arc<dyn ZoneProvider>, domain: &str) -> CoreResult<Self> {
        let zones = provider.list_hosted_zones().await?;
        let zone = zones
            .into_iter()
            .find(|z| same_name(&z.name, domain))
            .ok_or_else(|| CoreError::ZoneNotFound(domain.to_string()))?;

        log::info!(
            "[{}] Using hosted zone {} ({})",
            provider.id(),
            zone.name,
            zone.id
        );
        Ok(Self {
            id: zone.id,
            name: normalize_domain_name(&zone.name),
            ttl: DEFAULT_TTL,
            provider,
        })
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Provider-assigned zone id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Zone apex, without the trailing dot.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub(crate) fn provider(&self) -> &dyn ZoneProvider {
        self.provider.as_ref()
    }

    /// `<subdomain>.<zone>`
    pub fn fqdn(&self, subdomain: &str) -> String {
        format!("{subdomain}.{}", self.name)
    }

    /// Fresh snapshot of the zone's A records, apex excluded.
    pub async fn records(&self) -> CoreResult<Vec<Record>> {
        let sets = self.provider.list_resource_record_sets(&self.id).await?;
        let records: Vec<Record> = sets
            .into_iter()
            .filter(|s| s.record_type == RecordType::A && !same_name(&s.name, &self.name))
            .map(Record::from)
            .collect();

        log::debug!("Zone {} has {} A record(s)", self.name, records.len());
        Ok(records)
    }

    /// De-duplicated IPv4 addresses of a record; a malformed value is an error.
    pub fn ips_from_record(record: &Record) -> CoreResult<BTreeSet<Ipv4Addr>> {
        record.ips()
    }
}

impl std::fmt::Debug for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Zone")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("ttl", &self.ttl)
            .field("provider", &self.provider.id())
            .finish()
    }
}
