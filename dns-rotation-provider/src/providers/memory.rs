//! In-memory provider
//!
//! Keeps zones and record sets in process memory and applies changes with
//! strict record-set semantics: an UPSERT replaces every value of the set,
//! and a DELETE must name exactly the values currently published. Every
//! applied change is appended to a change log, and call counters make it
//! possible to assert that an operation did not reach the provider at all.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{ProviderError, Result};
use crate::providers::common::{normalize_domain_name, same_name, validate_change};
use crate::traits::ZoneProvider;
use crate::types::{ChangeAction, HostedZone, RecordChange, RecordSet, RecordType};

const PROVIDER: &str = "memory";

#[derive(Debug)]
struct MemoryZone {
    zone: HostedZone,
    record_sets: Vec<RecordSet>,
}

#[derive(Debug, Default)]
struct MemoryState {
    zones: Vec<MemoryZone>,
    change_log: Vec<RecordChange>,
    fail_next_change: Option<ProviderError>,
}

impl MemoryState {
    fn zone_mut(&mut self, zone_id: &str) -> Result<&mut MemoryZone> {
        self.zones
            .iter_mut()
            .find(|z| z.zone.id == zone_id)
            .ok_or_else(|| ProviderError::DomainNotFound {
                provider: PROVIDER.to_string(),
                domain: zone_id.to_string(),
                raw_message: None,
            })
    }
}

/// Zone provider backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    state: RwLock<MemoryState>,
    list_calls: AtomicUsize,
    change_calls: AtomicUsize,
}

impl MemoryProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hosted zone.
    #[must_use]
    pub fn with_zone(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.state.get_mut().zones.push(MemoryZone {
            zone: HostedZone {
                id: id.into(),
                name: normalize_domain_name(&name.into()),
            },
            record_sets: Vec::new(),
        });
        self
    }

    /// Seed a record set into an existing zone. Unknown zone ids are ignored.
    #[must_use]
    pub fn with_record_set(mut self, zone_id: &str, record_set: RecordSet) -> Self {
        if let Ok(zone) = self.state.get_mut().zone_mut(zone_id) {
            zone.record_sets.push(record_set);
        }
        self
    }

    /// Replace (or create) a record set outside of the change path, the way
    /// another writer sharing the zone would.
    pub async fn put_record_set(&self, zone_id: &str, record_set: RecordSet) -> Result<()> {
        let mut state = self.state.write().await;
        let zone = state.zone_mut(zone_id)?;
        zone.record_sets.retain(|s| {
            !(same_name(&s.name, &record_set.name) && s.record_type == record_set.record_type)
        });
        zone.record_sets.push(record_set);
        Ok(())
    }

    /// Current A record set with the given name, if any.
    pub async fn a_record_set(&self, zone_id: &str, name: &str) -> Option<RecordSet> {
        let state = self.state.read().await;
        state
            .zones
            .iter()
            .find(|z| z.zone.id == zone_id)?
            .record_sets
            .iter()
            .find(|s| same_name(&s.name, name) && s.record_type == RecordType::A)
            .cloned()
    }

    /// Every change applied so far, oldest first.
    pub async fn change_log(&self) -> Vec<RecordChange> {
        self.state.read().await.change_log.clone()
    }

    /// Make the next `change_resource_record_sets` call fail with `error`.
    pub async fn fail_next_change(&self, error: ProviderError) {
        self.state.write().await.fail_next_change = Some(error);
    }

    /// Number of `list_resource_record_sets` calls served.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of `change_resource_record_sets` calls received, failed ones included.
    pub fn change_calls(&self) -> usize {
        self.change_calls.load(Ordering::SeqCst)
    }
}

fn same_values(current: &[String], requested: &[String]) -> bool {
    let current: HashSet<&str> = current.iter().map(String::as_str).collect();
    let requested: HashSet<&str> = requested.iter().map(String::as_str).collect();
    current == requested
}

#[async_trait]
impl ZoneProvider for MemoryProvider {
    fn id(&self) -> &'static str {
        PROVIDER
    }

    async fn list_hosted_zones(&self) -> Result<Vec<HostedZone>> {
        let state = self.state.read().await;
        Ok(state.zones.iter().map(|z| z.zone.clone()).collect())
    }

    async fn list_resource_record_sets(&self, zone_id: &str) -> Result<Vec<RecordSet>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write().await;
        Ok(state.zone_mut(zone_id)?.record_sets.clone())
    }

    async fn change_resource_record_sets(
        &self,
        zone_id: &str,
        change: &RecordChange,
    ) -> Result<()> {
        self.change_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write().await;

        if let Some(err) = state.fail_next_change.take() {
            return Err(err);
        }
        validate_change(PROVIDER, change)?;

        let zone = state.zone_mut(zone_id)?;
        let position = zone
            .record_sets
            .iter()
            .position(|s| same_name(&s.name, &change.name) && s.record_type == change.record_type);

        match change.action {
            ChangeAction::Upsert => {
                let record_set = RecordSet {
                    name: normalize_domain_name(&change.name),
                    record_type: change.record_type.clone(),
                    ttl: change.ttl,
                    values: change.values.clone(),
                };
                match position {
                    Some(i) => zone.record_sets[i] = record_set,
                    None => zone.record_sets.push(record_set),
                }
            }
            ChangeAction::Delete => {
                let Some(i) = position else {
                    return Err(ProviderError::RecordNotFound {
                        provider: PROVIDER.to_string(),
                        record_name: change.name.clone(),
                        raw_message: None,
                    });
                };
                if !same_values(&zone.record_sets[i].values, &change.values) {
                    return Err(ProviderError::InvalidParameter {
                        provider: PROVIDER.to_string(),
                        param: "values".to_string(),
                        detail: format!(
                            "DELETE of '{}' must match the published values {:?}",
                            change.name, zone.record_sets[i].values
                        ),
                    });
                }
                zone.record_sets.remove(i);
            }
        }

        log::debug!("[{PROVIDER}] applied {} {} {:?}", change.action, change.name, change.values);
        state.change_log.push(change.clone());
        Ok(())
    }
}
