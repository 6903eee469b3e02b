//! Application bootstrap for DNS rotation.
//!
//! Provides `AppConfig` (environment and fleet loading), `AppStateBuilder`
//! (explicit startup) and `AppState` (the inventory/zone pair every frontend
//! holds, plus the actions a UI offers on it).

pub mod config;

use std::net::Ipv4Addr;
use std::sync::Arc;

use dns_rotation_core::error::{CoreError, CoreResult};
use dns_rotation_core::services::{
    RecordMembers, RotationPlan, RotationService, record_members, update_servers,
};
use dns_rotation_core::types::{ClusterId, ServerId, ServerSeed};
use dns_rotation_core::{
    DEFAULT_TTL, Inventory, Server, Zone, cluster_info, create_infrastructure,
};
use dns_rotation_provider::{MemoryProvider, RecordSet, RecordType, ZoneProvider};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

pub use config::{AppConfig, ProviderConfig, default_fleet, load_fleet, parse_fleet};

/// Zone id used by the in-memory provider.
pub const MEMORY_ZONE_ID: &str = "memory";

/// What a UI asks the rotation engine to do with one server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationAction {
    Add,
    Remove,
}

/// Server as shown by a frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerView {
    pub id: ServerId,
    pub name: String,
    pub cluster: String,
    pub ip: Ipv4Addr,
    pub dns: Option<String>,
}

impl From<&Server> for ServerView {
    fn from(server: &Server) -> Self {
        Self {
            id: server.id(),
            name: server.name(),
            cluster: server.cluster_name().to_string(),
            ip: server.ip(),
            dns: server.dns().map(ToString::to_string),
        }
    }
}

/// Result of a rotation action, with the confirmation shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct RotationOutcome {
    pub server: ServerView,
    pub plan: RotationPlan,
    pub message: String,
}

/// Application state.
///
/// Owns the inventory and the connected zone. Every frontend constructs this
/// once at startup via `AppStateBuilder`.
pub struct AppState {
    zone: Arc<Zone>,
    rotation: RotationService,
    inventory: RwLock<Inventory>,
}

impl AppState {
    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    /// Servers as last known, without contacting the provider.
    pub async fn servers(&self) -> Vec<ServerView> {
        self.inventory
            .read()
            .await
            .servers()
            .iter()
            .map(ServerView::from)
            .collect()
    }

    /// Re-read the zone and recompute every server's published record.
    pub async fn refresh_servers(&self) -> CoreResult<Vec<ServerView>> {
        let records = self.zone.records().await?;
        let mut inventory = self.inventory.write().await;
        update_servers(&records, inventory.servers_mut())?;
        Ok(inventory.servers().iter().map(ServerView::from).collect())
    }

    /// Current records and the servers behind each of them.
    pub async fn dns_view(&self) -> CoreResult<Vec<RecordMembers>> {
        let records = self.zone.records().await?;
        let inventory = self.inventory.read().await;
        record_members(&records, inventory.servers())
    }

    /// Add a server to, or remove it from, its cluster record.
    ///
    /// Rotations are serialized within the process. Provider failures are
    /// returned unmodified.
    pub async fn rotate(
        &self,
        server_id: ServerId,
        action: RotationAction,
    ) -> CoreResult<RotationOutcome> {
        let mut inventory = self.inventory.write().await;
        let server = inventory.server_mut(server_id)?;

        let plan = match action {
            RotationAction::Add => self.rotation.add_server(server).await,
            RotationAction::Remove => self.rotation.remove_server(server).await,
        }
        .inspect_err(|e| {
            if e.is_expected() {
                log::warn!("Rotation of server {server_id} rejected: {e}");
            } else {
                log::error!("Rotation of server {server_id} failed: {e}");
            }
        })?;

        let name = server.name();
        let message = match action {
            RotationAction::Add => format!("Added server {name} to DNS A record {}", plan.fqdn),
            RotationAction::Remove if plan.is_noop() => {
                format!("Server {name} is not in DNS A record {}", plan.fqdn)
            }
            RotationAction::Remove => {
                format!("Removed server {name} from DNS A record {}", plan.fqdn)
            }
        };
        log::info!("{message}");

        Ok(RotationOutcome {
            server: ServerView::from(&*server),
            plan,
            message,
        })
    }
}

/// Builder for constructing `AppState`.
///
/// # Required
/// - `provider` — the DNS provider holding the zone
/// - `zone_domain` — the hosted zone to manage
///
/// # Optional
/// - `record_ttl` — defaults to [`DEFAULT_TTL`]
/// - `fleet` — defaults to [`default_fleet`]
pub struct AppStateBuilder {
    provider: Option<Arc<dyn ZoneProvider>>,
    zone_domain: Option<String>,
    record_ttl: u32,
    fleet: Option<Vec<ServerSeed>>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            provider: None,
            zone_domain: None,
            record_ttl: DEFAULT_TTL,
            fleet: None,
        }
    }

    /// Builder pre-filled from configuration, provider included.
    pub fn from_config(config: &AppConfig) -> CoreResult<Self> {
        let provider: Arc<dyn ZoneProvider> = match &config.provider {
            #[cfg(feature = "cloudflare")]
            ProviderConfig::Cloudflare { api_token } => Arc::new(
                dns_rotation_provider::CloudflareProvider::new(api_token.clone()),
            ),
            #[cfg(not(feature = "cloudflare"))]
            ProviderConfig::Cloudflare { .. } => {
                return Err(CoreError::ConfigError(
                    "built without Cloudflare support".to_string(),
                ));
            }
            ProviderConfig::Memory => Arc::new(seeded_memory_provider(
                &config.zone_domain,
                &config.fleet,
                config.record_ttl,
            )),
        };

        Ok(Self::new()
            .provider(provider)
            .zone_domain(config.zone_domain.clone())
            .record_ttl(config.record_ttl)
            .fleet(config.fleet.clone()))
    }

    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn ZoneProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn zone_domain(mut self, domain: impl Into<String>) -> Self {
        self.zone_domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn record_ttl(mut self, ttl: u32) -> Self {
        self.record_ttl = ttl;
        self
    }

    #[must_use]
    pub fn fleet(mut self, fleet: Vec<ServerSeed>) -> Self {
        self.fleet = Some(fleet);
        self
    }

    /// Build the inventory and connect the zone.
    ///
    /// # Errors
    /// `ValidationError` if a required part is missing, `UnknownCluster` for
    /// a bad fleet, `ZoneNotFound` if the domain has no hosted zone.
    pub async fn build(self) -> CoreResult<AppState> {
        let provider = self
            .provider
            .ok_or_else(|| CoreError::ValidationError("provider is required".to_string()))?;
        let zone_domain = self
            .zone_domain
            .ok_or_else(|| CoreError::ValidationError("zone_domain is required".to_string()))?;
        let fleet = self.fleet.unwrap_or_else(default_fleet);

        let inventory = create_infrastructure(&fleet)?;
        let zone = Arc::new(
            Zone::connect(provider, &zone_domain)
                .await?
                .with_ttl(self.record_ttl),
        );
        log::info!(
            "Managing {} server(s) in {} cluster(s) under {}",
            inventory.servers().len(),
            inventory.clusters().len(),
            zone.name()
        );

        Ok(AppState {
            rotation: RotationService::new(Arc::clone(&zone)),
            zone,
            inventory: RwLock::new(inventory),
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory provider holding one empty zone named `domain`.
pub fn memory_provider(domain: &str) -> MemoryProvider {
    MemoryProvider::new().with_zone(MEMORY_ZONE_ID, domain)
}

/// In-memory zone where the first server of every cluster in `fleet` is
/// already published in its cluster record.
///
/// State lives only as long as the process; nothing is shared between runs.
pub fn seeded_memory_provider(domain: &str, fleet: &[ServerSeed], ttl: u32) -> MemoryProvider {
    let mut seeded: Vec<ClusterId> = Vec::new();
    let mut provider = memory_provider(domain);
    for seed in fleet {
        if seeded.contains(&seed.cluster_id) {
            continue;
        }
        // Unknown clusters are reported when the inventory is built.
        let Ok(info) = cluster_info(seed.cluster_id) else {
            continue;
        };
        seeded.push(seed.cluster_id);
        provider = provider.with_record_set(
            MEMORY_ZONE_ID,
            RecordSet {
                name: format!("{}.{}", info.subdomain, domain.trim_end_matches('.')),
                record_type: RecordType::A,
                ttl,
                values: vec![seed.ip.to_string()],
            },
        );
    }
    provider
}
