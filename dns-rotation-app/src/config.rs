//! Process configuration
//!
//! Everything is read from the environment once at startup. Missing
//! required values are fatal.

use std::net::Ipv4Addr;
use std::path::Path;

use dns_rotation_core::DEFAULT_TTL;
use dns_rotation_core::error::{CoreError, CoreResult};
use dns_rotation_core::types::{ClusterId, ServerSeed};
use serde::Deserialize;

pub const ENV_SECRET_KEY: &str = "SECRET_KEY";
pub const ENV_ZONE_DOMAIN: &str = "DNS_ZONE_DOMAIN";
pub const ENV_PROVIDER: &str = "DNS_PROVIDER";
pub const ENV_CLOUDFLARE_TOKEN: &str = "CLOUDFLARE_API_TOKEN";
pub const ENV_RECORD_TTL: &str = "DNS_RECORD_TTL";
pub const ENV_FLEET: &str = "DNS_ROTATION_FLEET";

/// Which provider backs the zone.
#[derive(Clone, PartialEq, Eq)]
pub enum ProviderConfig {
    Cloudflare { api_token: String },
    /// In-process zone, empty at startup.
    Memory,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cloudflare { .. } => f.write_str("Cloudflare { api_token: <redacted> }"),
            Self::Memory => f.write_str("Memory"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// Signing key for the UI layer's sessions.
    pub secret_key: String,
    /// Domain of the hosted zone holding the cluster records.
    pub zone_domain: String,
    pub provider: ProviderConfig,
    pub record_ttl: u32,
    pub fleet: Vec<ServerSeed>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("secret_key", &"<redacted>")
            .field("zone_domain", &self.zone_domain)
            .field("provider", &self.provider)
            .field("record_ttl", &self.record_ttl)
            .field("fleet", &self.fleet.len())
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| CoreError::ConfigError(format!("{key} is not set")))
        };

        let secret_key = required(ENV_SECRET_KEY)?;
        let zone_domain = required(ENV_ZONE_DOMAIN)?.trim().to_string();

        let provider = match get(ENV_PROVIDER).as_deref().map(str::trim) {
            None | Some("cloudflare") => ProviderConfig::Cloudflare {
                api_token: required(ENV_CLOUDFLARE_TOKEN)?,
            },
            Some("memory") => ProviderConfig::Memory,
            Some(other) => {
                return Err(CoreError::ConfigError(format!(
                    "{ENV_PROVIDER} must be 'cloudflare' or 'memory', got '{other}'"
                )));
            }
        };

        let record_ttl = match get(ENV_RECORD_TTL) {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(ttl) if ttl > 0 => ttl,
                _ => {
                    return Err(CoreError::ConfigError(format!(
                        "{ENV_RECORD_TTL} must be a positive number of seconds, got '{raw}'"
                    )));
                }
            },
            None => DEFAULT_TTL,
        };

        let fleet = match get(ENV_FLEET) {
            Some(path) => load_fleet(Path::new(path.trim()))?,
            None => default_fleet(),
        };

        Ok(Self {
            secret_key,
            zone_domain,
            provider,
            record_ttl,
            fleet,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FleetFile {
    #[serde(default, rename = "server")]
    servers: Vec<ServerSeed>,
}

/// Parse a fleet description:
///
/// ```toml
/// [[server]]
/// cluster = 4
/// ip = "4.3.2.1"
/// ```
pub fn parse_fleet(content: &str) -> CoreResult<Vec<ServerSeed>> {
    let file: FleetFile = toml::from_str(content)
        .map_err(|e| CoreError::ConfigError(format!("invalid fleet description: {e}")))?;
    Ok(file.servers)
}

pub fn load_fleet(path: &Path) -> CoreResult<Vec<ServerSeed>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CoreError::ConfigError(format!("cannot read fleet file {}: {e}", path.display()))
    })?;
    let fleet = parse_fleet(&content)?;
    log::info!("Loaded {} server(s) from {}", fleet.len(), path.display());
    Ok(fleet)
}

/// Fleet used when no fleet file is configured.
pub fn default_fleet() -> Vec<ServerSeed> {
    let fleet: [(ClusterId, [u8; 4]); 9] = [
        (1, [2, 4, 6, 8]),
        (2, [1, 0, 1, 1]),
        (3, [5, 6, 7, 8]),
        (4, [4, 3, 2, 1]),
        (4, [1, 2, 3, 4]),
        (4, [1, 2, 3, 5]),
        (4, [1, 2, 3, 6]),
        (5, [8, 1, 1, 1]),
        (6, [9, 1, 1, 1]),
    ];
    fleet
        .into_iter()
        .map(|(cluster_id, ip)| ServerSeed::new(cluster_id, Ipv4Addr::from(ip)))
        .collect()
}
