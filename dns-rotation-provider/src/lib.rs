//! # dns-rotation-provider
//!
//! Record-set level DNS provider contract used by the rotation core, with a
//! Cloudflare backend and an in-memory backend.
//!
//! ## Supported Providers
//!
//! | Provider | Feature Flag | Auth Method |
//! |----------|-------------|-------------|
//! | [Cloudflare](https://www.cloudflare.com/) | `cloudflare` | Bearer Token |
//! | In-memory | *(always)* | none |
//!
//! ## Feature Flags
//!
//! - **`cloudflare`** *(default)* — Enable the Cloudflare provider.
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls. Recommended for cross-compilation.
//!
//! ## Record sets
//!
//! The contract speaks in record sets: every value published under one
//! (name, type) pair. Cloudflare stores one record per value, so its
//! backend groups values on read and fans a change out into per-value
//! requests on write. Those requests are not atomic; a failure part-way
//! through leaves the values created so far in place.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dns_rotation_provider::{CloudflareProvider, RecordChange, ZoneProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = CloudflareProvider::new("your-token".to_string());
//!
//!     let zones = provider.list_hosted_zones().await?;
//!     let zone = &zones[0];
//!
//!     for set in provider.list_resource_record_sets(&zone.id).await? {
//!         println!("{} {} {:?}", set.name, set.record_type, set.values);
//!     }
//!
//!     let change = RecordChange::upsert_a(
//!         format!("hk.{}", zone.name),
//!         30,
//!         vec!["1.2.3.4".to_string(), "4.3.2.1".to_string()],
//!     );
//!     provider.change_resource_record_sets(&zone.id, &change).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All provider operations return [`Result<T, ProviderError>`](ProviderError).
//!
//! - [`ProviderError::InvalidCredentials`] — authentication failed
//! - [`ProviderError::RecordNotFound`] — record set (or a deleted value) not found
//! - [`ProviderError::InvalidParameter`] — the change was rejected
//! - [`ProviderError::RateLimited`] — API rate limit exceeded (retryable)
//!
//! Transient errors are retried with exponential backoff for list calls
//! only. Changes are sent once.

mod error;
#[cfg(feature = "cloudflare")]
mod http_client;
mod providers;
mod traits;
mod types;
#[cfg(feature = "cloudflare")]
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export core trait only (internal traits are not exported)
pub use traits::ZoneProvider;

// Re-export types
pub use types::{ChangeAction, HostedZone, RecordChange, RecordSet, RecordType};

// Shared name helpers
pub use providers::common::{normalize_domain_name, same_name};

#[cfg(feature = "cloudflare")]
pub use http_client::HttpUtils;

// Re-export concrete providers
#[cfg(feature = "cloudflare")]
pub use providers::CloudflareProvider;
pub use providers::MemoryProvider;
