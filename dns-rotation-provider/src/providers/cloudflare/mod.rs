//! Cloudflare DNS Provider
//!
//! Cloudflare stores one record per value, while the rotation contract works
//! on whole record sets. Listing groups records by (name, type); a change is
//! translated into the per-value creates, patches and deletes it implies.

mod error;
mod http;
mod provider;
mod types;

use reqwest::Client;

use crate::providers::common::create_http_client;
use crate::utils::log_sanitizer::mask_secret;

pub(crate) use types::{CloudflareDnsRecord, CloudflareResponse, CloudflareZone};

pub(crate) const CF_API_BASE: &str = "https://api.cloudflare.com/client/v4";
/// Cloudflare Zones API 单页最大记录数
pub(crate) const MAX_PAGE_SIZE_ZONES: u32 = 50;
/// Cloudflare DNS Records API 单页最大记录数
pub(crate) const MAX_PAGE_SIZE_RECORDS: u32 = 100;

/// Cloudflare DNS Provider
pub struct CloudflareProvider {
    pub(crate) client: Client,
    pub(crate) api_token: String,
    pub(crate) base_url: String,
}

impl CloudflareProvider {
    pub fn new(api_token: String) -> Self {
        Self {
            client: create_http_client(),
            api_token,
            base_url: CF_API_BASE.to_string(),
        }
    }

    /// Point the provider at a different API root (used against mock servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &mask_secret(&self.api_token))
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
