//! Provider 公共工具函数

use std::collections::HashSet;
#[cfg(feature = "cloudflare")]
use std::time::Duration;

#[cfg(feature = "cloudflare")]
use reqwest::Client;

use crate::error::{ProviderError, Result};
use crate::types::{ChangeAction, RecordChange};

// ============ HTTP Client ============

/// 默认连接超时（秒）
#[cfg(feature = "cloudflare")]
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
#[cfg(feature = "cloudflare")]
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// 创建带超时配置的 HTTP Client
#[cfg(feature = "cloudflare")]
#[allow(clippy::expect_used)]
pub fn create_http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client")
}

// ============ 域名名称处理 ============

/// 去掉域名末尾的点
pub fn normalize_domain_name(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}

/// Compare two DNS names, ignoring a trailing dot.
pub fn same_name(a: &str, b: &str) -> bool {
    a.trim_end_matches('.') == b.trim_end_matches('.')
}

// ============ Change 校验 ============

/// Validation shared by every provider before a change is applied.
///
/// - UPSERT must carry at least one value
/// - no change may carry the same value twice
pub fn validate_change(provider: &str, change: &RecordChange) -> Result<()> {
    if change.action == ChangeAction::Upsert && change.values.is_empty() {
        return Err(ProviderError::InvalidParameter {
            provider: provider.to_string(),
            param: "values".to_string(),
            detail: format!("UPSERT of '{}' carries no values", change.name),
        });
    }

    let mut seen = HashSet::with_capacity(change.values.len());
    for value in &change.values {
        if !seen.insert(value.as_str()) {
            return Err(ProviderError::InvalidParameter {
                provider: provider.to_string(),
                param: "values".to_string(),
                detail: format!("duplicate value '{value}' for '{}'", change.name),
            });
        }
    }

    Ok(())
}
