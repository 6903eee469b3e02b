use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{HostedZone, RecordChange, RecordSet};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（各 Provider 格式不同）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供额外信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 记录名称（用于 `RecordNotFound` 等错误）
    pub record_name: Option<String>,
    /// Zone（用于 `DomainNotFound` 等错误）
    pub domain: Option<String>,
}

impl ErrorContext {
    pub fn zone(zone_id: &str) -> Self {
        Self {
            record_name: None,
            domain: Some(zone_id.to_string()),
        }
    }

    pub fn record(zone_id: &str, record_name: &str) -> Self {
        Self {
            record_name: Some(record_name.to_string()),
            domain: Some(zone_id.to_string()),
        }
    }
}

/// Provider 错误映射 Trait（内部使用）
/// 各 Provider 实现此 trait 以将原始 API 错误映射到统一错误类型
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Record-set level DNS provider.
///
/// This is the narrow contract the rotation core consumes: list zones, list
/// record sets in a zone, and apply one change to one record set. Every call
/// reflects the provider's live state; implementations must not cache.
#[async_trait]
pub trait ZoneProvider: Send + Sync {
    /// Provider identifier (used in errors and logs).
    fn id(&self) -> &'static str;

    /// List every hosted zone visible to the credentials.
    async fn list_hosted_zones(&self) -> Result<Vec<HostedZone>>;

    /// List every record set in the zone, all record types included.
    async fn list_resource_record_sets(&self, zone_id: &str) -> Result<Vec<RecordSet>>;

    /// Apply one UPSERT or DELETE to one record set.
    ///
    /// Implementations reject an UPSERT with no values and any change carrying
    /// duplicate values.
    async fn change_resource_record_sets(&self, zone_id: &str, change: &RecordChange)
    -> Result<()>;
}
