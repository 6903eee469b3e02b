//! Cloudflare error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::CloudflareProvider;

/// Cloudflare error code mapping
/// Reference: <https://api.cloudflare.com/#getting-started-responses>
impl ProviderErrorMapper for CloudflareProvider {
    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let provider = self.provider_name().to_string();
        match raw.code.as_deref() {
            // 6003: Invalid request headers
            // 6103: Invalid format for X-Auth-Key header
            // 6111: Invalid format for Authorization header
            // 10000: Authentication error
            Some("6003" | "6103" | "6111" | "10000") => ProviderError::InvalidCredentials {
                provider,
                raw_message: Some(raw.message),
            },

            // 9109: Unauthorized to access requested resource
            Some("9109") => ProviderError::PermissionDenied {
                provider,
                raw_message: Some(raw.message),
            },

            // 971: Please wait and consider throttling your request speed
            Some("971") => ProviderError::RateLimited {
                provider,
                retry_after: None,
                raw_message: Some(raw.message),
            },

            // 1004: DNS Validation Error
            // 9000: Invalid or missing name
            // 9005: Content for A record is invalid
            // 9021: Invalid TTL
            // 81057/81058: The record already exists
            Some(
                code @ ("1004" | "9000" | "9005" | "9021" | "81057" | "81058"),
            ) => {
                let param = match code {
                    "9000" => "name",
                    "9005" | "81057" | "81058" => "values",
                    "9021" => "ttl",
                    _ => "general",
                };
                ProviderError::InvalidParameter {
                    provider,
                    param: param.to_string(),
                    detail: raw.message,
                }
            }

            // 81044: Record does not exist
            Some("81044") => ProviderError::RecordNotFound {
                provider,
                record_name: context
                    .record_name
                    .unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },

            // 1003: Invalid or missing zone id
            // 7000: No route for that URI
            // 7003: Could not route to /path
            Some("1003" | "7000" | "7003") => ProviderError::DomainNotFound {
                provider,
                domain: context.domain.unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },

            _ => self.unknown_error(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> CloudflareProvider {
        CloudflareProvider::new(String::new())
    }

    fn ctx_with_record() -> ErrorContext {
        ErrorContext::record("zone-1", "hk.example.com")
    }

    #[test]
    fn auth_errors_map_to_invalid_credentials() {
        let p = provider();
        for code in ["6003", "6103", "6111", "10000"] {
            let err = p.map_error(RawApiError::with_code(code, "auth"), ErrorContext::default());
            assert!(
                matches!(err, ProviderError::InvalidCredentials { .. }),
                "code {code}: {err:?}"
            );
        }
    }

    #[test]
    fn unauthorized_resource_is_permission_denied() {
        let err = provider().map_error(
            RawApiError::with_code("9109", "unauthorized"),
            ErrorContext::default(),
        );
        assert!(matches!(err, ProviderError::PermissionDenied { .. }));
    }

    #[test]
    fn throttling_is_rate_limited() {
        let err = provider().map_error(
            RawApiError::with_code("971", "slow down"),
            ErrorContext::default(),
        );
        assert!(err.is_retryable());
    }

    #[test]
    fn invalid_content_maps_to_values_param() {
        let err = provider().map_error(
            RawApiError::with_code("9005", "Content for A record is invalid"),
            ErrorContext::default(),
        );
        assert!(matches!(
            err,
            ProviderError::InvalidParameter { ref param, .. } if param == "values"
        ));
    }

    #[test]
    fn invalid_ttl_maps_to_ttl_param() {
        let err = provider().map_error(
            RawApiError::with_code("9021", "Invalid TTL"),
            ErrorContext::default(),
        );
        assert!(matches!(
            err,
            ProviderError::InvalidParameter { ref param, .. } if param == "ttl"
        ));
    }

    #[test]
    fn record_not_found_uses_context_name() {
        let err = provider().map_error(
            RawApiError::with_code("81044", "Record does not exist"),
            ctx_with_record(),
        );
        assert!(matches!(
            err,
            ProviderError::RecordNotFound { ref record_name, .. } if record_name == "hk.example.com"
        ));
    }

    #[test]
    fn routing_errors_map_to_domain_not_found() {
        let err = provider().map_error(
            RawApiError::with_code("7003", "Could not route"),
            ErrorContext::zone("zone-1"),
        );
        assert!(matches!(
            err,
            ProviderError::DomainNotFound { ref domain, .. } if domain == "zone-1"
        ));
    }

    #[test]
    fn unknown_code_falls_back() {
        let err = provider().map_error(
            RawApiError::with_code("99999", "mystery"),
            ErrorContext::default(),
        );
        assert!(matches!(
            err,
            ProviderError::Unknown { raw_code: Some(ref c), .. } if c == "99999"
        ));
    }
}
