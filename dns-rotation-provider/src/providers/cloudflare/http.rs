//! Cloudflare HTTP 请求方法

use reqwest::RequestBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::{HttpUtils, READ_RETRIES};
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::types::DeletedRecord;
use super::{CloudflareProvider, CloudflareResponse};

impl CloudflareProvider {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// 发送请求并解包 Cloudflare 响应信封
    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        method: &str,
        path: &str,
        context: ErrorContext,
        max_retries: u32,
    ) -> Result<CloudflareResponse<T>> {
        let builder = builder.header("Authorization", format!("Bearer {}", self.api_token));
        let (_, response_text) = HttpUtils::execute_request_with_retry(
            builder,
            self.provider_name(),
            method,
            &self.url(path),
            max_retries,
        )
        .await?;

        let cf_response: CloudflareResponse<T> =
            HttpUtils::parse_json(&response_text, self.provider_name())?;

        if !cf_response.success {
            let raw = cf_response
                .errors
                .and_then(|errors| errors.into_iter().next())
                .map_or_else(
                    || RawApiError::new("Unknown error"),
                    |e| RawApiError::with_code(e.code.to_string(), e.message),
                );
            let err = self.map_error(raw, context);
            if err.is_expected() {
                log::warn!("[cloudflare] API 错误: {err}");
            } else {
                log::error!("[cloudflare] API 错误: {err}");
            }
            return Err(err);
        }

        Ok(cf_response)
    }

    /// 执行 GET 请求，读取所有分页
    ///
    /// `path` 可以已带查询参数；分页参数会被追加在后面。
    pub(crate) async fn get_all_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        per_page: u32,
        context: ErrorContext,
    ) -> Result<Vec<T>> {
        let separator = if path.contains('?') { '&' } else { '?' };
        let mut items = Vec::new();
        let mut page = 1_u32;

        loop {
            let page_path = format!("{path}{separator}page={page}&per_page={per_page}");
            let cf_response: CloudflareResponse<Vec<T>> = self
                .send(
                    self.client.get(self.url(&page_path)),
                    "GET",
                    &page_path,
                    context.clone(),
                    READ_RETRIES,
                )
                .await?;

            let batch = cf_response.result.unwrap_or_default();
            let batch_len = batch.len();
            items.extend(batch);

            let Some(info) = cf_response.result_info else {
                break;
            };
            let last_page = info
                .total_pages
                .map_or(items.len() >= info.total_count as usize, |pages| page >= pages);
            if batch_len == 0 || last_page {
                break;
            }
            page += 1;
        }

        Ok(items)
    }

    /// 执行 POST 请求（不重试）
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        context: ErrorContext,
    ) -> Result<T> {
        let cf_response: CloudflareResponse<T> = self
            .send(
                self.client.post(self.url(path)).json(body),
                "POST",
                path,
                context,
                0,
            )
            .await?;

        cf_response
            .result
            .ok_or_else(|| self.parse_error("响应中缺少 result 字段"))
    }

    /// 执行 PATCH 请求（不重试）
    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        context: ErrorContext,
    ) -> Result<T> {
        let cf_response: CloudflareResponse<T> = self
            .send(
                self.client.patch(self.url(path)).json(body),
                "PATCH",
                path,
                context,
                0,
            )
            .await?;

        cf_response
            .result
            .ok_or_else(|| self.parse_error("响应中缺少 result 字段"))
    }

    /// 执行 DELETE 请求（不重试）
    pub(crate) async fn delete(&self, path: &str, context: ErrorContext) -> Result<()> {
        let _: CloudflareResponse<DeletedRecord> = self
            .send(self.client.delete(self.url(path)), "DELETE", path, context, 0)
            .await?;
        Ok(())
    }
}
