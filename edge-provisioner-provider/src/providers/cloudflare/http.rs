//! Cloudflare HTTP 请求方法

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{CF_API_BASE, CloudflareProvider, CloudflareResponse};

impl CloudflareProvider {
    /// 发送请求并返回解析后的响应信封
    async fn send_envelope<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        context: ErrorContext,
    ) -> Result<CloudflareResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let url = format!("{CF_API_BASE}{path}");
        let mut builder = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(&self.api_token);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let (_status, response_text) =
            HttpUtils::execute_request(builder, self.provider_name(), method.as_str(), &url)
                .await?;

        let envelope: CloudflareResponse<T> =
            HttpUtils::parse_json(&response_text, self.provider_name())?;
        self.check_envelope(envelope, context)
    }

    /// 检查 `success` 字段，失败时映射第一条错误
    pub(crate) fn check_envelope<T>(
        &self,
        envelope: CloudflareResponse<T>,
        context: ErrorContext,
    ) -> Result<CloudflareResponse<T>> {
        if envelope.success {
            return Ok(envelope);
        }

        let raw = envelope.errors.first().map_or_else(
            || RawApiError::new("Unknown error"),
            |e| RawApiError::with_code(e.code.to_string(), e.message.clone()),
        );
        if envelope.errors.len() > 1 {
            log::debug!(
                "[{}] {} additional API errors ignored",
                self.provider_name(),
                envelope.errors.len() - 1
            );
        }
        let err = self.map_error(raw, context);
        if err.is_expected() {
            log::warn!("API 错误: {err}");
        } else {
            log::error!("API 错误: {err}");
        }
        Err(err)
    }

    /// 执行请求，返回 `result` 字段
    pub(crate) async fn call<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        context: ErrorContext,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        self.send_envelope(method, path, body, context)
            .await?
            .result
            .ok_or_else(|| self.parse_error("响应中缺少 result 字段"))
    }

    /// 执行请求，忽略 `result` 内容（DELETE、activation_check 等）
    pub(crate) async fn call_unit<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        context: ErrorContext,
    ) -> Result<()>
    where
        B: Serialize + Sync,
    {
        self.send_envelope::<serde_json::Value, B>(method, path, body, context)
            .await
            .map(|_| ())
    }

    /// 执行 GET 请求
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        context: ErrorContext,
    ) -> Result<T> {
        self.call::<T, ()>(Method::GET, path, None, context).await
    }

    /// 执行单页 GET 请求，返回 (items, `total_count`, `total_pages`)
    pub(crate) async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        page: u32,
        per_page: u32,
        context: ErrorContext,
    ) -> Result<(Vec<T>, u32, u32)> {
        let separator = if path.contains('?') { '&' } else { '?' };
        let paged_path = format!("{path}{separator}page={page}&per_page={per_page}");
        let envelope = self
            .send_envelope::<Vec<T>, ()>(Method::GET, &paged_path, None, context)
            .await?;

        let (total_count, total_pages) = envelope
            .result_info
            .as_ref()
            .map_or((0, 1), |info| {
                (info.total_count, info.total_pages.unwrap_or(1))
            });
        Ok((envelope.result.unwrap_or_default(), total_count, total_pages))
    }

    /// 拉取所有分页
    pub(crate) async fn get_all_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        per_page: u32,
        context: &ErrorContext,
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1;
        loop {
            let (mut batch, _, total_pages) = self
                .get_page::<T>(path, page, per_page, context.clone())
                .await?;
            let exhausted = batch.is_empty() || page >= total_pages;
            items.append(&mut batch);
            if exhausted {
                return Ok(items);
            }
            page += 1;
        }
    }
}
