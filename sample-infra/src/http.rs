use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use sample_core::secret::Secret;
use sample_core::{ProviderError, ProviderResult, RawReply};
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info};

/// One JSON POST to a downstream provider
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub url: String,
    pub authorization: Secret<String>,
    /// Extra headers such as an API revision
    pub headers: Vec<(&'static str, String)>,
    pub content_type: &'static str,
    pub body: Value,
}

/// Sends outbound requests and hands back the raw status and body.
///
/// Only connection level problems are errors here; every HTTP status is a reply.
#[async_trait]
pub trait JsonTransport: Send + Sync {
    async fn post_json(
        &self,
        provider: &'static str,
        request: OutboundRequest,
    ) -> ProviderResult<RawReply>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl JsonTransport for ReqwestTransport {
    async fn post_json(
        &self,
        provider: &'static str,
        request: OutboundRequest,
    ) -> ProviderResult<RawReply> {
        info!(provider, url = %request.url, payload = %request.body, "Sending request");

        let body = serde_json::to_vec(&request.body)
            .map_err(|e| ProviderError::Unexpected(e.to_string()))?;
        let mut builder = self
            .client
            .post(&request.url)
            .header(AUTHORIZATION, request.authorization.expose().as_str())
            .header(CONTENT_TYPE, request.content_type)
            .header(ACCEPT, request.content_type)
            .body(body);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }

        let response = builder.send().await.map_err(|e| {
            error!(provider, url = %request.url, error = %e, "Request failed");
            transport_error(provider, e, self.timeout)
        })?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| {
            error!(provider, status, error = %e, "Failed to read response body");
            transport_error(provider, e, self.timeout)
        })?;

        info!(provider, status, body = %text, "Received response");
        Ok(RawReply::new(status, text))
    }
}

fn transport_error(
    provider: &'static str,
    err: reqwest::Error,
    timeout: Duration,
) -> ProviderError {
    if err.is_builder() {
        return ProviderError::Unexpected(format!(
            "could not build request for {}: {}",
            provider, err
        ));
    }
    if err.is_timeout() {
        return ProviderError::Transport {
            provider,
            reason: format!("timed out after {}s", timeout.as_secs()),
            timed_out: true,
        };
    }
    ProviderError::Transport { provider, reason: err.to_string(), timed_out: false }
}
