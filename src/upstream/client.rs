//! GST API client.
//!
//! # Responsibilities
//! - Issue exactly one GET per `OutboundRequest`; redirects are not followed
//! - Capture non-2xx bodies verbatim for diagnostics
//! - Normalize transport and decode errors into `FetchFailure`

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::redirect;
use std::time::Instant;

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::upstream::types::{FetchFailure, OutboundRequest, OutboundResult};

/// Anything that can perform an outbound GST call.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Perform the call. Never panics on upstream misbehaviour; every
    /// failure comes back as a `FetchFailure`.
    async fn fetch(&self, request: OutboundRequest) -> OutboundResult;
}

/// Production client backed by a shared reqwest connection pool.
#[derive(Clone)]
pub struct ReqwestUpstream {
    client: reqwest::Client,
}

impl ReqwestUpstream {
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        let client = Self::client_builder(config).build()?;
        Ok(Self { client })
    }

    /// Client settings every upstream call relies on.
    ///
    /// A 3xx is reported as `UpstreamStatus`, so credentials never follow a
    /// `Location` to another host.
    pub fn client_builder(config: &UpstreamConfig) -> reqwest::ClientBuilder {
        reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(redirect::Policy::none())
    }

    /// Wrap an already configured client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Upstream for ReqwestUpstream {
    #[tracing::instrument(skip(self, request), fields(url = %request.url))]
    async fn fetch(&self, request: OutboundRequest) -> OutboundResult {
        let start_time = Instant::now();
        let result = self.execute(&request).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(failure) => failure.kind(),
        };
        metrics::record_upstream_call(outcome, start_time);

        match &result {
            Ok(_) => tracing::debug!(elapsed = ?start_time.elapsed(), "Upstream call succeeded"),
            Err(failure) => tracing::warn!(kind = failure.kind(), error = %failure, "Upstream call failed"),
        }
        result
    }
}

impl ReqwestUpstream {
    async fn execute(&self, request: &OutboundRequest) -> OutboundResult {
        let url = parse_absolute_url(&request.url)?;

        let mut builder = self.client.get(url).query(&request.params);
        for (name, value) in &request.headers {
            let (name, value) = outbound_header(name, value)?;
            builder = builder.header(name, value);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(FetchFailure::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            FetchFailure::Transport(format!("invalid JSON in upstream response: {}", e))
        })
    }
}

/// Encode a forwarded header as Latin-1 bytes, the inverse of how inbound
/// credential headers are decoded.
fn outbound_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), FetchFailure> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| FetchFailure::Transport(format!("invalid header name '{}': {}", name, e)))?;
    let bytes = value
        .chars()
        .map(u8::try_from)
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|_| FetchFailure::Transport(format!("header '{}' is not Latin-1", name)))?;
    let header_value = HeaderValue::from_bytes(&bytes)
        .map_err(|e| FetchFailure::Transport(format!("invalid value for header '{}': {}", name, e)))?;
    Ok((header_name, header_value))
}

fn parse_absolute_url(raw: &str) -> Result<url::Url, FetchFailure> {
    let url = url::Url::parse(raw)
        .map_err(|e| FetchFailure::Transport(format!("invalid URL '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchFailure::Transport(format!(
            "unsupported URL scheme '{}' in '{}'",
            other, raw
        ))),
    }
}
