//! Outbound request and result types.

use serde_json::Value;
use thiserror::Error;

/// A single read-only call to the GST API.
///
/// Headers and params are forwarded verbatim, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub params: Vec<(String, String)>,
}

impl OutboundRequest {
    pub fn get(
        url: impl Into<String>,
        headers: Vec<(String, String)>,
        params: Vec<(String, String)>,
    ) -> Self {
        Self {
            url: url.into(),
            headers,
            params,
        }
    }

    /// Value of a forwarded header, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        lookup(&self.headers, name)
    }

    /// Value of a forwarded query param, if present.
    pub fn param(&self, name: &str) -> Option<&str> {
        lookup(&self.params, name)
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// Why an outbound call did not produce a JSON payload.
///
/// The `Display` output is the exact message surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    /// The GST API answered with a non-2xx status.
    #[error("API Error: {status} - {body}")]
    UpstreamStatus { status: u16, body: String },

    /// DNS, connect, read or decode failure.
    #[error("Request failed: {0}")]
    Transport(String),

    /// The task running the call panicked or was cancelled.
    #[error("Request failed: {0}")]
    TaskFailed(String),
}

impl FetchFailure {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchFailure::UpstreamStatus { .. } => "upstream_status",
            FetchFailure::Transport(_) => "transport",
            FetchFailure::TaskFailed(_) => "task_failed",
        }
    }
}

/// Outcome of one outbound call.
pub type OutboundResult = Result<Value, FetchFailure>;
