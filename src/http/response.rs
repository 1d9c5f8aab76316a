//! Response envelopes and error mapping.
//!
//! # Responsibilities
//! - Wrap upstream results in the `{success, message, data}` envelope
//! - Map caller-input and aggregation defects to HTTP statuses
//!
//! # Status mapping
//! | Outcome                                 | Status |
//! |-----------------------------------------|--------|
//! | Envelope (upstream success or failure)  | 200    |
//! | Unknown GSTR-1A section                 | 400    |
//! | Missing/unreadable header, bad query    | 422    |
//! | Aggregation defect                      | 500    |
//!
//! Upstream failures stay on 200 with `success: false` (or an inline
//! per-section error); only the rows below the first produce a non-200.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::gstr1a::{AggregationError, AggregationResult, InvalidEndpoints};
use crate::upstream::OutboundResult;

/// Uniform body returned by every proxied route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Envelope {
    /// Envelope for a single outbound call.
    pub fn from_outbound(result: OutboundResult, success_message: &str) -> Self {
        match result {
            Ok(payload) => Self {
                success: true,
                message: success_message.to_string(),
                data: Some(payload),
            },
            Err(failure) => Self {
                success: false,
                message: failure.to_string(),
                data: None,
            },
        }
    }

    /// Envelope for a completed fan-out. Always `success: true`; failed
    /// sections are reported inside `data`.
    pub fn aggregated(result: &AggregationResult) -> Self {
        let names: Vec<&str> = result.sections().map(|s| s.as_str()).collect();
        Self {
            success: true,
            message: format!(
                "GSTR1A data aggregated successfully for endpoints: {}",
                names.join(", ")
            ),
            data: Some(result.to_json()),
        }
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Errors that short-circuit a route before or after dispatch.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    InvalidEndpoints(#[from] InvalidEndpoints),

    #[error("Missing required header(s): {}", .0.join(", "))]
    MissingHeaders(Vec<&'static str>),

    #[error("Invalid query parameters: {0}")]
    InvalidQuery(String),

    #[error("Aggregation failed: {0}")]
    Aggregation(#[from] AggregationError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidEndpoints(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingHeaders(_) | ApiError::InvalidQuery(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Aggregation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        } else {
            tracing::warn!(status = %status, error = %self, "Request rejected");
        }
        (status, Json(serde_json::json!({ "detail": self.to_string() }))).into_response()
    }
}
