//! `/gstr1a/json_returns` aggregate route.

use axum::{extract::State, http::HeaderMap, routing::get, Router};

use crate::gstr1a::{registry, AggregationRequest};
use crate::http::extract::{JsonReturnsQuery, SessionHeaders, ValidQuery};
use crate::http::request::request_id;
use crate::http::response::{ApiError, Envelope};
use crate::http::server::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/gstr1a/json_returns", get(json_returns))
}

/// Fetch the selected GSTR-1A sections in parallel and merge them.
///
/// Unknown section names are rejected (400) before anything is dispatched.
async fn json_returns(
    State(state): State<AppState>,
    inbound: HeaderMap,
    ValidQuery(query): ValidQuery<JsonReturnsQuery>,
    session: SessionHeaders,
) -> Result<Envelope, ApiError> {
    let sections = registry::validate(query.endpoints_str.as_deref())?;

    tracing::debug!(
        request_id = %request_id(&inbound),
        gstin = %query.gstin,
        retperiod = %query.retperiod,
        sections = sections.len(),
        "Aggregating GSTR1A returns"
    );

    let mut headers = session.headers();
    headers.push(("Content-Type".to_string(), "application/json".to_string()));

    let request = AggregationRequest {
        base_url: query.base_url.clone(),
        sections,
        headers,
        params: query.params(),
    };

    let result = state.aggregator.aggregate(&request).await?;
    Ok(Envelope::aggregated(&result))
}
