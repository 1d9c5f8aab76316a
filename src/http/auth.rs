//! `/authentication/*` passthrough routes.
//!
//! Each route performs one outbound GET against the configured GST base URL
//! and wraps the outcome in an `Envelope`. Upstream failures are reported
//! with `success: false` on HTTP 200.

use axum::{extract::State, http::HeaderMap, routing::get, Router};

use crate::http::extract::{AuthTokenHeaders, EmailQuery, OtpRequestHeaders, SessionHeaders, ValidQuery};
use crate::http::request::request_id;
use crate::http::response::Envelope;
use crate::http::server::AppState;
use crate::upstream::OutboundRequest;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/authentication/otprequest", get(request_otp))
        .route("/authentication/authtoken", get(request_auth_token))
        .route("/authentication/refreshtoken", get(refresh_auth_token))
        .route("/authentication/logout", get(logout))
}

async fn request_otp(
    State(state): State<AppState>,
    inbound: HeaderMap,
    creds: OtpRequestHeaders,
) -> Envelope {
    forward(
        &state,
        &inbound,
        "otprequest",
        OutboundRequest::get(state.auth_url("otprequest"), creds.headers(), creds.params()),
        "OTP requested successfully",
    )
    .await
}

async fn request_auth_token(
    State(state): State<AppState>,
    inbound: HeaderMap,
    creds: AuthTokenHeaders,
) -> Envelope {
    forward(
        &state,
        &inbound,
        "authtoken",
        OutboundRequest::get(state.auth_url("authtoken"), creds.headers(), creds.params()),
        "Authorization token requested successfully",
    )
    .await
}

async fn refresh_auth_token(
    State(state): State<AppState>,
    inbound: HeaderMap,
    ValidQuery(query): ValidQuery<EmailQuery>,
    session: SessionHeaders,
) -> Envelope {
    forward(
        &state,
        &inbound,
        "refreshtoken",
        OutboundRequest::get(
            state.auth_url("refreshtoken"),
            session.headers(),
            vec![("email".to_string(), query.email)],
        ),
        "Refresh token requested successfully",
    )
    .await
}

async fn logout(
    State(state): State<AppState>,
    inbound: HeaderMap,
    ValidQuery(query): ValidQuery<EmailQuery>,
    session: SessionHeaders,
) -> Envelope {
    forward(
        &state,
        &inbound,
        "logout",
        OutboundRequest::get(
            state.auth_url("logout"),
            session.headers(),
            vec![("email".to_string(), query.email)],
        ),
        "Logout successful",
    )
    .await
}

async fn forward(
    state: &AppState,
    inbound: &HeaderMap,
    action: &'static str,
    request: OutboundRequest,
    success_message: &str,
) -> Envelope {
    let result = state.upstream.fetch(request).await;

    tracing::info!(
        request_id = %request_id(inbound),
        action,
        success = result.is_ok(),
        "Authentication request forwarded"
    );

    Envelope::from_outbound(result, success_message)
}
