//! Typed extraction of caller-supplied GST credentials.
//!
//! # Responsibilities
//! - Read each route's required headers into a fixed struct
//! - Reject missing headers before any outbound call
//! - Lay out the forwarded headers/query params per route
//!
//! # Design Decisions
//! - Headers are looked up hyphenated first (`gst-username`, what browsers
//!   and the SDK send), then in the literal underscore form (`gst_username`)
//! - Values are decoded as Latin-1 and never validated, so any byte a
//!   client could send survives the trip upstream
//! - Outbound names always use the underscore form
//! - Each route keeps its own header/query split; they are not unified

use axum::{
    extract::{FromRequestParts, Query},
    http::{request::Parts, HeaderMap},
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::http::response::ApiError;

type Pairs = Vec<(String, String)>;

/// Read one credential header, accepting `a-b` or `a_b` spellings.
pub fn read_header(headers: &HeaderMap, name: &str) -> Option<String> {
    let hyphenated = name.replace('_', "-");
    headers
        .get(hyphenated.as_str())
        .or_else(|| headers.get(name))
        .map(|v| v.as_bytes().iter().copied().map(char::from).collect())
}

/// Collects every missing header so the caller sees them all at once.
struct HeaderReader<'a> {
    headers: &'a HeaderMap,
    missing: Vec<&'static str>,
}

impl<'a> HeaderReader<'a> {
    fn new(headers: &'a HeaderMap) -> Self {
        Self {
            headers,
            missing: Vec::new(),
        }
    }

    fn required(&mut self, name: &'static str) -> String {
        read_header(self.headers, name).unwrap_or_else(|| {
            self.missing.push(name);
            String::new()
        })
    }

    fn finish(self) -> Result<(), ApiError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ApiError::MissingHeaders(self.missing))
        }
    }
}

fn pair(name: &str, value: &str) -> (String, String) {
    (name.to_string(), value.to_string())
}

/// GST client identity sent on every authentication call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub gst_username: String,
    pub state_cd: String,
    pub ip_address: String,
    pub client_id: String,
    pub client_secret: String,
}

impl ClientIdentity {
    fn read(reader: &mut HeaderReader<'_>) -> Self {
        Self {
            gst_username: reader.required("gst_username"),
            state_cd: reader.required("state_cd"),
            ip_address: reader.required("ip_address"),
            client_id: reader.required("client_id"),
            client_secret: reader.required("client_secret"),
        }
    }

    /// Outbound headers, with `txn` slotted in after `ip_address` when present.
    pub fn headers(&self, txn: Option<&str>) -> Pairs {
        let mut headers = vec![
            pair("gst_username", &self.gst_username),
            pair("state_cd", &self.state_cd),
            pair("ip_address", &self.ip_address),
        ];
        if let Some(txn) = txn {
            headers.push(pair("txn", txn));
        }
        headers.push(pair("client_id", &self.client_id));
        headers.push(pair("client_secret", &self.client_secret));
        headers
    }
}

/// Identity plus the transaction id of an established session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHeaders {
    pub identity: ClientIdentity,
    pub txn: String,
}

impl SessionHeaders {
    fn read(reader: &mut HeaderReader<'_>) -> Self {
        let identity = ClientIdentity::read(reader);
        let txn = reader.required("txn");
        Self { identity, txn }
    }

    pub fn headers(&self) -> Pairs {
        self.identity.headers(Some(&self.txn))
    }
}

/// `GET /authentication/otprequest`: everything arrives as headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpRequestHeaders {
    pub email: String,
    pub identity: ClientIdentity,
}

impl OtpRequestHeaders {
    pub fn headers(&self) -> Pairs {
        self.identity.headers(None)
    }

    pub fn params(&self) -> Pairs {
        vec![pair("email", &self.email)]
    }
}

/// `GET /authentication/authtoken`: email and otp move to the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthTokenHeaders {
    pub email: String,
    pub otp: String,
    pub session: SessionHeaders,
}

impl AuthTokenHeaders {
    pub fn headers(&self) -> Pairs {
        self.session.headers()
    }

    pub fn params(&self) -> Pairs {
        vec![pair("email", &self.email), pair("otp", &self.otp)]
    }
}

impl<S: Send + Sync> FromRequestParts<S> for OtpRequestHeaders {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let mut reader = HeaderReader::new(&parts.headers);
        let email = reader.required("email");
        let identity = ClientIdentity::read(&mut reader);
        reader.finish()?;
        Ok(Self { email, identity })
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AuthTokenHeaders {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let mut reader = HeaderReader::new(&parts.headers);
        let email = reader.required("email");
        let otp = reader.required("otp");
        let session = SessionHeaders::read(&mut reader);
        reader.finish()?;
        Ok(Self {
            email,
            otp,
            session,
        })
    }
}

impl<S: Send + Sync> FromRequestParts<S> for SessionHeaders {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let mut reader = HeaderReader::new(&parts.headers);
        let session = SessionHeaders::read(&mut reader);
        reader.finish()?;
        Ok(session)
    }
}

/// Query string carrying only the user's email.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// Query string of `GET /gstr1a/json_returns`.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonReturnsQuery {
    pub gstin: String,
    pub retperiod: String,
    pub email: String,
    pub base_url: String,
    pub endpoints_str: Option<String>,
}

impl JsonReturnsQuery {
    pub fn params(&self) -> Pairs {
        vec![
            pair("gstin", &self.gstin),
            pair("retperiod", &self.retperiod),
            pair("email", &self.email),
        ]
    }
}

/// `Query` with rejections reported as `ApiError::InvalidQuery` (422).
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| ValidQuery(value))
            .map_err(|rejection| ApiError::InvalidQuery(rejection.body_text()))
    }
}
