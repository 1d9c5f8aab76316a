//! Typed client for the GST gateway routes.

use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// GST client identity, sent as hyphenated headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub gst_username: String,
    pub state_cd: String,
    pub ip_address: String,
    pub client_id: String,
    pub client_secret: String,
}

/// `{success, message, data}` body returned by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Query for `/gstr1a/json_returns`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnsQuery {
    pub gstin: String,
    pub retperiod: String,
    pub email: String,
    pub base_url: String,
    /// Sections to fetch; empty fetches all of them.
    #[serde(skip)]
    pub endpoints: Vec<String>,
}

/// Raw status and JSON body of a gateway reply.
#[derive(Debug, Clone)]
pub struct GatewayReply {
    pub status: u16,
    pub body: Value,
}

impl GatewayReply {
    /// The envelope, if the gateway answered with one.
    pub fn envelope(&self) -> Option<Envelope> {
        serde_json::from_value(self.body.clone()).ok()
    }

    /// The `detail` message of a rejected request.
    pub fn detail(&self) -> Option<&str> {
        self.body.get("detail").and_then(Value::as_str)
    }
}

pub struct GatewayClient {
    client: Client,
    gateway_url: String,
}

impl GatewayClient {
    pub fn new(gateway_url: &str) -> Self {
        Self::with_client(Client::new(), gateway_url)
    }

    pub fn with_client(client: Client, gateway_url: &str) -> Self {
        Self {
            client,
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
        }
    }

    /// Ask the GST API to send an OTP to the user.
    pub async fn request_otp(&self, email: &str, creds: &Credentials) -> Result<GatewayReply, reqwest::Error> {
        let req = self
            .get("/authentication/otprequest", creds, None)
            .header("email", email);
        send(req).await
    }

    /// Exchange an OTP for an auth token.
    pub async fn request_auth_token(
        &self,
        email: &str,
        otp: &str,
        txn: &str,
        creds: &Credentials,
    ) -> Result<GatewayReply, reqwest::Error> {
        let req = self
            .get("/authentication/authtoken", creds, Some(txn))
            .header("email", email)
            .header("otp", otp);
        send(req).await
    }

    pub async fn refresh_token(&self, email: &str, txn: &str, creds: &Credentials) -> Result<GatewayReply, reqwest::Error> {
        let req = self
            .get("/authentication/refreshtoken", creds, Some(txn))
            .query(&[("email", email)]);
        send(req).await
    }

    pub async fn logout(&self, email: &str, txn: &str, creds: &Credentials) -> Result<GatewayReply, reqwest::Error> {
        let req = self
            .get("/authentication/logout", creds, Some(txn))
            .query(&[("email", email)]);
        send(req).await
    }

    /// Fetch GSTR-1A sections through the aggregate endpoint.
    pub async fn json_returns(
        &self,
        query: &ReturnsQuery,
        txn: &str,
        creds: &Credentials,
    ) -> Result<GatewayReply, reqwest::Error> {
        let mut req = self.get("/gstr1a/json_returns", creds, Some(txn)).query(query);
        if !query.endpoints.is_empty() {
            req = req.query(&[("endpoints_str", query.endpoints.join(","))]);
        }
        send(req).await
    }

    fn get(&self, path: &str, creds: &Credentials, txn: Option<&str>) -> RequestBuilder {
        let mut req = self
            .client
            .get(format!("{}{}", self.gateway_url, path))
            .header("gst-username", &creds.gst_username)
            .header("state-cd", &creds.state_cd)
            .header("ip-address", &creds.ip_address)
            .header("client-id", &creds.client_id)
            .header("client-secret", &creds.client_secret);
        if let Some(txn) = txn {
            req = req.header("txn", txn);
        }
        req
    }
}

async fn send(req: RequestBuilder) -> Result<GatewayReply, reqwest::Error> {
    let resp = req.send().await?;
    let status = resp.status().as_u16();
    let text = resp.text().await?;
    let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
    Ok(GatewayReply { status, body })
}
