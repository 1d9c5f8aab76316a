//! End-to-end tests: SDK → gateway → reqwest → mock GST backend.

use gst_gateway_sdk::{Credentials, GatewayClient, ReturnsQuery};
use serde_json::json;

mod common;

use common::MockReply;

fn creds() -> Credentials {
    Credentials {
        gst_username: "acme_user".into(),
        state_cd: "29".into(),
        ip_address: "10.1.2.3".into(),
        client_id: "cid-123".into(),
        client_secret: "shh".into(),
    }
}

fn gateway_client(addr: std::net::SocketAddr) -> GatewayClient {
    GatewayClient::with_client(common::direct_client(), &format!("http://{}", addr))
}

#[tokio::test]
async fn test_otp_request_is_forwarded() {
    let (backend, log) = common::start_programmable_backend(|_req| async move {
        MockReply::new(200, r#"{"status_cd":"1","txn":"a1b2"}"#)
    })
    .await;
    let (gateway, shutdown) = common::start_gateway(&format!("http://{}", backend)).await;

    let reply = gateway_client(gateway)
        .request_otp("ops@example.com", &creds())
        .await
        .expect("gateway unreachable");

    assert_eq!(reply.status, 200);
    let envelope = reply.envelope().unwrap();
    assert!(envelope.success);
    assert_eq!(envelope.message, "OTP requested successfully");
    assert_eq!(envelope.data, Some(json!({"status_cd": "1", "txn": "a1b2"})));

    let seen = log.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    let upstream = &seen[0];
    assert_eq!(upstream.method, "GET");
    assert_eq!(upstream.path, "/authentication/otprequest");
    assert_eq!(upstream.query, "email=ops%40example.com");
    assert_eq!(upstream.header("gst_username"), Some("acme_user"));
    assert_eq!(upstream.header("state_cd"), Some("29"));
    assert_eq!(upstream.header("client_secret"), Some("shh"));
    assert_eq!(upstream.header("email"), None);
    assert_eq!(upstream.header("txn"), None);

    shutdown.trigger();
}

#[tokio::test]
async fn test_auth_token_upstream_error_stays_200() {
    let (backend, _log) = common::start_programmable_backend(|_req| async move {
        MockReply::new(401, r#"{"error":"invalid otp"}"#)
    })
    .await;
    let (gateway, shutdown) = common::start_gateway(&format!("http://{}", backend)).await;

    let reply = gateway_client(gateway)
        .request_auth_token("ops@example.com", "575757", "a1b2", &creds())
        .await
        .unwrap();

    assert_eq!(reply.status, 200);
    let envelope = reply.envelope().unwrap();
    assert!(!envelope.success);
    assert_eq!(envelope.message, r#"API Error: 401 - {"error":"invalid otp"}"#);
    assert_eq!(envelope.data, None);

    shutdown.trigger();
}

#[tokio::test]
async fn test_non_json_success_body_is_a_failure() {
    let (backend, _log) =
        common::start_programmable_backend(|_req| async move { MockReply::new(200, "<html>ok</html>") }).await;
    let (gateway, shutdown) = common::start_gateway(&format!("http://{}", backend)).await;

    let reply = gateway_client(gateway)
        .logout("ops@example.com", "a1b2", &creds())
        .await
        .unwrap();

    let envelope = reply.envelope().unwrap();
    assert!(!envelope.success);
    assert!(envelope.message.starts_with("Request failed: invalid JSON"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_json_returns_partial_failure() {
    let (backend, log) = common::start_programmable_backend(|req| async move {
        match req.path.as_str() {
            "/gstr1a/b2b" => MockReply::new(503, "maintenance"),
            path => MockReply::new(200, json!({ "path": path }).to_string()),
        }
    })
    .await;
    let (gateway, shutdown) = common::start_gateway("http://unused.invalid").await;

    let query = ReturnsQuery {
        gstin: "29ABCDE1234F1Z5".into(),
        retperiod: "042024".into(),
        email: "ops@example.com".into(),
        base_url: format!("http://{}", backend),
        endpoints: vec!["nil".into(), "b2b".into(), "retsum".into()],
    };
    let reply = gateway_client(gateway)
        .json_returns(&query, "a1b2", &creds())
        .await
        .unwrap();

    assert_eq!(reply.status, 200);
    let envelope = reply.envelope().unwrap();
    assert!(envelope.success);
    assert_eq!(
        envelope.message,
        "GSTR1A data aggregated successfully for endpoints: nil, b2b, retsum"
    );

    let data = envelope.data.unwrap();
    let keys: Vec<&String> = data.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["nil", "b2b", "retsum"]);
    assert_eq!(data["b2b"], json!({"error": "API Error: 503 - maintenance"}));
    assert_eq!(data["nil"], json!({"path": "/gstr1a/nil"}));

    let seen = log.lock().unwrap().clone();
    assert_eq!(seen.len(), 3);
    for req in &seen {
        assert!(req.query.contains("gstin=29ABCDE1234F1Z5"));
        assert!(req.query.contains("retperiod=042024"));
        assert_eq!(req.header("txn"), Some("a1b2"));
        assert_eq!(req.header("content-type"), Some("application/json"));
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_json_returns_rejects_unknown_sections_without_dispatch() {
    let (backend, log) =
        common::start_programmable_backend(|_req| async move { MockReply::new(200, "{}") }).await;
    let (gateway, shutdown) = common::start_gateway("http://unused.invalid").await;

    let query = ReturnsQuery {
        gstin: "29ABCDE1234F1Z5".into(),
        retperiod: "042024".into(),
        email: "ops@example.com".into(),
        base_url: format!("http://{}", backend),
        endpoints: vec!["b2b".into(), "bogus".into()],
    };
    let reply = gateway_client(gateway)
        .json_returns(&query, "a1b2", &creds())
        .await
        .unwrap();

    assert_eq!(reply.status, 400);
    let detail = reply.detail().unwrap();
    assert!(detail.starts_with("Invalid endpoints provided: bogus."));
    assert!(detail.contains("retsum") && detail.contains("txpa") && detail.contains("hsnsum"));
    assert!(log.lock().unwrap().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_json_returns_unreachable_upstream() {
    // Grab a free port, then close it so connections are refused.
    let closed = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let closed_addr = closed.local_addr().unwrap();
    drop(closed);

    let (gateway, shutdown) = common::start_gateway("http://unused.invalid").await;
    let query = ReturnsQuery {
        gstin: "29ABCDE1234F1Z5".into(),
        retperiod: "042024".into(),
        email: "ops@example.com".into(),
        base_url: format!("http://{}", closed_addr),
        endpoints: Vec::new(),
    };
    let reply = gateway_client(gateway)
        .json_returns(&query, "a1b2", &creds())
        .await
        .unwrap();

    assert_eq!(reply.status, 200);
    let envelope = reply.envelope().unwrap();
    assert!(envelope.success);
    let data = envelope.data.unwrap();
    let entries = data.as_object().unwrap();
    assert_eq!(entries.len(), 24);
    for (_, entry) in entries {
        assert!(entry["error"].as_str().unwrap().starts_with("Request failed:"));
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_redirect_is_reported_not_followed() {
    let (backend, log) = common::start_programmable_backend(|req| async move {
        match req.path.as_str() {
            "/gstr1a/b2b" => MockReply::redirect("/elsewhere", "moved"),
            _ => MockReply::new(200, r#"{"landed":1}"#),
        }
    })
    .await;
    let (gateway, shutdown) = common::start_gateway("http://unused.invalid").await;

    let query = ReturnsQuery {
        gstin: "29ABCDE1234F1Z5".into(),
        retperiod: "042024".into(),
        email: "ops@example.com".into(),
        base_url: format!("http://{}", backend),
        endpoints: vec!["b2b".into()],
    };
    let reply = gateway_client(gateway)
        .json_returns(&query, "a1b2", &creds())
        .await
        .unwrap();

    let data = reply.envelope().unwrap().data.unwrap();
    assert_eq!(data["b2b"], json!({"error": "API Error: 302 - moved"}));

    let seen = log.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].path, "/gstr1a/b2b");

    shutdown.trigger();
}

#[tokio::test]
async fn test_unlisted_upstream_status_is_passed_through() {
    let (backend, _log) = common::start_programmable_backend(|_req| async move {
        MockReply::new(422, r#"{"error":"bad email"}"#)
    })
    .await;
    let (gateway, shutdown) = common::start_gateway(&format!("http://{}", backend)).await;

    let reply = gateway_client(gateway)
        .refresh_token("ops@example.com", "a1b2", &creds())
        .await
        .unwrap();

    assert_eq!(reply.status, 200);
    let envelope = reply.envelope().unwrap();
    assert!(!envelope.success);
    assert_eq!(envelope.message, r#"API Error: 422 - {"error":"bad email"}"#);

    shutdown.trigger();
}
