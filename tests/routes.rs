//! Metadata, health, status probe and middleware behavior.

use serde_json::{json, Value};

mod common;

use common::{MockDownstream, MockReply, TestGateway};

#[tokio::test]
async fn test_health_does_not_touch_downstream() {
    let downstream = MockDownstream::start(MockReply::json(500, "{}")).await;
    let gateway = TestGateway::spawn(common::config_for(&downstream.url())).await;

    let res = gateway.client.get(gateway.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "Predict Gateway");
    assert_eq!(downstream.hits(), 0);
}

#[tokio::test]
async fn test_root_describes_service() {
    let gateway = TestGateway::spawn(common::config_for("https://abc.trycloudflare.com/")).await;

    let res = gateway.client.get(gateway.url("/")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["downstream_url"], "https://abc.trycloudflare.com");
    assert!(body["endpoints"].get("/predict").is_some());
    assert!(body["endpoints"].get("/predict_batch").is_some());
    assert!(body["endpoints"].get("/debug/downstream-status").is_some());
}

#[tokio::test]
async fn test_status_online_includes_downstream_payload() {
    let routes = r#"[{"path":"/predict","methods":["POST"]},{"path":"/predict_batch","methods":["POST"]}]"#;
    let downstream = MockDownstream::start(MockReply::json(200, routes)).await;
    let gateway = TestGateway::spawn(common::config_for(&downstream.url())).await;

    let res = gateway
        .client
        .get(gateway.url("/debug/downstream-status"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "online");
    assert_eq!(body["downstream_url"], downstream.url());
    assert_eq!(body["endpoints"], serde_json::from_str::<Value>(routes).unwrap());
}

#[tokio::test]
async fn test_status_offline_with_status_code() {
    let downstream = MockDownstream::start(MockReply::json(503, "starting")).await;
    let gateway = TestGateway::spawn(common::config_for(&downstream.url())).await;

    let res = gateway
        .client
        .get(gateway.url("/debug/downstream-status"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "status": "offline",
            "status_code": 503,
            "downstream_url": downstream.url(),
        })
    );
}

#[tokio::test]
async fn test_status_offline_when_unreachable() {
    let dead = format!("http://{}", common::unused_address().await);
    let gateway = TestGateway::spawn(common::config_for(&dead)).await;

    let res = gateway
        .client
        .get(gateway.url("/debug/downstream-status"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "offline");
    assert!(body.get("status_code").is_none());
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_request_id_is_generated_or_echoed() {
    let gateway = TestGateway::spawn(common::config_for("http://127.0.0.1:9")).await;

    let res = gateway.client.get(gateway.url("/health")).send().await.unwrap();
    let generated = res.headers()["x-request-id"].to_str().unwrap().to_string();
    assert_eq!(generated.len(), 36);

    let res = gateway
        .client
        .get(gateway.url("/health"))
        .header("x-request-id", "trace-me-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "trace-me-123");
}

#[tokio::test]
async fn test_default_cors_allows_any_origin() {
    let gateway = TestGateway::spawn(common::config_for("http://127.0.0.1:9")).await;

    let res = gateway
        .client
        .get(gateway.url("/health"))
        .header("origin", "https://app.example.org")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_cors_can_be_restricted() {
    let mut config = common::config_for("http://127.0.0.1:9");
    config.cors.allow_origins = vec!["https://app.example.org".to_string()];
    let gateway = TestGateway::spawn(config).await;

    let allowed = gateway
        .client
        .get(gateway.url("/health"))
        .header("origin", "https://app.example.org")
        .send()
        .await
        .unwrap();
    assert_eq!(allowed.headers()["access-control-allow-origin"], "https://app.example.org");

    let denied = gateway
        .client
        .get(gateway.url("/health"))
        .header("origin", "https://evil.example.com")
        .send()
        .await
        .unwrap();
    assert!(denied.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_cors_can_be_disabled() {
    let mut config = common::config_for("http://127.0.0.1:9");
    config.cors.enabled = false;
    let gateway = TestGateway::spawn(config).await;

    let res = gateway
        .client
        .get(gateway.url("/health"))
        .header("origin", "https://app.example.org")
        .send()
        .await
        .unwrap();
    assert!(res.headers().get("access-control-allow-origin").is_none());
}
