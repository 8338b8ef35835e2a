//! End-to-end tests for the mock order server: bind an ephemeral port inside
//! a temp directory and drive the HTTP contract with a real client.

use serde_json::Value;
use std::time::Duration;
use tempfile::TempDir;
use tmw_apparel_form::server::{OrderServer, ServerConfig};
use tokio_util::sync::CancellationToken;

struct TestApp {
    addr: String,
    shutdown: CancellationToken,
    _root: TempDir,
}

async fn spawn_app(with_index: bool) -> TestApp {
    let root = TempDir::new().expect("temp dir");
    if with_index {
        std::fs::write(
            root.path().join("index.html"),
            "<html><body>TMW Apparel Order Form</body></html>",
        )
        .expect("write index.html");
    }

    let config = ServerConfig {
        port: 0,
        static_root: root.path().to_path_buf(),
    };
    let server = OrderServer::bind(config).await.expect("bind");
    let addr = format!("http://127.0.0.1:{}", server.local_addr().expect("addr").port());
    let shutdown = server.shutdown_handle();
    tokio::spawn(server.serve());

    TestApp {
        addr,
        shutdown,
        _root: root,
    }
}

#[tokio::test]
async fn health_reports_ok_with_parseable_timestamp() {
    let app = spawn_app(true).await;

    let resp = reqwest::get(format!("{}/health", app.addr)).await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "OK");
    assert_eq!(body["mode"], "development");

    let ts = body["timestamp"].as_str().expect("timestamp string");
    assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok(), "{ts}");
}

#[tokio::test]
async fn json_submission_returns_mock_confirmation() {
    let app = spawn_app(true).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/.netlify/functions/submit-order", app.addr))
        .json(&serde_json::json!({ "garment": "hoodie", "size": "XL", "qty": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["orderNumber"]
        .as_str()
        .unwrap()
        .starts_with("TMW-DEV-"));
    assert!(body["message"].as_str().unwrap().contains("Development Mode"));
    assert!(body["note"].as_str().unwrap().contains("No emails were sent"));
}

#[tokio::test]
async fn form_encoded_submission_is_accepted() {
    let app = spawn_app(true).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/.netlify/functions/submit-order", app.addr))
        .form(&[("garment", "tee"), ("size", "M")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn submission_body_is_never_validated() {
    let app = spawn_app(true).await;

    // Malformed JSON and an empty body both get a mocked confirmation.
    let client = reqwest::Client::new();
    for payload in ["not valid json {{{", ""] {
        let resp = client
            .post(format!("{}/.netlify/functions/submit-order", app.addr))
            .header("content-type", "application/json")
            .body(payload)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["success"], true);
    }
}

#[tokio::test]
async fn order_numbers_differ_across_timestamps() {
    let app = spawn_app(true).await;
    let client = reqwest::Client::new();

    let mut numbers = Vec::new();
    for _ in 0..2 {
        let resp = client
            .post(format!("{}/.netlify/functions/submit-order", app.addr))
            .json(&serde_json::json!({}))
            .send()
            .await
            .unwrap();
        let body: Value = resp.json().await.unwrap();
        numbers.push(body["orderNumber"].as_str().unwrap().to_string());
        // Land the second request in a later millisecond; same-millisecond
        // collisions are documented and accepted.
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    assert_ne!(numbers[0], numbers[1]);
}

#[tokio::test]
async fn unknown_routes_return_json_404() {
    let app = spawn_app(true).await;

    let resp = reqwest::get(format!("{}/nonexistent", app.addr)).await.unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "error": "Not found" }));

    // Non-GET methods on unknown paths get the same 404 shape.
    let resp = reqwest::Client::new()
        .post(format!("{}/nope", app.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn index_serves_the_form_html() {
    let app = spawn_app(true).await;

    let resp = reqwest::get(format!("{}/", app.addr)).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert!(resp.text().await.unwrap().contains("TMW Apparel Order Form"));
}

#[tokio::test]
async fn missing_index_is_not_a_200() {
    let app = spawn_app(false).await;

    let resp = reqwest::get(format!("{}/", app.addr)).await.unwrap();
    assert_ne!(resp.status(), 200);
}

#[tokio::test]
async fn static_assets_are_served_at_relative_paths() {
    let app = spawn_app(true).await;
    std::fs::write(app._root.path().join("style.css"), "body { margin: 0; }").unwrap();

    let resp = reqwest::get(format!("{}/style.css", app.addr)).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .contains("css"));
    assert_eq!(resp.text().await.unwrap(), "body { margin: 0; }");
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let app = spawn_app(true).await;

    let resp = reqwest::Client::new()
        .get(format!("{}/health", app.addr))
        .header("origin", "http://example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.headers().contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn cancelling_the_shutdown_token_stops_the_server() {
    let root = TempDir::new().unwrap();
    let server = OrderServer::bind(ServerConfig {
        port: 0,
        static_root: root.path().to_path_buf(),
    })
    .await
    .unwrap();

    let shutdown = server.shutdown_handle();
    let handle = tokio::spawn(server.serve());

    shutdown.cancel();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop after shutdown");
    assert!(result.unwrap().is_ok());
}

#[tokio::test]
async fn server_stays_up_after_shutdown_of_another_instance() {
    // Two independent instances: stopping one must not affect the other.
    let app_a = spawn_app(true).await;
    let app_b = spawn_app(true).await;

    app_a.shutdown.cancel();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let resp = reqwest::get(format!("{}/health", app_b.addr)).await.unwrap();
    assert_eq!(resp.status(), 200);
}
