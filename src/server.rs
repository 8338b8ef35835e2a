//! Mock order-intake server.
//!
//! Presents the same HTTP contract as the deployed Netlify function, but
//! fabricates the confirmation instead of sending email or writing to
//! Google Sheets. Submission bodies are logged and otherwise ignored.

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    handler::HandlerWithoutStateExt,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::signal::unix;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

const DEFAULT_PORT: u16 = 3000;
const ORDER_NUMBER_PREFIX: &str = "TMW-DEV-";

/// Listening port and static-file root for the dev server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub static_root: PathBuf,
}

impl ServerConfig {
    /// Reads `PORT` from the environment, falling back to 3000 when unset or
    /// unparseable. Static files are served from the working directory.
    pub fn from_env() -> Self {
        Self {
            port: parse_port(env::var("PORT").ok().as_deref()),
            static_root: PathBuf::from("."),
        }
    }
}

fn parse_port(raw: Option<&str>) -> u16 {
    raw.and_then(|v| v.parse().ok()).unwrap_or(DEFAULT_PORT)
}

/// Mock confirmation returned for every submission in dev mode.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub success: bool,
    pub message: String,
    pub order_number: String,
    pub note: String,
}

struct ServerError(anyhow::Error);

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        error!("❌ Error processing request: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "success": false, "error": self.0.to_string() })),
        )
            .into_response()
    }
}

impl<E> From<E> for ServerError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[derive(Clone)]
struct AppState {
    static_root: PathBuf,
}

/// The dev server as an explicit lifecycle object: `bind` claims the socket,
/// `serve` runs until the shutdown token is cancelled. Signal handlers cancel
/// the token; the caller decides the exit code.
pub struct OrderServer {
    listener: TcpListener,
    router: Router,
    shutdown: CancellationToken,
}

impl OrderServer {
    pub async fn bind(config: ServerConfig) -> Result<Self> {
        let listener = TcpListener::bind(("0.0.0.0", config.port))
            .await
            .with_context(|| format!("failed to bind port {}", config.port))?;
        Ok(Self {
            listener,
            router: app(&config),
            shutdown: CancellationToken::new(),
        })
    }

    /// Actual bound address (useful when binding port 0).
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Clone of the shutdown token; cancelling it stops `serve`.
    pub fn shutdown_handle(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Serves requests until the shutdown token is cancelled.
    pub async fn serve(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(self.shutdown.cancelled_owned())
            .await?;
        Ok(())
    }
}

/// Builds the router: explicit routes first, then the static-file tree as the
/// fallback, with the JSON 404 behind it for anything that misses both.
pub fn app(config: &ServerConfig) -> Router {
    let serve_dir = ServeDir::new(&config.static_root)
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(handle_404.into_service());

    Router::new()
        .route("/", get(index))
        .route("/.netlify/functions/submit-order", post(submit_order))
        .route("/health", get(health))
        .fallback_service(serve_dir)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState {
            static_root: config.static_root.clone(),
        })
}

/// Cancels the token once SIGINT or SIGTERM arrives.
pub async fn listen_for_shutdown_signals(shutdown: CancellationToken) {
    let mut sigint =
        unix::signal(unix::SignalKind::interrupt()).expect("Failed to set up SIGINT handler");
    let mut sigterm =
        unix::signal(unix::SignalKind::terminate()).expect("Failed to set up SIGTERM handler");

    tokio::select! {
        _ = sigint.recv() => (),
        _ = sigterm.recv() => (),
    }

    info!("🛑 Received shutdown signal, shutting down gracefully");
    shutdown.cancel();
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, ServerError> {
    info!("📄 Serving index.html");
    let path = state.static_root.join("index.html");
    let contents = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(Html(contents))
}

async fn submit_order(
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<OrderConfirmation>, ServerError> {
    let payload = decode_submission(&headers, &body);
    info!("📧 Received form submission (DEV MODE): {}", payload);

    let order_number = mock_order_number();

    info!("✅ Order processed successfully (MOCK)");

    Ok(Json(OrderConfirmation {
        success: true,
        message: "Order processed successfully (Development Mode - No emails sent)".to_string(),
        order_number,
        note: "This is development mode. No emails were sent and no data was saved.".to_string(),
    }))
}

async fn health() -> Json<Value> {
    Json(serde_json::json!({
        "status": "OK",
        "mode": "development",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn handle_404(uri: Uri) -> (StatusCode, Json<Value>) {
    warn!("⚠️ 404 - Not found: {}", uri.path());
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found" })),
    )
}

fn mock_order_number() -> String {
    format!("{}{}", ORDER_NUMBER_PREFIX, Utc::now().timestamp_millis())
}

/// Decodes the submission body into an opaque map for logging. The shape is
/// never validated; anything undecodable is logged as null.
fn decode_submission(headers: &HeaderMap, body: &Bytes) -> Value {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if content_type.starts_with("application/json") {
        serde_json::from_slice(body).unwrap_or(Value::Null)
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        match serde_urlencoded::from_bytes::<Vec<(String, String)>>(body) {
            Ok(pairs) => Value::Object(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect(),
            ),
            Err(_) => Value::Null,
        }
    } else {
        Value::Null
    }
}
