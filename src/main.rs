//! Development server entry point.
//!
//! Runs the mock order-intake server so the apparel form can be exercised
//! locally without sending email or touching Google Sheets.

use anyhow::Result;
use tmw_apparel_form::server::{listen_for_shutdown_signals, OrderServer, ServerConfig};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    info!("🚀 Starting Te Mata Wānanga Apparel Form Server (Development Mode)...");

    let config = ServerConfig::from_env();
    let server = OrderServer::bind(config).await?;
    let port = server.local_addr()?.port();

    info!("🎉 TMW Apparel Form running on port {} (DEVELOPMENT MODE)", port);
    info!("🌐 Access your form at: http://localhost:{}", port);
    info!("📝 Note: This is development mode - form submissions will be mocked");
    info!("💡 No emails will be sent and no data will be saved to Google Sheets");

    tokio::spawn(listen_for_shutdown_signals(server.shutdown_handle()));
    server.serve().await?;

    Ok(())
}
