mod api;
mod config;
mod storage;

use crate::api::AppState;
use crate::config::AppConfig;
use crate::storage::QaStore;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    info!("🚀 Starting Q&A API Server");

    // Load configuration
    let config = AppConfig::load()?;
    info!("📋 Configuration loaded");
    info!("   - Server: {}", config.bind_addr());

    // Connect to storage; exhausting the retry budget is fatal
    info!("💾 Connecting to database...");
    let store = QaStore::connect_with_retry(&config.database.url).await?;
    info!("✅ Database connection established");

    // Ensure tables exist, then report what we found
    info!("🗄️ Ensuring database schema...");
    store.ensure_schema().await?;
    store.log_table_stats().await?;
    info!("✅ Schema ready");

    // Build router with modular routes
    let app = api::router(AppState { store });

    // Start server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📡 Available endpoints:");
    info!("   GET    /questions              - List questions");
    info!("   POST   /questions              - Create question");
    info!("   GET    /questions/{{id}}         - Get question with answers");
    info!("   DELETE /questions/{{id}}         - Delete question");
    info!("   POST   /questions/{{id}}/answers - Create answer");
    info!("   GET    /answers/{{id}}           - Get answer");
    info!("   DELETE /answers/{{id}}           - Delete answer");
    info!("   GET    /health                 - Health check");
    info!("");
    info!("✨ Server is ready to accept requests!");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shut down gracefully");

    Ok(())
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received");
}
