use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use daddi::persist;
use daddi::server::{router, AppState};
use daddi::settings::{Settings, DEFAULT_FILE};

#[tokio::main]
async fn main() -> daddi::Result<()> {
    // first argument, if any, names the settings file
    let file = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_FILE.to_string());
    let settings = Settings::load(&file)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let addr = settings.socket_addr()?;
    let connection = persist::open(&settings)?;
    let app = router(Arc::new(AppState::new(connection)));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
