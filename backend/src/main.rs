use std::net::SocketAddr;

use college_manager_backend::{create_router, initialize_backend, AppConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load()?;
    info!("Using data directory {}", config.data_directory.display());

    let app_state = initialize_backend(&config)?;
    let app = create_router(app_state, &config.cors_origin)?;

    let addr: SocketAddr = config.bind_address.parse()?;
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
