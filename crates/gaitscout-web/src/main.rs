//! Gaitscout web server.
//!
//! Run with: cargo run -p gaitscout-web

use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = gaitscout_common::AppConfig::load(None)?;
    let addr: SocketAddr = config.bind_addr.parse()?;

    info!(data_dir = %config.data_dir.display(), "Starting Gaitscout server");

    let state = gaitscout_web::state::AppState::new(config);
    let app = gaitscout_web::router::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
