use habitrack::gateway::{BackendGateway, RestBackend};
use habitrack::{router, AppConfig, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = AppConfig::from_env()?;
    let backend: Arc<dyn BackendGateway> = Arc::new(RestBackend::new(
        config.backend_url.clone(),
        config.backend_api_key.clone(),
    ));

    let state = AppState::bootstrap(backend).await;
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to install shutdown handler: {err}");
        std::future::pending::<()>().await;
    }
}
