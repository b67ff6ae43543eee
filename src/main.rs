//! Memorial Tribute Backend server.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tribute_backend::config::Config;
use tribute_backend::{build_state, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Memorial Tribute Backend");
    tracing::info!("Storage: {:?}", config.storage);
    tracing::info!("Id scheme: {}", config.id_scheme.as_str());
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (TRIBUTE_API_PSK). Authentication is disabled!");
    }

    let bind_addr = config.bind_addr;
    let state = build_state(config).await?;
    tracing::info!(
        "Search index built with {} tributes",
        state.tributes.get_all().await.len()
    );

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
