use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use mondocks_gateway::{
    AppState, CommandGateway, app,
    config::{GatewayConfig, ServerConfig},
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let gateway_config = GatewayConfig::from_env().context("Failed to load gateway configuration")?;
    let server_config = ServerConfig::from_env().context("Failed to load server configuration")?;

    tracing::info!(
        "Forwarding commands to database '{}' ({:?} connections)",
        gateway_config.database_name,
        gateway_config.connection_mode
    );

    let state = AppState {
        gateway: Arc::new(CommandGateway::new(gateway_config)),
    };

    let listener = TcpListener::bind(server_config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", server_config.bind_addr))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app(state))
        .await
        .context("HTTP server exited with an error")?;

    Ok(())
}
