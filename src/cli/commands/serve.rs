use anyhow::Result;
use tracing::info;

use crate::adapters::http::{PokemonHttpConfig, PokemonHttpServer};
use crate::cli::context::AppPokemonService;
use crate::cli::types::ServeArgs;
use crate::domain::models::ServerConfig;

/// Handle serve command
///
/// Runs until Ctrl-C, then drains in-flight requests.
pub async fn execute(args: ServeArgs, server: &ServerConfig, service: AppPokemonService) -> Result<()> {
    let mut config = PokemonHttpConfig::from(server);
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    PokemonHttpServer::new(service, config)
        .serve_with_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server failed: {e}"))?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl-C");
        return;
    }
    info!("shutdown signal received");
}
