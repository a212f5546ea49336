mod api;
mod config;
mod error;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vitae_core::config::default_config_path;
use vitae_core::{Config, ResumeParser};

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vitae_web=debug,vitae_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("VITAE_CONFIG")
        .map_or_else(|_| default_config_path(), PathBuf::from);
    let config = Config::load(&config_path)?.with_env_overrides()?;

    // Refuse to serve without a working NER model.
    let parser = ResumeParser::from_config(&config).await?;
    let server = ServerConfig::from_env();
    let state = AppState::new(parser, server.clone());

    let app = api::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], server.port));
    tracing::info!("Starting vitae on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
