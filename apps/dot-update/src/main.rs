mod airtable;
mod config;
mod errors;
mod llm_client;
mod routes;
mod state;
mod update;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::airtable::AirtableClient;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Dot Update v{}", env!("CARGO_PKG_VERSION"));

    let update_prompt = config.load_update_prompt()?;
    match &config.update_prompt_path {
        Some(path) => info!("Update prompt loaded from {}", path.display()),
        None => info!("Using built-in update prompt"),
    }

    let llm = LlmClient::new(config.anthropic_api_key.clone(), &config.anthropic_api_url)?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let airtable = AirtableClient::new(
        config.airtable_api_key.clone(),
        &config.airtable_api_url,
        &config.airtable_base_id,
        &config.airtable_projects_table,
    )?;
    info!(
        "Airtable client initialized (base: {}, table: {})",
        config.airtable_base_id, config.airtable_projects_table
    );

    let state = AppState {
        llm,
        airtable,
        update_prompt: Arc::from(update_prompt),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
