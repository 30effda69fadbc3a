pub mod api;
pub mod config;
pub mod core_state;
pub mod db;
pub mod models;
pub mod pipeline;
pub mod report;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, ConfigError};
use crate::core_state::CoreState;
use crate::pipeline::llm::{GeminiClient, LlmClient, LlmError};

/// Fatal startup failures.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Model client error: {0}")]
    Llm(#[from] LlmError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Initialise logging, load configuration and serve until Ctrl-C.
///
/// The blocking model client is built before the async runtime starts;
/// reqwest's blocking client must not be created inside one.
pub fn run() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let app_config = AppConfig::from_env()?;
    let gemini = GeminiClient::new(&app_config.gemini)?;
    if !gemini.is_configured() {
        tracing::warn!("GEMINI_API_KEY is not set; model-backed endpoints will fail");
    }
    tracing::info!(
        model = gemini.model_name(),
        database = %app_config.database_path.display(),
        "Configuration loaded"
    );

    let bind_addr = app_config.bind_addr;
    let core = Arc::new(CoreState::new(app_config, Arc::new(gemini)));

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(serve(Arc::clone(&core), bind_addr));

    core.close();
    tracing::info!("{} stopped", config::APP_NAME);
    result
}

async fn serve(core: Arc<CoreState>, addr: std::net::SocketAddr) -> Result<(), StartupError> {
    let server = api::start_api_server(core, addr).await?;
    tracing::info!(addr = %server.addr, "Listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {e}");
    }
    server.stop().await;
    Ok(())
}
