pub mod api;
pub mod config;
pub mod intelligence; // Red flags, safety checks, triage decision
pub mod models;
pub mod pipeline; // Extraction, retrieval, Ollama client

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::api::ApiContext;
use crate::config::{AppConfig, ConfigError};
use crate::intelligence::SafetyError;
use crate::pipeline::ollama::OllamaError;
use crate::pipeline::retrieval::RetrievalError;

/// Anything that stops the service from coming up.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Safety(#[from] SafetyError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Ollama(#[from] OllamaError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Initialize `tracing`. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

/// Load configuration, build services, and serve until Ctrl-C.
///
/// Services are built before the tokio runtime exists because the Ollama
/// client is blocking.
pub fn run() -> Result<(), StartupError> {
    init_tracing();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env()?;
    tracing::info!(
        bind = %config.bind_addr,
        data_dir = %config.data_dir.display(),
        retrieval = %config.retrieval,
        extraction_model = config.extraction_model.as_deref().unwrap_or("none"),
        "Configuration loaded"
    );

    let ctx = ApiContext::from_config(&config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let mut server = api::start_server(ctx.clone(), config.bind_addr).await?;

        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {e}");
        }

        server.shutdown();
        server.wait().await;
        Ok::<(), StartupError>(())
    })?;

    tracing::info!("{} stopped", config::APP_NAME);
    Ok(())
}
