use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use sales_summary::config::{Config, ConfigError};
use sales_summary::execution::{ExecutionEngine, TracingExecutionObserver};
use sales_summary::http;
use sales_summary::ingestion::{load_dataset, LoadOptions, TracingObserver};
use sales_summary::service::SummaryService;

#[tokio::main]
async fn main() -> Result<()> {
    // An explicit path argument wins over the default lookup.
    let (config, config_note) = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => (Config::load_from(&path)?, None),
        None => match Config::load() {
            Ok(config) => (config, None),
            Err(ConfigError::NotFound) => (Config::default(), Some("no config file found")),
            Err(e) => return Err(e.into()),
        },
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.to_lowercase())),
        )
        .init();

    if let Some(note) = config_note {
        warn!("{note}, using default configuration");
    }
    info!("Starting sales-summary v{}", env!("CARGO_PKG_VERSION"));

    let load_opts = LoadOptions {
        observer: Some(Arc::new(TracingObserver)),
        ..Default::default()
    };
    let dataset = load_dataset(&config.dataset.path, &load_opts)
        .with_context(|| format!("loading dataset {}", config.dataset.path.display()))?;

    let mut service = SummaryService::new(dataset);
    if config.execution.parallel {
        let engine = ExecutionEngine::new(config.execution.options())?
            .with_observer(Arc::new(TracingExecutionObserver));
        service = service.with_execution(engine, config.execution.parallel_threshold_rows);
    }

    let app = http::router(Arc::new(service));
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
