//! FraudScan Server
//!
//! Serves fraud predictions for job postings over HTTP, or runs the sample
//! postings through every model with `smoke`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use fraudscan_server::{cors_layer, create_router, smoke, AppState, ConfigOverrides, ServerConfig};
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "fraudscan-server")]
#[command(about = "Job posting fraud classifier API", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "fraudscan.yaml", global = true)]
    config: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    overrides: ConfigOverrides,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server (default)
    Serve,

    /// Run sample postings through every registered model and exit
    Smoke,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = ServerConfig::load(&cli.config, &cli.overrides)?;
    info!("Configuration loaded");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Smoke => run_smoke(config).await,
    }
}

async fn serve(config: ServerConfig) -> Result<()> {
    info!("Starting FraudScan server");

    let metrics_handle = init_metrics()?;
    let state = AppState::from_config(&config, Some(metrics_handle))?;

    if !config.preload.is_empty() {
        info!("Preloading models: {}", config.preload.join(", "));
        state.service.cache().preload(&config.preload).await?;
    }

    let origins = config.cors_origin_list();
    info!("CORS allowed origins: {}", origins.join(", "));
    let app = create_router(state, cors_layer(&origins)?);

    let addr: SocketAddr = config.socket_addr().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            warn!("Shutdown signal received, stopping server...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn run_smoke(config: ServerConfig) -> Result<()> {
    let state = AppState::from_config(&config, None)?;
    let outcomes = smoke::run(&state.service).await;
    print!("{}", smoke::render(&outcomes));

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed > 0 {
        warn!("{} of {} smoke predictions failed", failed, outcomes.len());
    }
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("fraudscan=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fraudscan=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!("fraudscan_requests_total", "Total number of prediction requests");
    metrics::describe_counter!("fraudscan_errors_total", "Total number of failed predictions by kind");
    metrics::describe_histogram!(
        "fraudscan_prediction_latency_us",
        metrics::Unit::Microseconds,
        "End-to-end prediction latency in microseconds"
    );
    metrics::describe_counter!("fraudscan_model_loads_total", "Total number of model artifact loads");
    metrics::describe_counter!(
        "fraudscan_low_confidence_total",
        "Predictions whose confidence fell below 0.5"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
