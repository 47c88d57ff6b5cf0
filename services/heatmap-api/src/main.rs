//! Methane plume heatmap API service.
//!
//! HTTP server that rasterizes plume detections from the catalog
//! collaborator into a fixed-resolution grid, runs the optional
//! prediction model, and serves the result as a translucent map overlay.

use std::{env, net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Result;
use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use clap::Parser;
use heatmap_api::{handlers, state::AppState};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "heatmap-api")]
#[command(about = "Methane plume heatmap API server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Base URL of the plume catalog API
    #[arg(long, env = "CATALOG_URL", default_value = "http://localhost:9090/api/v1")]
    catalog_url: String,

    /// Path to the prediction model artifact (optional; without it the
    /// service returns the rasterized grid unchanged)
    #[arg(long, env = "MODEL_PATH")]
    model_path: Option<PathBuf>,

    /// Grid resolution (cells per side)
    #[arg(long, env = "GRID_SIZE", default_value_t = 128)]
    grid_size: usize,

    /// Number of tokio worker threads (default: number of CPU cores)
    #[arg(long)]
    worker_threads: Option<usize>,
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build tokio runtime with configurable worker threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    } else if let Ok(threads_str) = env::var("TOKIO_WORKER_THREADS") {
        if let Ok(threads) = threads_str.parse::<usize>() {
            runtime_builder.worker_threads(threads);
        }
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(args))?;
    Ok(())
}

async fn async_main(args: Args) -> Result<()> {
    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Initialize Prometheus metrics exporter
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .map_err(|err| anyhow::anyhow!("Failed to install Prometheus recorder: {err}"))?;

    info!("Starting heatmap API server");

    let state = Arc::new(AppState::new(
        &args.catalog_url,
        args.model_path,
        args.grid_size,
    )?);

    let app = Router::new()
        .route("/api/predict", post(handlers::predict_handler))
        .route("/api/plumes", get(handlers::plumes_handler))
        // Health check
        .route("/health", get(handlers::health_handler))
        .route("/ready", get(handlers::ready_handler))
        // Metrics
        .route("/metrics", get(handlers::metrics_handler))
        .layer(Extension(state))
        .layer(Extension(prometheus_handle))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = args.listen.parse()?;
    info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
