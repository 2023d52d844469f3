use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod artifacts;
mod classifier;
mod classifiers;
mod config;
mod error;
mod predictor;
mod preprocessing;
mod record;
mod server;
mod ui;

#[derive(Parser, Debug)]
#[command(name = "cardio-predict-server")]
#[command(about = "Heart disease prediction form backed by pre-fitted encoders, scaler and model")]
#[command(version)]
pub struct Args {
    /// Host address to bind to
    #[arg(long, env = "CARDIO_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "CARDIO_PORT", default_value = "8501")]
    pub port: u16,

    /// Directory holding encoders.json, scaler.json and model.json
    #[arg(long, env = "CARDIO_ARTIFACTS_DIR", default_value = "artifacts")]
    pub artifacts_dir: String,

    /// Encoder set file (overrides <artifacts-dir>/encoders.json)
    #[arg(long, env = "CARDIO_ENCODERS")]
    pub encoders: Option<String>,

    /// Scaler file (overrides <artifacts-dir>/scaler.json)
    #[arg(long, env = "CARDIO_SCALER")]
    pub scaler: Option<String>,

    /// Model file (overrides <artifacts-dir>/model.json)
    #[arg(long, env = "CARDIO_MODEL")]
    pub model: Option<String>,

    /// Page language ("en" or "fr")
    #[arg(long, env = "CARDIO_LANGUAGE", default_value = "en")]
    pub language: String,

    /// Maximum request body size in bytes (default: 64KB)
    #[arg(long, env = "CARDIO_MAX_BODY_SIZE", default_value = "65536")]
    pub max_body_size: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::try_from(args)?;

    tracing::info!(
        "Starting cardio-predict-server v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Binding to {}:{}", config.host, config.port);

    server::run(config).await
}
