mod chart;
mod cli;
mod config;
mod jobs;
mod mailer;
mod pipeline;
mod readings;
mod store;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Mode};
use crate::config::load_config;

/// Routes `log` records into a JSON `tracing` subscriber filtered by `RUST_LOG`.
fn init_logging() {
    if let Err(error) = tracing_log::LogTracer::init() {
        eprintln!("log bridge already installed: {}", error);
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .json()
        .with_current_span(false)
        .with_span_list(false)
        .finish();

    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("tracing subscriber already installed: {}", error);
    }
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    let config = match load_config(&cli.config, &cli.env_file) {
        Ok(config) => config,
        Err(error) => {
            log::error!("config_load_failed code={} error={}", error.code(), error);
            return;
        }
    };

    let pipeline = match jobs::build_pipeline(&config) {
        Ok(pipeline) => pipeline,
        Err(error) => {
            log::error!("startup_failed code={} error={}", error.code(), error);
            return;
        }
    };

    log::info!(
        "climate_report_starting version={} mode={:?}",
        env!("CARGO_PKG_VERSION"),
        cli.mode.unwrap_or_default()
    );

    match cli.mode.unwrap_or_default() {
        Mode::Once => {
            jobs::run_once(&pipeline).await;
        }
        Mode::Schedule => {
            if let Err(error) = jobs::run_daily(&pipeline, &config).await {
                log::error!("scheduler_failed code={} error={}", error.code(), error);
            }
        }
    }
}
