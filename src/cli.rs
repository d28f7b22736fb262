use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "climate_report", version, about = "Daily temperature and humidity chart mailer")]
pub struct Cli {
    /// Optional TOML file with report and schedule settings.
    #[arg(long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Dotenv file for local runs; the process environment takes precedence.
    #[arg(long, default_value = ".env")]
    pub env_file: PathBuf,

    #[command(subcommand)]
    pub mode: Option<Mode>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Subcommand)]
pub enum Mode {
    /// Build and send one report, then exit.
    #[default]
    Once,
    /// Keep running and send the report every day at the configured time.
    Schedule,
}
