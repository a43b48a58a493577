#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub use toml_config::AppConfig;

#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "cold-mail")]
#[command(about = "Generate cold outreach emails from a job posting page")]
pub struct CliConfig {
    #[arg(long, short, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, short, help = "Job page URL; omit to enter URLs interactively")]
    pub url: Option<String>,

    #[arg(long, help = "Portfolio CSV path (overrides portfolio.path)")]
    pub portfolio: Option<String>,

    #[arg(long, help = "Maximum portfolio links per email (overrides portfolio.match_limit)")]
    pub limit: Option<usize>,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
