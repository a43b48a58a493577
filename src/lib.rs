pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{load_portfolio, ChatCompletionModel, HttpPageFetcher};
pub use app::{DisplayedError, Shell, Submission};
pub use config::AppConfig;
pub use core::pipeline::{ColdMailPipeline, JobOutcome};
pub use utils::error::{ColdMailError, Result};
