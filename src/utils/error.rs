use std::fmt;
use thiserror::Error;

/// 管道階段，用於標示錯誤發生的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Extract => "job extraction",
        };
        f.write_str(name)
    }
}

/// Failure reported by a completion backend. Stages wrap it with their own context.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Response contained no choices")]
    NoChoices,
}

#[derive(Error, Debug)]
pub enum ColdMailError {
    #[error("Invalid URL '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },

    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Model call failed during {stage}: {source}")]
    Model {
        stage: Stage,
        #[source]
        source: ModelError,
    },

    #[error("Malformed model output: {reason}")]
    MalformedModelOutput { reason: String },

    /// `source` is set when the model call itself failed, `None` for an empty reply.
    #[error("Email generation failed for '{role}': {reason}")]
    GenerationFailed {
        role: String,
        reason: String,
        #[source]
        source: Option<ModelError>,
    },

    #[error("Portfolio error: {message}")]
    Portfolio { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Model,
    Data,
    Configuration,
    System,
}

impl ColdMailError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ColdMailError::InvalidUrl { .. } => ErrorCategory::Input,
            ColdMailError::Fetch { .. } => ErrorCategory::Network,
            ColdMailError::Model { .. } | ColdMailError::GenerationFailed { .. } => {
                ErrorCategory::Model
            }
            ColdMailError::MalformedModelOutput { .. }
            | ColdMailError::Portfolio { .. }
            | ColdMailError::Csv(_)
            | ColdMailError::Serialization(_) => ErrorCategory::Data,
            ColdMailError::ConfigValidation { .. }
            | ColdMailError::InvalidConfigValue { .. }
            | ColdMailError::MissingConfig { .. } => ErrorCategory::Configuration,
            ColdMailError::Io(_) => ErrorCategory::System,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ColdMailError::InvalidUrl { .. } => {
                "Invalid link. Please enter a valid URL.".to_string()
            }
            ColdMailError::Fetch { url, message } => {
                format!("Could not load the page at {}: {}", url, message)
            }
            ColdMailError::Model { stage, source } => {
                format!("The language model failed during {}: {}", stage, source)
            }
            ColdMailError::MalformedModelOutput { reason } => format!(
                "The language model returned job data in an unexpected shape: {}",
                reason
            ),
            ColdMailError::GenerationFailed { role, reason, .. } => {
                format!("Could not write an email for '{}': {}", role, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Enter an absolute http(s) URL, e.g. https://example.com/careers",
            ErrorCategory::Network => "Check that the page is reachable and try again",
            ErrorCategory::Model => "Check the model endpoint, API key and quota, then retry",
            ErrorCategory::Data => "Retry the request or inspect the portfolio file for bad rows",
            ErrorCategory::Configuration => "Fix the configuration file or command line flags",
            ErrorCategory::System => "Check file permissions and paths",
        }
    }
}

pub type Result<T> = std::result::Result<T, ColdMailError>;
