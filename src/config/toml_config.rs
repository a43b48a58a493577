use crate::adapters::chat_model::ChatModelSettings;
use crate::adapters::http_fetcher::DEFAULT_USER_AGENT;
use crate::core::composer::SenderProfile;
use crate::core::matcher::DEFAULT_MATCH_LIMIT;
use crate::utils::error::{ColdMailError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range,
    validate_required_field, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub fetch: FetchConfig,
    pub portfolio: PortfolioConfig,
    pub composer: SenderProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub timeout_seconds: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "llama-3.1-70b-versatile".to_string(),
            api_key: None,
            temperature: 0.0,
            max_tokens: None,
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    pub path: String,
    pub match_limit: usize,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            path: "resource/my_portfolio.csv".to_string(),
            match_limit: DEFAULT_MATCH_LIMIT,
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ColdMailError::ConfigValidation {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GROQ_API_KEY})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// Falls back to the `GROQ_API_KEY` environment variable when no key is configured.
    pub fn with_env_api_key(mut self) -> Self {
        if self.model.api_key.is_none() {
            self.model.api_key = std::env::var("GROQ_API_KEY").ok();
        }
        self
    }

    pub fn chat_model_settings(&self) -> Result<ChatModelSettings> {
        let api_key = validate_required_field("model.api_key", &self.model.api_key)?;
        Ok(ChatModelSettings {
            endpoint: self.model.endpoint.clone(),
            model: self.model.model.clone(),
            api_key: api_key.clone(),
            temperature: self.model.temperature,
            max_tokens: self.model.max_tokens,
            timeout: Duration::from_secs(self.model.timeout_seconds),
        })
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch.timeout_seconds)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("model.endpoint", &self.model.endpoint)?;
        validate_non_empty_string("model.model", &self.model.model)?;

        let api_key = validate_required_field("model.api_key", &self.model.api_key)?;
        validate_non_empty_string("model.api_key", api_key)?;
        if api_key.starts_with("${") {
            return Err(ColdMailError::ConfigValidation {
                field: "model.api_key".to_string(),
                message: format!("Environment variable placeholder {} was not resolved", api_key),
            });
        }

        validate_range("model.temperature", self.model.temperature, 0.0, 2.0)?;
        validate_positive_number("model.timeout_seconds", self.model.timeout_seconds as usize, 1)?;
        validate_positive_number("fetch.timeout_seconds", self.fetch.timeout_seconds as usize, 1)?;
        validate_non_empty_string("fetch.user_agent", &self.fetch.user_agent)?;
        validate_path("portfolio.path", &self.portfolio.path)?;
        validate_positive_number("portfolio.match_limit", self.portfolio.match_limit, 1)?;
        validate_non_empty_string("composer.sender_name", &self.composer.sender_name)?;
        validate_non_empty_string("composer.company", &self.composer.company)?;

        Ok(())
    }
}
