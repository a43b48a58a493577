use crate::domain::model::RawDocument;
use crate::utils::error::{ModelError, Result};
use async_trait::async_trait;
use url::Url;

/// Retrieves one page. Implementations report failures as `ColdMailError::Fetch`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<RawDocument>;
}

/// Text-completion backend shared by the extractor and the composer.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> std::result::Result<String, ModelError>;
}
