use crate::domain::model::RawDocument;
use crate::domain::ports::PageFetcher;
use crate::utils::error::{ColdMailError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| ColdMailError::ConfigValidation {
                field: "fetch".to_string(),
                message: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &Url) -> Result<RawDocument> {
        let fetch_error = |message: String| ColdMailError::Fetch {
            url: url.to_string(),
            message,
        };

        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        tracing::debug!("Page response status: {}", status);
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP status {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| fetch_error(format!("Failed to read response body: {}", e)))?;

        Ok(RawDocument {
            url: url.to_string(),
            body,
        })
    }
}
