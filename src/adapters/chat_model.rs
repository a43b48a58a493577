use crate::domain::ports::CompletionModel;
use crate::utils::error::ModelError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Settings for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct ChatModelSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub timeout: Duration,
}

/// Completion backend speaking the OpenAI chat-completions protocol
/// (Groq, OpenAI, local OpenAI-compatible servers). No retries.
#[derive(Debug, Clone)]
pub struct ChatCompletionModel {
    client: Client,
    settings: ChatModelSettings,
}

impl ChatCompletionModel {
    pub fn new(settings: ChatModelSettings) -> Result<Self, ModelError> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { client, settings })
    }
}

#[async_trait]
impl CompletionModel for ChatCompletionModel {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let request = ChatRequest {
            model: &self.settings.model,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(
            "POST {} (model {}, {} prompt chars)",
            self.settings.endpoint,
            self.settings.model,
            prompt.len()
        );

        let response = self
            .client
            .post(&self.settings.endpoint)
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => Some(body),
                Err(e) => {
                    tracing::warn!("Could not read error body for status {}: {}", status, e);
                    None
                }
            };
            return Err(ModelError::Api {
                status: status.as_u16(),
                message: api_error_message(status, body),
            });
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or(ModelError::NoChoices)
    }
}

/// Picks the most useful message from an error response: the API's own
/// `error.message`, then the raw body, then the status reason phrase.
fn api_error_message(status: StatusCode, body: Option<String>) -> String {
    match body {
        Some(body) if !body.trim().is_empty() => serde_json::from_str::<ApiErrorBody>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body),
        _ => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn model_for(server: &MockServer) -> ChatCompletionModel {
        ChatCompletionModel::new(ChatModelSettings {
            endpoint: server.url("/openai/v1/chat/completions"),
            model: "llama-3.1-70b-versatile".to_string(),
            api_key: "test-key".to_string(),
            temperature: 0.0,
            max_tokens: None,
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let server = MockServer::start();
        let chat_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/openai/v1/chat/completions")
                .header("authorization", "Bearer test-key")
                .json_body_partial(r#"{"model": "llama-3.1-70b-versatile", "temperature": 0.0}"#);
            then.status(200).json_body(json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "first"}},
                    {"message": {"role": "assistant", "content": "second"}}
                ]
            }));
        });

        let text = model_for(&server).complete("hello").await.unwrap();

        chat_mock.assert();
        assert_eq!(text, "first");
    }

    #[tokio::test]
    async fn test_api_error_message_is_extracted() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/openai/v1/chat/completions");
            then.status(429)
                .json_body(json!({"error": {"message": "Rate limit reached"}}));
        });

        let err = model_for(&server).complete("hello").await.unwrap_err();
        match err {
            ModelError::Api { status, message } => {
                assert_eq!(status, 429);
                assert_eq!(message, "Rate limit reached");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_choices_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/openai/v1/chat/completions");
            then.status(200).json_body(json!({"choices": []}));
        });

        let err = model_for(&server).complete("hello").await.unwrap_err();
        assert!(matches!(err, ModelError::NoChoices));
    }

    #[tokio::test]
    async fn test_null_content_is_empty_string() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/openai/v1/chat/completions");
            then.status(200)
                .json_body(json!({"choices": [{"message": {"role": "assistant", "content": null}}]}));
        });

        let text = model_for(&server).complete("hello").await.unwrap();
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_empty_error_body_uses_status_reason() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/openai/v1/chat/completions");
            then.status(503);
        });

        let err = model_for(&server).complete("hello").await.unwrap_err();
        match err {
            ModelError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "Service Unavailable");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unreadable_error_body_uses_status_reason() {
        assert_eq!(
            api_error_message(StatusCode::TOO_MANY_REQUESTS, None),
            "Too Many Requests"
        );
        assert_eq!(
            api_error_message(StatusCode::BAD_GATEWAY, Some("upstream down".to_string())),
            "upstream down"
        );
    }
}
