//! Minimal client for an OpenAI-compatible chat-completion API.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::prompt::ChatRequest;

/// Longest slice of an error body kept for logging.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Errors from a single provider call.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection, TLS or timeout failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },

    /// The response envelope could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat-completion client. Built once at startup when an API key is present.
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    pub fn new(
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("tianfu-server/", env!("CARGO_PKG_VERSION"))),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Send one request and return the first choice's message text, or
    /// `"{}"` when the provider returned none.
    pub async fn complete(&self, request: &ChatRequest) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(url = %url, model = %request.model, "Calling chat-completion provider");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.is_empty())
            .unwrap_or_else(|| "{}".to_string());

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::prompt::build_request;
    use crate::test_support::MockProvider;

    fn client_for(base_url: String) -> OpenAiClient {
        OpenAiClient::new("sk-test".into(), base_url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_returns_first_choice_content() {
        let mock = MockProvider::replying_with_content("{\"salutation\":\"小明\"}");
        let client = client_for(mock.spawn().await);

        let request = build_request("base", "平安 / 安息", "小明", "gpt-4o-mini");
        let content = client.complete(&request).await.unwrap();
        assert_eq!(content, "{\"salutation\":\"小明\"}");

        let seen = mock.requests().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].authorization.as_deref(), Some("Bearer sk-test"));
        assert_eq!(seen[0].body["model"], "gpt-4o-mini");
        assert_eq!(seen[0].body["response_format"]["type"], "json_object");
    }

    #[tokio::test]
    async fn test_missing_choices_yield_empty_object() {
        let mock = MockProvider::new(StatusCode::OK, json!({ "choices": [] }));
        let client = client_for(mock.spawn().await);

        let content = client.complete(&build_request("b", "t", "n", "m")).await.unwrap();
        assert_eq!(content, "{}");
    }

    #[tokio::test]
    async fn test_error_status() {
        let mock = MockProvider::new(
            StatusCode::UNAUTHORIZED,
            json!({ "error": { "message": "bad key" } }),
        );
        let client = client_for(mock.spawn().await);

        let err = client.complete(&build_request("b", "t", "n", "m")).await.unwrap_err();
        match err {
            ProviderError::Status { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("bad key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_provider() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let client = client_for("http://127.0.0.1:9/v1".into());
        let err = client.complete(&build_request("b", "t", "n", "m")).await.unwrap_err();
        assert!(matches!(err, ProviderError::Network(_)));
    }
}
