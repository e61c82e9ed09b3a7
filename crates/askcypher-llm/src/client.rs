//! Azure OpenAI chat-completion client.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use askcypher_core::ConversationTurn;

use crate::token::TokenProvider;

/// Deterministic sampling: the same schema and question should produce
/// the same query.
const TEMPERATURE: f32 = 0.0;

/// Output ceiling for a single generated query.
const MAX_COMPLETION_TOKENS: u32 = 1000;

/// Errors from the completion service. None of these are retried here;
/// the caller decides.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Rate limited by completion service")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Completion API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid completion response: {0}")]
    InvalidResponse(String),
}

/// Produces a raw Cypher candidate from a conversation.
///
/// `AzureChatClient` is the production implementation; tests substitute
/// scripted generators to drive the healing loop.
#[async_trait]
pub trait QueryGenerator: Send + Sync {
    async fn generate(&self, conversation: &[ConversationTurn])
        -> Result<String, GenerationError>;
}

/// Configuration for the Azure OpenAI chat endpoint.
#[derive(Debug, Clone)]
pub struct AzureChatConfig {
    /// Resource endpoint, e.g. `https://myresource.openai.azure.com`.
    pub endpoint: String,
    /// Deployment name completions are routed to.
    pub deployment: String,
    /// API version query parameter, passed through verbatim.
    pub api_version: String,
}

/// Chat-completion client against one Azure OpenAI deployment.
pub struct AzureChatClient<P> {
    http: reqwest::Client,
    config: AzureChatConfig,
    tokens: P,
}

impl<P: TokenProvider> AzureChatClient<P> {
    pub fn new(config: AzureChatConfig, tokens: P) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            tokens,
        }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.deployment,
            self.config.api_version
        )
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: &'a [ConversationTurn],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Error body shape the API returns alongside non-2xx statuses.
#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[async_trait]
impl<P: TokenProvider> QueryGenerator for AzureChatClient<P> {
    async fn generate(
        &self,
        conversation: &[ConversationTurn],
    ) -> Result<String, GenerationError> {
        let token = self.tokens.bearer_token().await?;
        let body = ChatRequest {
            messages: conversation,
            temperature: TEMPERATURE,
            max_tokens: MAX_COMPLETION_TOKENS,
        };

        let response = self
            .http
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {token}"))
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let parsed: ChatResponse = response
                .json()
                .await
                .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;
            let choice = parsed.choices.into_iter().next().ok_or_else(|| {
                GenerationError::InvalidResponse("no choices in completion response".to_string())
            })?;
            tracing::debug!(
                deployment = %self.config.deployment,
                "Received completion"
            );
            Ok(choice.message.content)
        } else {
            let retry_after_ms = parse_retry_after_ms(response.headers());
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);

            Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationError::Auth(message),
                StatusCode::TOO_MANY_REQUESTS => GenerationError::RateLimited { retry_after_ms },
                _ => GenerationError::Api {
                    status: status.as_u16(),
                    message,
                },
            })
        }
    }
}

fn parse_retry_after_ms(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<f64>().ok())
        .map(|seconds| (seconds * 1000.0) as u64)
}

impl<P> std::fmt::Debug for AzureChatClient<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureChatClient")
            .field("endpoint", &self.config.endpoint)
            .field("deployment", &self.config.deployment)
            .field("api_version", &self.config.api_version)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::StaticTokenProvider;

    #[test]
    fn test_completions_url_shape() {
        let client = AzureChatClient::new(
            AzureChatConfig {
                endpoint: "https://myresource.openai.azure.com/".to_string(),
                deployment: "gpt-4".to_string(),
                api_version: "2024-02-01".to_string(),
            },
            StaticTokenProvider::new("t"),
        );
        assert_eq!(
            client.completions_url(),
            "https://myresource.openai.azure.com/openai/deployments/gpt-4/chat/completions?api-version=2024-02-01"
        );
    }

    #[test]
    fn test_request_body_uses_fixed_sampling() {
        let turns = vec![ConversationTurn::user("count the nodes")];
        let body = ChatRequest {
            messages: &turns,
            temperature: TEMPERATURE,
            max_tokens: MAX_COMPLETION_TOKENS,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["temperature"], serde_json::json!(0.0));
        assert_eq!(value["max_tokens"], serde_json::json!(1000));
        assert_eq!(value["messages"][0]["role"], serde_json::json!("user"));
    }

    #[test]
    fn test_response_parsing_takes_first_choice() {
        let raw = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "MATCH (n) RETURN count(n)"}},
                {"message": {"role": "assistant", "content": "unused"}}
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        let first = parsed.choices.into_iter().next().unwrap();
        assert_eq!(first.message.content, "MATCH (n) RETURN count(n)");
    }

    #[test]
    fn test_api_error_body_parsing() {
        let raw = r#"{"error": {"code": "401", "message": "bad token"}}"#;
        let parsed: ApiErrorBody = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.error.message, "bad token");
    }

    #[test]
    fn test_retry_after_header_parsing() {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("retry-after", "1.5".parse().unwrap());
        assert_eq!(parse_retry_after_ms(&headers), Some(1500));
        headers.clear();
        assert_eq!(parse_retry_after_ms(&headers), None);
    }
}
