//! Language-model provider abstraction and the OpenAI implementation.
//!
//! The pipeline talks to [`AnswerProvider`]; the shipped backend calls
//! the OpenAI chat-completions API. Provider-specific failures are
//! normalized into [`ProviderError`] sub-kinds so callers pattern-match
//! instead of grepping message strings.
//!
//! No retry is attempted here. Retry policy, if any, is the caller's
//! responsibility.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::error::ProviderError;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Fixed system instruction constraining the assistant.
const SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions about PDF \
documents. Keep your responses concise and focused on the question.";

/// Language-model collaborator: given an assembled context and the
/// user's question, returns generated answer text.
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    async fn generate(&self, context: &str, query: &str) -> Result<String, ProviderError>;
}

/// OpenAI chat-completions backend with bounded generation parameters
/// and a per-request timeout.
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Fails fast when no API key was resolved at config load.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = config.api_key.clone().context(
            "provider API key not configured — set provider.api_key or OPENAI_API_KEY",
        )?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            client,
        })
    }
}

#[async_trait]
impl AnswerProvider for OpenAiProvider {
    async fn generate(&self, context: &str, query: &str) -> Result<String, ProviderError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_user_message(context, query) },
            ],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        debug!(model = %self.model, "calling chat-completions API");

        let resp = self
            .client
            .post(OPENAI_CHAT_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::unavailable("request timed out")
                } else {
                    ProviderError::unavailable(e.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body_text));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ProviderError::malformed_response(e.to_string()))?;
        extract_answer(&json)
    }
}

/// User message: the retrieved passages, then the question.
fn build_user_message(context: &str, query: &str) -> String {
    format!(
        "Here are the most relevant passages from the PDF:\n\n{}\n\nPlease answer this question about the PDF: {}",
        context, query
    )
}

/// Map a non-success response to a [`ProviderError`] sub-kind. The error
/// body's `error.code` is authoritative where present; the HTTP status is
/// the fallback signal.
fn classify_failure(status: StatusCode, body: &str) -> ProviderError {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let error_obj = parsed.as_ref().and_then(|v| v.get("error"));
    let code = error_obj.and_then(|e| e.get("code")).and_then(|c| c.as_str());
    let detail = error_obj
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("HTTP {}", status));

    match code {
        Some("insufficient_quota") => ProviderError::quota_exceeded(&detail),
        Some("invalid_api_key") => ProviderError::invalid_credentials(&detail),
        _ => match status.as_u16() {
            401 | 403 => ProviderError::invalid_credentials(&detail),
            _ => ProviderError::unavailable(format!("HTTP {}: {}", status, detail)),
        },
    }
}

/// Pull `choices[0].message.content` out of a success response.
fn extract_answer(json: &serde_json::Value) -> Result<String, ProviderError> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| ProviderError::malformed_response("missing choices[0].message.content"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorKind;

    #[test]
    fn quota_body_on_429_classifies_as_quota_exceeded() {
        let body = r#"{"error":{"code":"insufficient_quota","message":"You exceeded your current quota"}}"#;
        let err = classify_failure(StatusCode::TOO_MANY_REQUESTS, body);
        assert_eq!(err.kind, ProviderErrorKind::QuotaExceeded);
        assert!(err.to_string().contains("quota"));
    }

    #[test]
    fn invalid_key_body_classifies_as_invalid_credentials() {
        let body = r#"{"error":{"code":"invalid_api_key","message":"Incorrect API key provided"}}"#;
        let err = classify_failure(StatusCode::UNAUTHORIZED, body);
        assert_eq!(err.kind, ProviderErrorKind::InvalidCredentials);
    }

    #[test]
    fn bare_401_classifies_as_invalid_credentials() {
        let err = classify_failure(StatusCode::UNAUTHORIZED, "");
        assert_eq!(err.kind, ProviderErrorKind::InvalidCredentials);
    }

    #[test]
    fn unknown_server_error_classifies_as_unavailable() {
        let body = r#"{"error":{"message":"The server had an error"}}"#;
        let err = classify_failure(StatusCode::INTERNAL_SERVER_ERROR, body);
        assert_eq!(err.kind, ProviderErrorKind::Unavailable);
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[test]
    fn garbage_body_falls_back_to_status() {
        let err = classify_failure(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(err.kind, ProviderErrorKind::Unavailable);
        assert!(err.to_string().contains("HTTP 502"));
    }

    #[test]
    fn answer_is_pulled_from_the_first_choice() {
        let json = serde_json::json!({
            "choices": [ { "message": { "role": "assistant", "content": "The answer." } } ]
        });
        assert_eq!(extract_answer(&json).unwrap(), "The answer.");
    }

    #[test]
    fn missing_content_is_a_malformed_response() {
        let json = serde_json::json!({ "choices": [] });
        let err = extract_answer(&json).unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::MalformedResponse);
    }

    #[test]
    fn user_message_embeds_context_before_question() {
        let msg = build_user_message("passage one\n\npassage two", "What is this?");
        let ctx_pos = msg.find("passage one").unwrap();
        let q_pos = msg.find("What is this?").unwrap();
        assert!(ctx_pos < q_pos);
    }
}
