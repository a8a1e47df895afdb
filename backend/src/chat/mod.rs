//! Free-text assistant shown in the sidebar.
//!
//! The assistant is a stateless text-generation call: one prompt in, one
//! reply out. Nothing it returns feeds back into the fate computation.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

/// Errors raised while asking the assistant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("Chat input is empty")]
    EmptyInput,

    #[error("Chat backend timed out")]
    Timeout,

    #[error("Chat backend unreachable: {0}")]
    Transport(String),

    #[error("Chat backend rejected the request with status {status}")]
    Rejected { status: u16 },

    #[error("Chat backend returned no generated text")]
    EmptyResponse,
}

/// Produces one reply per prompt.
#[async_trait]
pub trait ConversationalResponder: Send + Sync {
    async fn respond(&self, input: &str) -> Result<String, ChatError>;
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    max_length: u32,
    num_return_sequences: u32,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// Text-generation inference endpoint.
///
/// Sends `{"inputs", "parameters": {"max_length", "num_return_sequences": 1}}`
/// and reads `generated_text` of the first candidate.
#[derive(Debug, Clone)]
pub struct HttpResponder {
    client: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
    max_length: u32,
}

impl HttpResponder {
    pub fn new(
        endpoint: impl Into<String>,
        api_token: Option<String>,
        max_length: u32,
        timeout: Duration,
    ) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_token,
            max_length,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ConversationalResponder for HttpResponder {
    async fn respond(&self, input: &str) -> Result<String, ChatError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ChatError::EmptyInput);
        }

        let body = GenerationRequest {
            inputs: input,
            parameters: GenerationParameters {
                max_length: self.max_length,
                num_return_sequences: 1,
            },
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ChatError::Timeout
            } else {
                ChatError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Rejected {
                status: status.as_u16(),
            });
        }

        let candidates: Vec<GeneratedText> = response
            .json()
            .await
            .map_err(|e| ChatError::Transport(format!("Invalid chat response: {}", e)))?;

        let reply = candidates
            .into_iter()
            .next()
            .map(|c| c.generated_text)
            .ok_or(ChatError::EmptyResponse)?;
        debug!("Chat reply of {} chars", reply.chars().count());
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let body = GenerationRequest {
            inputs: "What does my sign mean?",
            parameters: GenerationParameters {
                max_length: 100,
                num_return_sequences: 1,
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "inputs": "What does my sign mean?",
                "parameters": {"max_length": 100, "num_return_sequences": 1}
            })
        );
    }

    #[test]
    fn test_response_shape() {
        let parsed: Vec<GeneratedText> =
            serde_json::from_str(r#"[{"generated_text": "Stars align."}]"#).unwrap();
        assert_eq!(parsed[0].generated_text, "Stars align.");
    }

    #[tokio::test]
    async fn test_blank_input_rejected_without_call() {
        // Nothing listens on port 9; a network call would fail with Transport.
        let responder =
            HttpResponder::new("http://127.0.0.1:9/generate", None, 100, Duration::from_secs(1))
                .unwrap();
        assert_eq!(responder.respond("   ").await, Err(ChatError::EmptyInput));
    }
}
