//! Generation Client boundary and its OpenAI-compatible implementation.
//!
//! The core only needs one call: system instruction + prompt in, completion text out. Timeouts
//! belong to the transport (`reqwest::Client`), not to callers.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::InterpreterConfig;
use crate::credential::mask_credential;
use crate::error::ServiceError;

/// Everything sent for one completion besides the credential.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Remote text generation. The credential travels with each call because it is resolved per
/// submission (form input may override the environment).
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(
        &self,
        credential: &str,
        request: &GenerationRequest,
    ) -> Result<String, ServiceError>;
}

// OpenAI chat completions wire types
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatMessageResponse>,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

/// `POST {api_base}/chat/completions` with bearer auth.
pub struct OpenAiClient {
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(api_base: &str, model: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
        }
    }

    pub fn from_config(config: &InterpreterConfig) -> Self {
        Self::new(
            &config.api_base,
            &config.model,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

#[async_trait]
impl GenerationClient for OpenAiClient {
    async fn generate(
        &self,
        credential: &str,
        request: &GenerationRequest,
    ) -> Result<String, ServiceError> {
        tracing::debug!(
            model = %self.model,
            credential = %mask_credential(credential),
            "sending chat completion request"
        );

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system_instruction,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let res = self
            .client
            .post(self.endpoint())
            .bearer_auth(credential)
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ServiceError::Auth {
                status: status.as_u16(),
                body: text,
            });
        }
        if !status.is_success() {
            return Err(ServiceError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_completion(&text)
    }
}

/// Extract `choices[0].message.content` from a chat completion body.
fn parse_completion(body: &str) -> Result<String, ServiceError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| ServiceError::Malformed(e.to_string()))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .ok_or_else(|| ServiceError::Malformed("response contained no completion text".into()))
}
