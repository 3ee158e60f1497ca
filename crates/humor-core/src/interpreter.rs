//! Submission flow: credential gate → prompt → one generation call → history append.
//! Failures leave the history untouched and become user-facing notices.

use std::sync::Arc;

use crate::config::{InterpreterConfig, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::error::{InterpretError, InterpretResult};
use crate::generation::{GenerationClient, GenerationRequest};
use crate::history::{InterpretationRecord, SessionHistory};
use crate::prompt::{build_prompt, InterpretationRequest, SYSTEM_INSTRUCTION};

/// Sampling parameters sent with every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl From<&InterpreterConfig> for GenerationSettings {
    fn from(config: &InterpreterConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

#[derive(Clone)]
pub struct Interpreter {
    client: Arc<dyn GenerationClient>,
    settings: GenerationSettings,
}

impl Interpreter {
    pub fn new(client: Arc<dyn GenerationClient>, settings: GenerationSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> GenerationSettings {
        self.settings
    }

    /// Run one submission. On success the new record is appended to `history` and a copy is
    /// returned for immediate display. Without a credential the client is never called.
    pub async fn interpret(
        &self,
        credential: Option<&str>,
        request: &InterpretationRequest,
        history: &mut SessionHistory,
    ) -> InterpretResult<InterpretationRecord> {
        let credential = credential.ok_or(InterpretError::MissingCredential)?;

        let generation = GenerationRequest {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            prompt: build_prompt(request),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        tracing::info!(
            word = %request.word(),
            humor_level = %request.humor_level(),
            style = %request.style(),
            "interpreting word"
        );

        let text = match self.client.generate(credential, &generation).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "generation failed");
                return Err(e.into());
            }
        };

        let record = InterpretationRecord::now(request, text);
        history.append(record.clone());
        tracing::info!(entries = history.len(), "interpretation stored in session history");
        Ok(record)
    }
}

/// Severity of a rendered notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Error,
}

/// User-visible message: a headline plus an optional hint line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub hint: Option<String>,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
            hint: None,
        }
    }
}

pub const MISSING_CREDENTIAL_MESSAGE: &str = "⚠️ OpenAI API 키를 입력해주세요!";

/// Steps shown while the flow is gated on a missing credential. `env_var` is the configured
/// fallback variable name.
pub fn credential_guidance(env_var: &str) -> [String; 3] {
    [
        "OpenAI 웹사이트에서 API 키를 발급받으세요".to_string(),
        "사이드바에 API 키를 입력하세요".to_string(),
        format!("또는 환경변수 {}로 설정하세요", env_var),
    ]
}

/// Convert a submission error into what the page shows. `credential_env_var` names the
/// fallback variable in the missing-credential guidance.
pub fn failure_notice(err: &InterpretError, credential_env_var: &str) -> Notice {
    match err {
        InterpretError::MissingCredential => Notice {
            kind: NoticeKind::Error,
            message: MISSING_CREDENTIAL_MESSAGE.to_string(),
            hint: Some(credential_guidance(credential_env_var).join(" / ")),
        },
        InterpretError::EmptyWord => Notice {
            kind: NoticeKind::Info,
            message: "⚠️ 해석할 단어를 먼저 입력해주세요.".to_string(),
            hint: None,
        },
        InterpretError::UnknownOption(label) => Notice {
            kind: NoticeKind::Error,
            message: format!("알 수 없는 옵션입니다: {}", label),
            hint: None,
        },
        InterpretError::Service(e) => Notice {
            kind: NoticeKind::Error,
            message: format!("해석 중 오류가 발생했습니다: {}", e),
            hint: Some("API 키가 올바른지 확인해주세요.".to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::options::{HumorLevel, InterpretationStyle};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every call and replies with a canned result.
    struct RecordingClient {
        reply: Result<String, ServiceError>,
        calls: Mutex<Vec<(String, GenerationRequest)>>,
    }

    impl RecordingClient {
        fn new(reply: Result<String, ServiceError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, GenerationRequest)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerationClient for RecordingClient {
        async fn generate(
            &self,
            credential: &str,
            request: &GenerationRequest,
        ) -> Result<String, ServiceError> {
            self.calls
                .lock()
                .unwrap()
                .push((credential.to_string(), request.clone()));
            self.reply.clone()
        }
    }

    fn apple_request() -> InterpretationRequest {
        InterpretationRequest::new("사과", HumorLevel::Very, InterpretationStyle::Imaginative)
            .unwrap()
    }

    #[tokio::test]
    async fn success_appends_record_and_sends_settings() {
        let client = RecordingClient::new(Ok("🍎 사과는 사과를 안 해요".to_string()));
        let interpreter = Interpreter::new(client.clone(), GenerationSettings::default());
        let mut history = SessionHistory::new();

        let record = interpreter
            .interpret(Some("sk-test"), &apple_request(), &mut history)
            .await
            .unwrap();

        assert_eq!(record.word(), "사과");
        assert_eq!(record.text(), "🍎 사과는 사과를 안 해요");
        assert_eq!(history.recent(5), vec![&record]);

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        let (credential, sent) = &calls[0];
        assert_eq!(credential, "sk-test");
        assert_eq!(sent.system_instruction, SYSTEM_INSTRUCTION);
        assert_eq!(sent.max_tokens, 500);
        assert!((sent.temperature - 0.8).abs() < f32::EPSILON);
        assert!(sent.prompt.contains("사과"));
        assert!(sent.prompt.contains("매우 유머러스"));
        assert!(sent.prompt.contains("창의적 상상"));
    }

    #[tokio::test]
    async fn service_error_is_reported_and_nothing_is_stored() {
        let client = RecordingClient::new(Err(ServiceError::Network("timeout".to_string())));
        let interpreter = Interpreter::new(client.clone(), GenerationSettings::default());
        let mut history = SessionHistory::new();

        let err = interpreter
            .interpret(Some("sk-test"), &apple_request(), &mut history)
            .await
            .unwrap_err();

        assert_eq!(client.calls().len(), 1);
        assert!(history.is_empty());
        let notice = failure_notice(&err, "OPENAI_API_KEY");
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.message.contains("timeout"));
        assert!(notice.hint.unwrap().contains("API 키"));
    }

    #[tokio::test]
    async fn missing_credential_never_calls_client() {
        let client = RecordingClient::new(Ok("unused".to_string()));
        let interpreter = Interpreter::new(client.clone(), GenerationSettings::default());
        let mut history = SessionHistory::new();

        let err = interpreter
            .interpret(None, &apple_request(), &mut history)
            .await
            .unwrap_err();

        assert_eq!(err, InterpretError::MissingCredential);
        assert!(client.calls().is_empty());
        assert!(history.is_empty());
        assert!(failure_notice(&err, "OPENAI_API_KEY").hint.unwrap().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn guidance_names_the_configured_variable() {
        let hint = failure_notice(&InterpretError::MissingCredential, "HUMOR_LLM_KEY")
            .hint
            .unwrap();
        assert!(hint.contains("HUMOR_LLM_KEY"));
        assert!(!hint.contains("OPENAI_API_KEY"));
        assert_eq!(credential_guidance("X")[2], "또는 환경변수 X로 설정하세요");
    }

    #[tokio::test]
    async fn custom_settings_are_forwarded() {
        let client = RecordingClient::new(Ok("ok".to_string()));
        let settings = GenerationSettings {
            max_tokens: 120,
            temperature: 0.2,
        };
        let interpreter = Interpreter::new(client.clone(), settings);
        let mut history = SessionHistory::new();
        interpreter
            .interpret(Some("k"), &apple_request(), &mut history)
            .await
            .unwrap();
        assert_eq!(client.calls()[0].1.max_tokens, 120);
    }

    #[test]
    fn auth_failure_notice_includes_status_and_body() {
        let err = InterpretError::from(ServiceError::Auth {
            status: 401,
            body: "invalid_api_key".to_string(),
        });
        let notice = failure_notice(&err, "OPENAI_API_KEY");
        assert!(notice.message.contains("401"));
        assert!(notice.message.contains("invalid_api_key"));
    }
}
