//! Humor interpreter core.
//! Prompt building, session history, credential resolution and the generation client boundary.

pub mod config;
pub mod credential;
pub mod error;
pub mod generation;
pub mod history;
pub mod interpreter;
pub mod options;
pub mod prompt;

pub use self::config::InterpreterConfig;
pub use credential::{mask_credential, resolve_credential};
pub use error::{InterpretError, InterpretResult, ServiceError};
pub use generation::{GenerationClient, GenerationRequest, OpenAiClient};
pub use history::{InterpretationRecord, SessionHistory, RECENT_LIMIT};
pub use interpreter::{
    credential_guidance, failure_notice, GenerationSettings, Interpreter, Notice, NoticeKind,
    MISSING_CREDENTIAL_MESSAGE,
};
pub use options::{HumorLevel, InterpretationStyle};
pub use prompt::{build_prompt, InterpretationRequest, EXAMPLE_WORDS, SYSTEM_INSTRUCTION};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
