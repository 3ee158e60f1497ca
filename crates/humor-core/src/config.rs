//! Interpreter configuration: defaults, optional TOML file, then `HUMOR__*` environment
//! (e.g. `HUMOR__MAX_TOKENS=300`).
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | bind_addr | 127.0.0.1:8501 | Gateway listen address. |
//! | model | gpt-4o-mini | Chat model name; a service parameter, not part of the behavior. |
//! | api_base | https://api.openai.com/v1 | OpenAI-compatible API root. |
//! | max_tokens | 500 | Completion budget per request. |
//! | temperature | 0.8 | Sampling temperature. |
//! | request_timeout_secs | 60 | Transport timeout applied by the HTTP client. |
//! | credential_env_var | OPENAI_API_KEY | Env var holding the fallback credential. |
//! | session_idle_secs | 1800 | Sessions unseen for this long are evicted with their history. |

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_TEMPERATURE: f32 = 0.8;
pub const DEFAULT_CREDENTIAL_ENV_VAR: &str = "OPENAI_API_KEY";
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 1800;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpreterConfig {
    pub bind_addr: String,
    pub model: String,
    pub api_base: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub request_timeout_secs: u64,
    pub credential_env_var: String,
    pub session_idle_secs: u64,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8501".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_base: "https://api.openai.com/v1".to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            request_timeout_secs: 60,
            credential_env_var: DEFAULT_CREDENTIAL_ENV_VAR.to_string(),
            session_idle_secs: DEFAULT_SESSION_IDLE_SECS,
        }
    }
}

impl InterpreterConfig {
    /// Load config from file and environment. Precedence: env > `HUMOR_CONFIG` path
    /// (default `config/interpreter`) > defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("HUMOR_CONFIG").unwrap_or_else(|_| "config/interpreter".to_string());
        let d = Self::default();
        let builder = config::Config::builder()
            .set_default("bind_addr", d.bind_addr)?
            .set_default("model", d.model)?
            .set_default("api_base", d.api_base)?
            .set_default("max_tokens", i64::from(d.max_tokens))?
            .set_default("temperature", f64::from(d.temperature))?
            .set_default("request_timeout_secs", d.request_timeout_secs as i64)?
            .set_default("credential_env_var", d.credential_env_var)?
            .set_default("session_idle_secs", d.session_idle_secs as i64)?;

        // Extension is optional (`config/interpreter` finds `config/interpreter.toml`).
        builder
            .add_source(config::File::with_name(&config_path).required(false))
            .add_source(config::Environment::with_prefix("HUMOR").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Fallback credential from the configured environment variable, if set.
    pub fn env_credential(&self) -> Option<String> {
        std::env::var(&self.credential_env_var).ok()
    }
}
