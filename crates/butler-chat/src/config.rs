//! LLM endpoint configuration.

use serde::{Deserialize, Serialize};

/// Default endpoint: a local Ollama-compatible chat-completions URL.
pub const DEFAULT_LLM_URL: &str = "http://localhost:11434/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "phi4-mini";

/// The butler persona.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a home butler. \
You are incredibly succinct in your responses. \
Do not provide any additional information or context. \
Do not provide your thought process or reasoning, but simply respond to the user's request. \
Users may ask what inventory items are in their home, or ask you to turn a device on or off; \
use the available tools to answer. \
Answer the user's request in a single sentence, and nothing more. \
If you do not know the answer, simply say \"I don't know.\".";

/// LLM client configuration, an explicit struct passed into the client
/// constructor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Chat-completions endpoint URL (OpenAI-compatible).
    pub url: String,
    /// Optional bearer token; when present sent as `Authorization: Bearer`.
    pub api_key: Option<String>,
    /// Model name sent with every request.
    pub model: String,
    /// System prompt establishing the butler persona.
    pub system_prompt: String,
    pub max_tokens: usize,
    pub temperature: f64,
    pub top_p: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_LLM_URL.into(),
            api_key: None,
            model: DEFAULT_MODEL.into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            max_tokens: 2048,
            temperature: 0.8,
            top_p: 0.1,
        }
    }
}

impl LlmConfig {
    /// Read LLM_URL, LLM_API_KEY, LLM_MODEL, LLM_SYSTEM_PROMPT,
    /// LLM_MAX_TOKENS, LLM_TEMP and LLM_TOP_P from the environment, with
    /// defaults for everything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("LLM_URL").unwrap_or(defaults.url),
            api_key: std::env::var("LLM_API_KEY").ok().filter(|k| !k.is_empty()),
            model: std::env::var("LLM_MODEL").unwrap_or(defaults.model),
            system_prompt: std::env::var("LLM_SYSTEM_PROMPT").unwrap_or(defaults.system_prompt),
            max_tokens: std::env::var("LLM_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_tokens),
            temperature: std::env::var("LLM_TEMP")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.temperature),
            top_p: std::env::var("LLM_TOP_P")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.top_p),
        }
    }
}
