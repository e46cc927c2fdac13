//! Chat message types and the typed mirror of the completions response.

use chrono::Local;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    System,
    Error,
}

/// A chat message as rendered to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    /// Local wall-clock time, `3:04:05 PM` style.
    pub timestamp: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
            timestamp: timestamp(),
        }
    }

    pub fn error(err: &butler_core::Error) -> Self {
        Self {
            role: ChatRole::Error,
            content: format!("An error occurred while processing your request: {}", err),
            timestamp: timestamp(),
        }
    }
}

/// Matches JS `new Date().toLocaleTimeString()`.
fn timestamp() -> String {
    Local::now().format("%-I:%M:%S %p").to_string()
}

// ---------------------------------------------------------------
// Chat-completions response payload
// ---------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Completion {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: CompletionMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded argument object, as sent by the model.
    pub arguments: String,
}
