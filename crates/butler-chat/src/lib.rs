//! Butler Chat — remote LLM client with tool dispatch.

pub mod client;
pub mod config;
pub mod tools;
pub mod types;

pub use client::LlmClient;
pub use config::LlmConfig;
pub use tools::ToolRegistry;
pub use types::{ChatMessage, ChatRole};
