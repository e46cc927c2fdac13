//! Error types for the butler.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The store was used outside its open/close bracket.
    #[error("store not open")]
    NotOpen,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Home Assistant error: {0}")]
    HomeAssistant(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
