//! Butler Core — errors and configuration.

pub mod config;
pub mod error;

pub use config::ButlerConfig;
pub use error::{Error, Result};
