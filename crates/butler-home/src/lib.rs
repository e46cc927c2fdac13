//! Butler Home — Home Assistant REST client.

pub mod client;
pub mod config;
pub mod types;

pub use client::HaClient;
pub use config::HaConfig;
pub use types::{EntityState, LightState};
