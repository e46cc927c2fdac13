//! Shared application state.

use std::sync::Arc;

use butler_chat::LlmClient;
use butler_core::ButlerConfig;
use butler_home::{HaClient, HaConfig};
use butler_store::{CalendarStore, InventoryStore};

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: ButlerConfig,
    pub ha_config: HaConfig,
    pub inventory: Arc<InventoryStore>,
    pub calendar: Arc<CalendarStore>,
    pub llm: LlmClient,
    pub home: Option<Arc<HaClient>>,
}

impl AppState {
    pub fn new(
        config: ButlerConfig,
        ha_config: HaConfig,
        inventory: Arc<InventoryStore>,
        calendar: Arc<CalendarStore>,
        llm: LlmClient,
        home: Option<Arc<HaClient>>,
    ) -> Self {
        Self {
            config,
            ha_config,
            inventory,
            calendar,
            llm,
            home,
        }
    }
}
