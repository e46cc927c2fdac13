//! Home Assistant connection configuration.

use serde::{Deserialize, Serialize};

pub const DEFAULT_HA_URL: &str = "http://homeassistant.local:8123";
pub const DEFAULT_BULB_ENTITY: &str = "light.smartbulb";

/// Home Assistant configuration, read from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HaConfig {
    /// Base URL of the Home Assistant instance.
    pub url: String,
    /// Long-lived access token. The client is only constructed when present.
    pub token: Option<String>,
    /// Entity id of the controllable smart bulb.
    pub bulb_entity: String,
    /// Sensor entity ids used to build chat context.
    pub context_entities: Vec<String>,
}

impl HaConfig {
    /// Read HA_URL, HA_TOKEN, SMARTBULB_ENTITY and HA_CONTEXT_ENTITIES
    /// (comma-separated) from the environment.
    pub fn from_env() -> Self {
        let url = std::env::var("HA_URL").unwrap_or_else(|_| DEFAULT_HA_URL.into());
        let token = std::env::var("HA_TOKEN").ok().filter(|t| !t.is_empty());
        let bulb_entity =
            std::env::var("SMARTBULB_ENTITY").unwrap_or_else(|_| DEFAULT_BULB_ENTITY.into());
        let context_entities = std::env::var("HA_CONTEXT_ENTITIES")
            .map(|s| {
                s.split(',')
                    .map(|e| e.trim().to_string())
                    .filter(|e| !e.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            url,
            token,
            bulb_entity,
            context_entities,
        }
    }

    /// All entities this instance knows about: the bulb, then the context
    /// sensors.
    pub fn entities(&self) -> Vec<String> {
        let mut entities = vec![self.bulb_entity.clone()];
        entities.extend(self.context_entities.iter().cloned());
        entities
    }
}
