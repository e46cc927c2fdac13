//! Bearer-authenticated REST client for Home Assistant.

use reqwest::Client;
use serde_json::json;
use tracing::{debug, info};

use crate::config::HaConfig;
use crate::types::{EntityState, LightState};
use butler_core::{Error, Result};

/// Home Assistant REST client. Only constructed when an access token is
/// configured; callers hold an `Option<HaClient>` otherwise.
pub struct HaClient {
    config: HaConfig,
    token: String,
    http: Client,
}

impl HaClient {
    /// Build a client from the configuration, or `None` when no token is
    /// set.
    pub fn new(config: HaConfig) -> Option<Self> {
        let token = config.token.clone()?;
        info!("Home Assistant client configured for {}", config.url);
        Some(Self {
            config,
            token,
            http: Client::new(),
        })
    }

    /// Entity id of the controllable bulb.
    pub fn bulb_entity(&self) -> &str {
        &self.config.bulb_entity
    }

    /// Sensor entities used for chat context.
    pub fn context_entities(&self) -> &[String] {
        &self.config.context_entities
    }

    /// Fetch the state of a single entity.
    pub async fn get_state(&self, entity_id: &str) -> Result<EntityState> {
        let url = format!("{}/api/states/{}", self.config.url, entity_id);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::HomeAssistant(format!(
                "state request for {} failed with status {}: {}",
                entity_id, status, body
            )));
        }
        resp.json::<EntityState>()
            .await
            .map_err(|e| Error::HomeAssistant(e.to_string()))
    }

    /// Switch the configured bulb by calling the matching light service.
    pub async fn set_light(&self, state: LightState) -> Result<()> {
        let url = format!("{}/api/services/light/{}", self.config.url, state.service());
        debug!("calling light service {}", state.service());
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&json!({ "entity_id": self.config.bulb_entity }))
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::HomeAssistant(format!(
                "light service {} failed with status {}: {}",
                state.service(),
                status,
                body
            )));
        }
        Ok(())
    }

    /// Compile a context block from the configured sensor entities.
    pub async fn context(&self) -> Result<String> {
        let mut states = Vec::with_capacity(self.config.context_entities.len());
        for entity_id in &self.config.context_entities {
            states.push(self.get_state(entity_id).await?);
        }
        Ok(render_context(&states))
    }
}

/// Render entity states as `"{friendly_name}: {state} {unit}"` lines.
pub fn render_context(states: &[EntityState]) -> String {
    let mut context = String::new();
    for state in states {
        context.push_str(&format!(
            "{}: {} {}\n",
            state.friendly_name(),
            state.state,
            state.unit_of_measurement()
        ));
    }
    context
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_token() {
        let config = HaConfig {
            url: "http://homeassistant.local:8123".into(),
            token: None,
            bulb_entity: "light.smartbulb".into(),
            context_entities: vec![],
        };
        assert!(HaClient::new(config).is_none());
    }

    #[test]
    fn test_render_context_lines() {
        let states = vec![
            EntityState {
                entity_id: "sensor.fridge_milk".into(),
                state: "2".into(),
                attributes: serde_json::json!({
                    "friendly_name": "Fridge Milk",
                    "unit_of_measurement": "liters",
                }),
            },
            EntityState {
                entity_id: "sensor.bedroom_temperature".into(),
                state: "19.5".into(),
                attributes: serde_json::json!({
                    "friendly_name": "Bedroom Temperature",
                    "unit_of_measurement": "°C",
                }),
            },
        ];

        let context = render_context(&states);
        assert_eq!(
            context,
            "Fridge Milk: 2 liters\nBedroom Temperature: 19.5 °C\n"
        );
    }

    #[test]
    fn test_render_context_empty() {
        assert_eq!(render_context(&[]), "");
    }
}
