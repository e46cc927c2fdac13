//! Home Assistant payload types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use butler_core::Error;

/// Desired light state, mapped to the `turn_on`/`turn_off` service names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightState {
    On,
    Off,
}

impl LightState {
    /// The Home Assistant light service this state maps to.
    pub fn service(&self) -> &'static str {
        match self {
            LightState::On => "turn_on",
            LightState::Off => "turn_off",
        }
    }
}

impl fmt::Display for LightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LightState::On => write!(f, "on"),
            LightState::Off => write!(f, "off"),
        }
    }
}

impl FromStr for LightState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" => Ok(LightState::On),
            "off" => Ok(LightState::Off),
            other => Err(Error::HomeAssistant(format!(
                "invalid light state '{}', expected 'on' or 'off'",
                other
            ))),
        }
    }
}

/// State of an entity as returned by `GET /api/states/{entity_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityState {
    pub entity_id: String,
    pub state: String,
    #[serde(default)]
    pub attributes: serde_json::Value,
}

impl EntityState {
    /// The human-readable name, falling back to the entity id.
    pub fn friendly_name(&self) -> &str {
        self.attributes
            .get("friendly_name")
            .and_then(|v| v.as_str())
            .unwrap_or(&self.entity_id)
    }

    /// The unit of measurement, when the entity reports one.
    pub fn unit_of_measurement(&self) -> &str {
        self.attributes
            .get("unit_of_measurement")
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_state_parse() {
        assert_eq!("on".parse::<LightState>().unwrap(), LightState::On);
        assert_eq!(" OFF ".parse::<LightState>().unwrap(), LightState::Off);
        assert!("dim".parse::<LightState>().is_err());
    }

    #[test]
    fn test_light_state_service_names() {
        assert_eq!(LightState::On.service(), "turn_on");
        assert_eq!(LightState::Off.service(), "turn_off");
    }

    #[test]
    fn test_friendly_name_fallback() {
        let state = EntityState {
            entity_id: "sensor.fridge_milk".into(),
            state: "2".into(),
            attributes: serde_json::json!({}),
        };
        assert_eq!(state.friendly_name(), "sensor.fridge_milk");
        assert_eq!(state.unit_of_measurement(), "");
    }
}
