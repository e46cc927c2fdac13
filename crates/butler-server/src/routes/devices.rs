//! Device routes — read and light-control over Home Assistant.
//!
//! The device registry itself belongs to Home Assistant; this surface only
//! exposes the configured entities.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::state::AppState;
use butler_home::LightState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dev", get(list_devices).put(set_light))
        .route("/dev/{entity_id}", get(get_device))
}

#[derive(Debug, Deserialize)]
pub struct LightUpdate {
    pub state: String,
}

/// GET /api/v1/dev — the configured bulb and context entities, with live
/// states when Home Assistant is reachable.
async fn list_devices(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let mut devices = Vec::new();
    for entity_id in state.ha_config.entities() {
        let entry = match &state.home {
            Some(home) => match home.get_state(&entity_id).await {
                Ok(entity) => serde_json::json!({
                    "entity_id": entity.entity_id,
                    "state": entity.state,
                    "friendly_name": entity.friendly_name(),
                }),
                Err(_) => unavailable(&entity_id),
            },
            None => unavailable(&entity_id),
        };
        devices.push(entry);
    }
    Json(serde_json::json!({ "devices": devices }))
}

/// GET /api/v1/dev/{entity_id} — a single entity's state.
async fn get_device(
    State(state): State<Arc<AppState>>,
    Path(entity_id): Path<String>,
) -> impl IntoResponse {
    let Some(home) = &state.home else {
        return not_configured();
    };
    match home.get_state(&entity_id).await {
        Ok(entity) => (
            StatusCode::OK,
            Json(serde_json::to_value(&entity).unwrap_or_default()),
        ),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}

/// PUT /api/v1/dev — `{"state": "on"|"off"}` switches the bulb.
async fn set_light(
    State(state): State<Arc<AppState>>,
    Json(update): Json<LightUpdate>,
) -> impl IntoResponse {
    let light_state: LightState = match update.state.parse() {
        Ok(s) => s,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": e.to_string() })),
            );
        }
    };
    let Some(home) = &state.home else {
        return not_configured();
    };
    match home.set_light(light_state).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "state": light_state.to_string() })),
        ),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}

fn unavailable(entity_id: &str) -> serde_json::Value {
    serde_json::json!({
        "entity_id": entity_id,
        "state": "unavailable",
        "friendly_name": entity_id,
    })
}

fn not_configured() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(serde_json::json!({ "error": "Home Assistant is not configured" })),
    )
}
