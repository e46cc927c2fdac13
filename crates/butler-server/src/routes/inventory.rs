//! Inventory routes over the pantry ledger.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/inv", get(get_inventory).put(update_inventory))
}

#[derive(Debug, Deserialize)]
pub struct InventoryQuery {
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InventoryUpdate {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

/// GET /api/v1/inv — all items, or one item via `?query=name`.
async fn get_inventory(
    State(state): State<Arc<AppState>>,
    Query(query): Query<InventoryQuery>,
) -> impl IntoResponse {
    match query.query {
        Some(name) => match state.inventory.find(&name) {
            Ok(Some(item)) => (StatusCode::OK, Json(serde_json::json!({ "item": item }))),
            Ok(None) => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": format!("no item named '{}'", name) })),
            ),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            ),
        },
        None => match state.inventory.list() {
            Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            ),
        },
    }
}

/// PUT /api/v1/inv — upsert through the ledger's add.
async fn update_inventory(
    State(state): State<Arc<AppState>>,
    Json(update): Json<InventoryUpdate>,
) -> impl IntoResponse {
    match state
        .inventory
        .add(&update.name, update.amount, &update.unit)
    {
        Ok(item) => (StatusCode::OK, Json(serde_json::json!({ "item": item }))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use butler_chat::{LlmClient, LlmConfig, ToolRegistry};
    use butler_core::ButlerConfig;
    use butler_home::HaConfig;
    use butler_store::{CalendarStore, InventoryStore};
    use tempfile::TempDir;

    fn test_state() -> (Arc<AppState>, TempDir) {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("butler.db");
        let config = ButlerConfig {
            port: 0,
            data_dir: dir.path().to_path_buf(),
            db_path: db_path.clone(),
        };
        let ha_config = HaConfig {
            url: "http://homeassistant.local:8123".into(),
            token: None,
            bulb_entity: "light.smartbulb".into(),
            context_entities: vec![],
        };
        let inventory = Arc::new(InventoryStore::open(&db_path).unwrap());
        let calendar = Arc::new(CalendarStore::open(&db_path).unwrap());
        let tools = ToolRegistry::new(inventory.clone(), None);
        let llm = LlmClient::new(LlmConfig::default(), tools);
        let state = Arc::new(AppState::new(
            config, ha_config, inventory, calendar, llm, None,
        ));
        (state, dir)
    }

    #[tokio::test]
    async fn test_list_starts_empty() {
        let (state, _dir) = test_state();
        let response = get_inventory(State(state), Query(InventoryQuery { query: None }))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_query_missing_item_is_404() {
        let (state, _dir) = test_state();
        let response = get_inventory(
            State(state),
            Query(InventoryQuery {
                query: Some("milk".into()),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upsert_then_query() {
        let (state, _dir) = test_state();

        let response = update_inventory(
            State(state.clone()),
            Json(InventoryUpdate {
                name: "milk".into(),
                amount: 2.0,
                unit: "liters".into(),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let response = get_inventory(
            State(state),
            Query(InventoryQuery {
                query: Some("milk".into()),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
