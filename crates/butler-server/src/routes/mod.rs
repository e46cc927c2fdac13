//! HTTP route handlers, nested under `/api/v1`.

pub mod calendar;
pub mod chat;
pub mod devices;
pub mod health;
pub mod inventory;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api/v1", api_routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::routes())
        .merge(chat::routes())
        .merge(inventory::routes())
        .merge(calendar::routes())
        .merge(devices::routes())
}
