//! Calendar routes — month views and event CRUD.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use butler_store::{CalendarEvent, DEFAULT_CALENDAR_ID};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/calendar/month", get(get_month))
        .route("/calendar/events", post(create_event).put(update_event))
        .route(
            "/calendar/events/{event_id}",
            get(get_event).delete(delete_event),
        )
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Deserialize)]
pub struct EventBody {
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub location: String,
}

impl EventBody {
    fn into_event(self) -> CalendarEvent {
        CalendarEvent {
            id: self.id.unwrap_or(0),
            title: self.title,
            description: self.description,
            start_time: self.start_time,
            end_time: self.end_time,
            all_day: self.all_day,
            location: self.location,
            calendar_id: DEFAULT_CALENDAR_ID,
        }
    }
}

/// GET /api/v1/calendar/month?year=...&month=... — the month's events keyed
/// by day of month.
async fn get_month(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MonthQuery>,
) -> impl IntoResponse {
    if !(1..=12).contains(&query.month) {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": format!("invalid month {}", query.month) })),
        );
    }

    match state
        .calendar
        .events_for_month(DEFAULT_CALENDAR_ID, query.year, query.month)
    {
        Ok(events) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "year": query.year,
                "month": query.month,
                "events": events,
            })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}

/// GET /api/v1/calendar/events/{event_id} — one event or 404.
async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
) -> impl IntoResponse {
    match state.calendar.get_event(event_id) {
        Ok(Some(event)) => (StatusCode::OK, Json(serde_json::json!({ "event": event }))),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("no event with id {}", event_id) })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}

/// POST /api/v1/calendar/events — create an event on the default calendar.
async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(body): Json<EventBody>,
) -> impl IntoResponse {
    match state.calendar.upsert_event(&body.into_event()) {
        Ok(event) => (StatusCode::OK, Json(serde_json::json!({ "event": event }))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}

/// PUT /api/v1/calendar/events — update an existing event by id.
async fn update_event(
    State(state): State<Arc<AppState>>,
    Json(body): Json<EventBody>,
) -> impl IntoResponse {
    if body.id.is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "missing event id" })),
        );
    }

    match state.calendar.upsert_event(&body.into_event()) {
        Ok(event) => (StatusCode::OK, Json(serde_json::json!({ "event": event }))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}

/// DELETE /api/v1/calendar/events/{event_id} — remove one event.
async fn delete_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
) -> impl IntoResponse {
    match state.calendar.delete_event(event_id) {
        Ok(true) => (
            StatusCode::OK,
            Json(serde_json::json!({ "deleted": event_id })),
        ),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("no event with id {}", event_id) })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}
