//! API shape tests — validates that response bodies keep the field names
//! and types clients depend on.

/// GET /api/v1/health returns `{"status": "ok"}`.
#[test]
fn test_health_shape() {
    let body = serde_json::json!({ "status": "ok" });
    assert_eq!(body["status"], "ok");
}

/// POST /api/v1/chat returns `{"response": ...}`; errors carry `{"error": ...}`.
#[test]
fn test_chat_post_shape() {
    let ok = serde_json::json!({ "response": "There are 2 liters of milk in the inventory." });
    assert!(ok["response"].is_string());

    let err = serde_json::json!({ "error": "completion request failed with status 500: boom" });
    assert!(err["error"].is_string());
}

/// GET /api/v1/chat returns the full chat message.
#[test]
fn test_chat_get_shape() {
    let message = serde_json::json!({
        "role": "system",
        "content": "Turned kitchen light on",
        "timestamp": "3:04:05 PM",
    });

    assert!(message["role"].is_string());
    assert!(message["content"].is_string());
    assert!(message["timestamp"].is_string());
}

/// GET /api/v1/inv returns `{"items": [...]}`; items carry id/name/amount/unit.
#[test]
fn test_inventory_list_shape() {
    let body = serde_json::json!({
        "items": [
            { "id": 1, "name": "milk", "amount": 2.0, "unit": "liters" },
        ],
    });

    assert!(body["items"].is_array());
    let item = &body["items"][0];
    assert!(item["id"].is_number());
    assert!(item["name"].is_string());
    assert!(item["amount"].is_number());
    assert!(item["unit"].is_string());
}

/// GET /api/v1/inv?query=... returns `{"item": ...}` or 404 `{"error": ...}`.
#[test]
fn test_inventory_query_shape() {
    let found = serde_json::json!({
        "item": { "id": 1, "name": "milk", "amount": 2.0, "unit": "liters" },
    });
    assert!(found["item"].is_object());

    let missing = serde_json::json!({ "error": "no item named 'milk'" });
    assert!(missing["error"].is_string());
}

/// GET /api/v1/calendar/month returns the month's events keyed by day.
#[test]
fn test_calendar_month_shape() {
    let body = serde_json::json!({
        "year": 2026,
        "month": 8,
        "events": {
            "10": [{
                "id": 1,
                "title": "Dentist",
                "description": "",
                "start_time": "2026-08-10T14:00:00Z",
                "end_time": null,
                "all_day": false,
                "location": "",
                "calendar_id": 1,
            }],
        },
    });

    assert!(body["year"].is_number());
    assert!(body["month"].is_number());
    assert!(body["events"].is_object());
    let event = &body["events"]["10"][0];
    assert!(event["id"].is_number());
    assert!(event["title"].is_string());
    assert!(event["start_time"].is_string());
    assert!(event["all_day"].is_boolean());
}

/// Event CRUD returns `{"event": ...}`, deletes return `{"deleted": id}`,
/// misses carry `{"error": ...}`.
#[test]
fn test_calendar_event_shapes() {
    let found = serde_json::json!({
        "event": { "id": 1, "title": "Dentist", "start_time": "2026-08-10T14:00:00Z" },
    });
    assert!(found["event"].is_object());

    let deleted = serde_json::json!({ "deleted": 1 });
    assert!(deleted["deleted"].is_number());

    let missing = serde_json::json!({ "error": "no event with id 999" });
    assert!(missing["error"].is_string());
}

/// GET /api/v1/dev returns `{"devices": [...]}` with unavailable fallbacks.
#[test]
fn test_devices_list_shape() {
    let body = serde_json::json!({
        "devices": [
            {
                "entity_id": "light.smartbulb",
                "state": "unavailable",
                "friendly_name": "light.smartbulb",
            },
            {
                "entity_id": "sensor.fridge_milk",
                "state": "2",
                "friendly_name": "Fridge Milk",
            },
        ],
    });

    assert!(body["devices"].is_array());
    for device in body["devices"].as_array().unwrap() {
        assert!(device["entity_id"].is_string());
        assert!(device["state"].is_string());
        assert!(device["friendly_name"].is_string());
    }
}

/// PUT /api/v1/dev returns the requested state.
#[test]
fn test_light_update_shape() {
    let body = serde_json::json!({ "state": "on" });
    assert!(body["state"].is_string());
}
