// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admit::EngineConfig;
use admit_domain::TicketClassCatalog;
use admit_persistence::Persistence;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{AppState, build_router};

pub fn create_test_app() -> Router {
    create_test_app_with(EngineConfig::default())
}

pub fn create_test_app_with(config: EngineConfig) -> Router {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    build_router(AppState::new(
        persistence,
        config,
        TicketClassCatalog::default(),
    ))
}

/// Sends a JSON request and returns the status and decoded body.
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request: Request<Body> = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status: StatusCode = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Merges the actor fields into a JSON object body.
pub fn as_actor(actor_id: &str, role: &str, mut body: Value) -> Value {
    let fields = body.as_object_mut().expect("body must be an object");
    fields.insert(String::from("actor_id"), json!(actor_id));
    fields.insert(String::from("actor_role"), json!(role));
    body
}

pub fn organizer(body: Value) -> Value {
    as_actor("org-1", "organizer", body)
}

pub fn gate(body: Value) -> Value {
    as_actor("gate-7", "gate", body)
}

/// Creates an event and walks it to `status`, returning its id.
pub async fn create_event(app: &Router, capacity: u32, status: &str) -> i64 {
    let (code, body) = send(
        app,
        "POST",
        "/events",
        Some(organizer(json!({ "name": "Spring Gala", "capacity": capacity }))),
    )
    .await;
    assert_eq!(code, StatusCode::OK, "{body}");
    let event_id: i64 = body["event_id"].as_i64().unwrap();

    let path: &[&str] = match status {
        "draft" => &[],
        "selling" => &["selling"],
        "active" => &["selling", "active"],
        "closed" => &["closed"],
        other => panic!("unsupported status {other}"),
    };
    for next in path {
        let (code, body) = send(
            app,
            "POST",
            &format!("/events/{event_id}/status"),
            Some(organizer(json!({ "status": next }))),
        )
        .await;
        assert_eq!(code, StatusCode::OK, "{body}");
    }
    event_id
}

/// Issues `quantity` student tickets and returns their ids.
pub async fn issue(app: &Router, event_id: i64, quantity: u32) -> Vec<String> {
    let (code, body) = send(
        app,
        "POST",
        &format!("/events/{event_id}/tickets"),
        Some(organizer(issue_body(quantity))),
    )
    .await;
    assert_eq!(code, StatusCode::OK, "{body}");
    body["ticket_ids"]
        .as_array()
        .unwrap()
        .iter()
        .map(|id| id.as_str().unwrap().to_string())
        .collect()
}

pub fn issue_body(quantity: u32) -> Value {
    json!({
        "quantity": quantity,
        "ticket_class": "student",
        "price_minor": 1200,
        "holder_name": "Alan Turing",
        "holder_contact": "alan@example.com"
    })
}

pub async fn scan(app: &Router, code: &str, gate_id: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/scans",
        Some(gate(json!({ "code": code, "gate_id": gate_id }))),
    )
    .await
}
