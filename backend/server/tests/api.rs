use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use catalog::{memory::MemoryStore, seed_dataset};
use serde_json::{json, Value};
use server::{app, config::Config, state::AppState};
use tower::ServiceExt;

async fn seeded_app() -> Router {
    let state = AppState::with_store(Config::default(), Arc::new(MemoryStore::new()));
    state
        .nootropics
        .replace_all(seed_dataset().unwrap())
        .await
        .unwrap();

    app(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, value)
}

async fn piracetam_id(app: &Router) -> String {
    let (_, piracetam) = send(app, Method::GET, "/api/nootropics/Piracetam", None).await;
    piracetam["_id"].as_str().unwrap().to_string()
}

async fn create_stack(app: &Router) -> Value {
    let id = piracetam_id(app).await;
    let (status, stack) = send(
        app,
        Method::POST,
        "/api/stacks",
        Some(json!({
            "name": "Classic",
            "description": "Racetam foundation",
            "components": [{ "nootropic": id, "dosage": { "amount": 1600, "unit": "mg" } }],
            "benefits": ["Memory"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    stack
}

#[tokio::test]
async fn test_root_reports_running() {
    let app = seeded_app().await;
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"Nootropic Nexus API is running");
}

#[tokio::test]
async fn test_get_seeded_piracetam() {
    let app = seeded_app().await;

    let (status, piracetam) = send(&app, Method::GET, "/api/nootropics/Piracetam", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(piracetam["category"], "Racetams");
    assert_eq!(piracetam["dosage"]["unit"], "mg");
}

#[tokio::test]
async fn test_unknown_nootropic_is_404() {
    let app = seeded_app().await;

    let (status, body) = send(&app, Method::GET, "/api/nootropics/Unobtainium", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Nootropic not found");
}

#[tokio::test]
async fn test_list_and_filter_nootropics() {
    let app = seeded_app().await;

    let (status, all) = send(&app, Method::GET, "/api/nootropics", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["substanceName"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Piracetam", "Alpha GPC", "Lion's Mane"]);

    let (_, focused) = send(&app, Method::GET, "/api/nootropics?q=focus", None).await;
    assert_eq!(focused.as_array().unwrap().len(), 2);

    let (_, adaptogens) = send(
        &app,
        Method::GET,
        "/api/nootropics?categories=Adaptogens,Vitamins",
        None,
    )
    .await;
    assert_eq!(adaptogens[0]["substanceName"], "Lion's Mane");
    assert_eq!(adaptogens.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_nootropic_and_reject_duplicate() {
    let app = seeded_app().await;
    let payload = json!({
        "substanceName": "L-Theanine",
        "category": ["Amino Acids"],
        "benefits": ["Calm focus"]
    });

    let (status, created) = send(&app, Method::POST, "/api/nootropics", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["substanceName"], "L-Theanine");
    assert_eq!(created["_id"].as_str().unwrap().len(), 24);

    let mut duplicate = payload;
    duplicate["benefits"] = json!(["Overwritten"]);
    let (status, body) = send(&app, Method::POST, "/api/nootropics", Some(duplicate)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("L-Theanine"));

    let (_, stored) = send(&app, Method::GET, "/api/nootropics/L-Theanine", None).await;
    assert_eq!(stored, created);
}

#[tokio::test]
async fn test_create_nootropic_missing_fields_is_400() {
    let app = seeded_app().await;

    let (status, body) = send(&app, Method::POST, "/api/nootropics", Some(json!({ "benefits": [] }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("substanceName"));
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let app = seeded_app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/nootropics")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_stack_resolves_components() {
    let app = seeded_app().await;

    let stack = create_stack(&app).await;

    assert_eq!(stack["components"][0]["nootropic"]["substanceName"], "Piracetam");
    assert_eq!(stack["components"][0]["dosage"]["unit"], "mg");
    assert_eq!(stack["totalRatings"], 0);
    assert_eq!(stack["averageRating"], 0.0);

    let (status, listed) = send(&app, Method::GET, "/api/stacks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([stack.clone()]));

    let uri = format!("/api/stacks/{}", stack["_id"].as_str().unwrap());
    let (status, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, stack);
}

#[tokio::test]
async fn test_stack_with_unknown_component_is_not_persisted() {
    let app = seeded_app().await;
    let id = piracetam_id(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/stacks",
        Some(json!({
            "name": "Broken",
            "description": "One good, one missing",
            "components": [{ "nootropic": id }, { "nootropic": "65f000000000000000000000" }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Nootropic with ID 65f000000000000000000000 not found"
    );

    let (_, stacks) = send(&app, Method::GET, "/api/stacks", None).await;
    assert_eq!(stacks, json!([]));
}

#[tokio::test]
async fn test_unknown_stack_is_404() {
    let app = seeded_app().await;
    let uri = "/api/stacks/65f000000000000000000000";

    let (status, _) = send(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::PUT, uri, Some(json!({ "name": "x" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("{uri}/rate"),
        Some(json!({ "rating": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Stack not found");
}

#[tokio::test]
async fn test_update_stack_replaces_fields() {
    let app = seeded_app().await;
    let stack = create_stack(&app).await;
    let uri = format!("/api/stacks/{}", stack["_id"].as_str().unwrap());

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "description": "Updated", "warnings": ["Start low"] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Classic");
    assert_eq!(updated["description"], "Updated");
    assert_eq!(updated["warnings"], json!(["Start low"]));
    assert_eq!(updated["components"][0]["nootropic"]["substanceName"], "Piracetam");

    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "components": [{ "nootropic": "missing" }] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rating_updates_aggregate() {
    let app = seeded_app().await;
    let stack = create_stack(&app).await;
    let uri = format!("/api/stacks/{}/rate", stack["_id"].as_str().unwrap());

    for rating in [5, 4, 4] {
        let (status, _) = send(&app, Method::POST, &uri, Some(json!({ "rating": rating }))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, rated) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({ "rating": 1, "review": "Gave me a headache" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(rated["totalRatings"], 4);
    assert_eq!(rated["averageRating"], 3.5);
    assert_eq!(rated["ratings"][3]["review"], "Gave me a headache");
}

#[tokio::test]
async fn test_out_of_range_rating_is_400_and_changes_nothing() {
    let app = seeded_app().await;
    let stack = create_stack(&app).await;
    let id = stack["_id"].as_str().unwrap();
    let uri = format!("/api/stacks/{id}/rate");

    send(&app, Method::POST, &uri, Some(json!({ "rating": 3 }))).await;
    let (_, before) = send(&app, Method::GET, &format!("/api/stacks/{id}"), None).await;

    for body in [json!({ "rating": 0 }), json!({ "rating": 6 }), json!({ "rating": 2.5 }), json!({})] {
        let (status, _) = send(&app, Method::POST, &uri, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (_, after) = send(&app, Method::GET, &format!("/api/stacks/{id}"), None).await;
    assert_eq!(after["ratings"], before["ratings"]);
    assert_eq!(after["totalRatings"], 1);
    assert_eq!(after["averageRating"], 3.0);
}
