//! End-to-end intake tests against a live PostgreSQL
//!
//! Run with `DATABASE_URL=... cargo test -p startlab-server -- --ignored`.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use startlab_core::StartlabConfig;
use startlab_server::{build_router, migrations, seed, AppState};
use tower::ServiceExt;

async fn app() -> Router {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = sqlx::PgPool::connect(&url).await.expect("connect failed");
    migrations::run(&pool).await.expect("migrations failed");
    seed::run(&pool).await.expect("seed failed");
    build_router(Arc::new(AppState::new(pool, StartlabConfig::default())), false)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
#[ignore = "requires database"]
async fn flat_science_rows_share_one_hash() {
    let app = app().await;
    let payload = json!({
        "type": "science",
        "title": "Сенсор влажности почвы",
        "goal": "Снизить расход воды",
        "team": [
            { "fullName": "Петров Пётр Петрович", "role": "Лидер" },
            { "fullName": "Сидорова Анна", "email": "anna@example.com" }
        ],
        "supervisor": { "fullName": "Иванов И. И.", "position": "Доцент" }
    });

    let (status, body) = send(&app, post("/api/app/intake", payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Science application saved");
    let hash = body["sha256"].as_str().unwrap().to_owned();
    assert_eq!(hash.len(), 64);

    let (status, group) = send(&app, get(&format!("/api/app/applications/{hash}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(group["science"][0]["title"], "Сенсор влажности почвы");
    assert_eq!(group["team"].as_array().unwrap().len(), 2);
    assert_eq!(group["team"][0]["lastName"], "Петров");
    assert_eq!(group["supervisors"][0]["fullName"], "Иванов И. И.");
}

#[tokio::test]
#[ignore = "requires database"]
async fn unified_startup_is_stored_without_supervisor() {
    let app = app().await;
    let payload = json!({
        "type": "startup",
        "data": {
            "title": "Маркетплейс лабораторий",
            "needsInvestmentNow": "Да",
            "supervisor": { "fullName": "ignored" }
        }
    });

    let (status, body) = send(&app, post("/api/app/intake-unified", payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Startup application saved");

    let hash = body["sha256"].as_str().unwrap();
    let (_, group) = send(&app, get(&format!("/api/app/applications/{hash}"))).await;
    assert_eq!(group["startup"][0]["needsInvestmentNow"], "Да");
    assert!(group["supervisors"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn form_science_submission_round_trip() {
    let app = app().await;

    let (_, submissions) = send(&app, get("/api/app/submissions")).await;
    let submission_id = submissions[0]["id"].as_i64().unwrap();
    let (_, forms) = send(&app, get(&format!("/api/app/submissions/{submission_id}/forms"))).await;
    let science = forms
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["name"].as_str().unwrap().contains("наука"))
        .unwrap();
    let form_id = science["id"].as_i64().unwrap();
    let (_, questions) = send(&app, get(&format!("/api/app/forms/{form_id}/questions"))).await;
    let question_id = questions[0]["form_question_id"].as_i64().unwrap();

    let payload = json!({
        "type": "science",
        "answers": [{ "form_question_id": question_id, "answer_text": "Ответ" }],
        "participants": [{ "last_name": "Козлов", "first_name": "Илья" }],
        "supervisor": { "last_name": "Орлова", "first_name": "Мария", "academic_rank": "к.т.н." }
    });
    let (status, body) = send(&app, post("/api/app/science", payload)).await;
    assert_eq!(status, StatusCode::OK);
    let hash = body["sha256_hash"].as_str().unwrap();

    let (_, group) = send(&app, get(&format!("/api/app/applications/{hash}"))).await;
    assert_eq!(group["form_answers"][0]["answer_text"], "Ответ");
    assert_eq!(group["participants"][0]["last_name"], "Козлов");
    assert_eq!(group["form_supervisors"][0]["academic_rank"], "к.т.н.");
}

#[tokio::test]
#[ignore = "requires database"]
async fn answers_to_other_forms_questions_are_rejected() {
    let app = app().await;
    let payload = json!({
        "type": "startup",
        "answers": [{ "form_question_id": 987_654_321, "answer_text": "?" }]
    });
    let (status, body) = send(&app, post("/api/app/startup", payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "form question 987654321 not found");
}

#[tokio::test]
#[ignore = "requires database"]
async fn unknown_hash_is_404() {
    let app = app().await;
    let missing = "0".repeat(64);
    let (status, _) = send(&app, get(&format!("/api/app/applications/{missing}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
