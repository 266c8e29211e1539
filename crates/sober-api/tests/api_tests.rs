use std::time::{Duration, Instant};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use sober_api::config::Config;
use sober_api::{AppState, AppStateInner, router};
use sober_db::Database;

fn test_config() -> Config {
    Config {
        db_path: ":memory:".into(),
        jwt_secret: "integration-secret".into(),
        host: "127.0.0.1".into(),
        port: 0,
        request_timeout: Duration::from_secs(30),
        health_timeout: Duration::from_secs(3),
    }
}

fn spawn_app() -> (Router, AppState) {
    let db = Database::open_in_memory().expect("Failed to open database");
    let state = AppStateInner::new(test_config(), db).expect("Failed to create app state");
    (router(state.clone()), state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}

fn post_json(uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn create_alice(app: &Router) -> i64 {
    let (status, body) = send(
        app,
        post_json(
            "/api/v1/create-account",
            &json!({ "username": "alice", "email": "a@x.com", "password": "secret" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

async fn login_alice(app: &Router) -> String {
    let (status, body) = send(
        app,
        post_json(
            "/api/v1/login-account",
            &json!({ "email": "a@x.com", "password": "secret" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_hello_and_health() {
    let (app, _) = spawn_app();

    let (status, body) = send(&app, Request::builder().uri("/").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Hello World");

    let (status, body) =
        send(&app, Request::builder().uri("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");
}

#[tokio::test]
async fn test_create_account_stores_hash() {
    let (app, state) = spawn_app();

    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/create-account",
            &json!({ "username": "alice", "email": "a@x.com", "password": "secret" }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();
    assert!(id > 0);
    assert_eq!(body["account"]["username"], "alice");
    assert_eq!(body["account"]["email"], "a@x.com");
    assert!(body["account"]["createdAt"].is_string());
    assert!(body.to_string().find("password").is_none());

    let stored = state.db.find_account_by_id(id).unwrap().unwrap();
    assert!(!stored.password_hash.is_empty());
    assert_ne!(stored.password_hash, "secret");
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let (app, _) = spawn_app();
    create_alice(&app).await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/create-account",
            &json!({ "username": "alice2", "email": "A@x.com", "password": "another" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], 409);
}

#[tokio::test]
async fn test_create_account_validation() {
    let (app, _) = spawn_app();

    let cases = [
        json!({ "username": "alice", "email": "not-an-email", "password": "secret" }),
        json!({ "username": "al", "email": "a@x.com", "password": "secret" }),
        json!({ "username": "alice", "email": "a@x.com", "password": "123" }),
        json!({ "username": "alice", "email": "a@x.com" }),
    ];
    for case in cases {
        let (status, body) = send(&app, post_json("/api/v1/create-account", &case, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "case {case}");
        assert_eq!(body["status"], 400);
    }

    let malformed = Request::builder()
        .method("POST")
        .uri("/api/v1/create-account")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(&app, malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_flow() {
    let (app, state) = spawn_app();
    let id = create_alice(&app).await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/login-account",
            &json!({ "email": "a@x.com", "password": "secret" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "a@x.com");

    let token = body["token"].as_str().unwrap();
    assert!(!token.is_empty());
    let claims = state.tokens.verify(token).unwrap();
    assert_eq!(claims.sub, id);
    assert_eq!(claims.email, "a@x.com");
}

#[tokio::test]
async fn test_login_rejections_are_unauthorized() {
    let (app, _) = spawn_app();
    create_alice(&app).await;

    let (status, wrong_password) = send(
        &app,
        post_json(
            "/api/v1/login-account",
            &json!({ "email": "a@x.com", "password": "wrong" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_email) = send(
        &app,
        post_json(
            "/api/v1/login-account",
            &json!({ "email": "b@x.com", "password": "secret" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password["message"], unknown_email["message"]);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let (app, _) = spawn_app();
    let id = create_alice(&app).await;

    let note = json!({ "userId": id, "content": "day one" });
    let (status, _) = send(&app, post_json("/api/v1/add-notes", &note, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, post_json("/api/v1/add-notes", &note, Some("garbage"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let onboarding = json!({
        "userId": id,
        "sobriety": { "reason": "health", "soberDate": "2021-09-01" }
    });
    let (status, _) = send(&app, post_json("/api/v1/onboarding", &onboarding, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_onboarding() {
    let (app, _) = spawn_app();
    let id = create_alice(&app).await;
    let token = login_alice(&app).await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/onboarding",
            &json!({
                "userId": id,
                "sobriety": { "reason": "I want to be sober", "soberDate": "2021-09-01" }
            }),
            Some(&token),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["userId"], id);
    assert_eq!(body["sobriety"]["reason"], "I want to be sober");
    assert_eq!(body["sobriety"]["soberDate"], "2021-09-01");
    assert!(body["createdAt"].is_string());
}

#[tokio::test]
async fn test_add_note() {
    let (app, _) = spawn_app();
    let id = create_alice(&app).await;
    let token = login_alice(&app).await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/add-notes",
            &json!({ "userId": id, "content": "one day at a time" }),
            Some(&token),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["notes"]["userId"], id);
    assert_eq!(body["notes"]["content"], "one day at a time");
    assert!(body["notes"]["updatedAt"].is_string());

    let (status, _) = send(
        &app,
        post_json(
            "/api/v1/add-notes",
            &json!({ "userId": id, "content": "   " }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_note_for_other_user_is_forbidden() {
    let (app, _) = spawn_app();
    let id = create_alice(&app).await;
    let token = login_alice(&app).await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/add-notes",
            &json!({ "userId": id + 1, "content": "not mine" }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], 403);
}

#[tokio::test]
async fn test_note_for_deleted_account_fails() {
    let (app, state) = spawn_app();
    let id = create_alice(&app).await;
    let token = login_alice(&app).await;

    state
        .db
        .with_conn_mut(|conn| {
            conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
            Ok(())
        })
        .unwrap();

    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/add-notes",
            &json!({ "userId": id, "content": "orphan" }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "user does not exist");
}

#[tokio::test]
async fn test_unknown_email_costs_a_password_verify() {
    let (app, _) = spawn_app();
    create_alice(&app).await;

    let attempt = |email: &'static str, password: &'static str| {
        post_json(
            "/api/v1/login-account",
            &json!({ "email": email, "password": password }),
            None,
        )
    };

    // Warm up the placeholder hash
    let (status, _) = send(&app, attempt("warm@x.com", "secret")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let started = Instant::now();
    let (status, _) = send(&app, attempt("a@x.com", "wrong")).await;
    let wrong_password = started.elapsed();
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let started = Instant::now();
    let (status, _) = send(&app, attempt("nobody@x.com", "wrong")).await;
    let unknown_email = started.elapsed();
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Both paths run Argon2, so they land in the same order of magnitude
    assert!(
        unknown_email * 10 >= wrong_password,
        "unknown email {unknown_email:?} vs wrong password {wrong_password:?}"
    );
}
