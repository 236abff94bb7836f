use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use cartwheel::config::Config;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.database.path = "sqlite::memory:".to_string();
    // A pooled in-memory sqlite gives every connection its own database;
    // pin the pool to one connection so the whole test sees one store.
    config.database.max_connections = 1;
    config.database.min_connections = 1;

    let state = cartwheel::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    cartwheel::api::router(state)
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", token);
    }

    let request = if let Some(body) = body {
        builder
            .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(Body::from(body.to_string()))
            .unwrap()
    } else {
        builder.body(Body::empty()).unwrap()
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, value)
}

async fn register(app: &Router, username: &str) {
    let (status, body) = send_json(
        app,
        "POST",
        "/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "correct horse",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
}

async fn login(app: &Router, username: &str) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/login",
        None,
        Some(json!({"username": username, "password": "correct horse"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_register_then_login_yields_fresh_tokens() {
    let app = spawn_app().await;
    register(&app, "alice").await;

    let first = login(&app, "alice").await;
    let second = login(&app, "alice").await;

    assert_eq!(first.len(), 64);
    assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(first, second, "every login must mint a unique token");

    // Both sessions are live concurrently.
    let (status, _) = send_json(&app, "GET", "/api/profile", Some(&first), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send_json(&app, "GET", "/api/profile", Some(&second), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_validates_fields() {
    let app = spawn_app().await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/register",
        None,
        Some(json!({"username": "bob", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("All fields required"));

    let (status, _) = send_json(
        &app,
        "POST",
        "/register",
        None,
        Some(json!({"username": "", "email": "b@example.com", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_rejects_duplicates() {
    let app = spawn_app().await;
    register(&app, "carol").await;

    // Same username, different email.
    let (status, body) = send_json(
        &app,
        "POST",
        "/register",
        None,
        Some(json!({
            "username": "carol",
            "email": "other@example.com",
            "password": "pw",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], json!("User already exists"));

    // Same email, different username.
    let (status, _) = send_json(
        &app,
        "POST",
        "/register",
        None,
        Some(json!({
            "username": "carol2",
            "email": "carol@example.com",
            "password": "pw",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_requires_identifier_and_rejects_bad_credentials() {
    let app = spawn_app().await;
    register(&app, "dave").await;

    let (status, body) =
        send_json(&app, "POST", "/login", None, Some(json!({"password": "pw"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Please provide username or email"));

    let (status, _) = send_json(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({"username": "dave", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send_json(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({"username": "nobody", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_by_email() {
    let app = spawn_app().await;
    register(&app, "erin").await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/login",
        None,
        Some(json!({"email": "erin@example.com", "password": "correct horse"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn test_logout_invalidates_token_everywhere() {
    let app = spawn_app().await;
    register(&app, "frank").await;
    let token = login(&app, "frank").await;

    let (status, _) = send_json(&app, "GET", "/api/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/logout")
                .header("Authorization", &token)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/");

    for uri in [
        "/api/profile",
        "/api/cart",
        "/api/orders",
    ] {
        let (status, _) = send_json(&app, "GET", uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "token must be dead for {uri}");
    }
}

#[tokio::test]
async fn test_auth_middleware_rejections() {
    let app = spawn_app().await;

    let (status, body) = send_json(&app, "GET", "/api/cart", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("Missing token"));

    let (status, body) = send_json(&app, "GET", "/api/cart", Some("not-a-real-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("Invalid session"));
}

#[tokio::test]
async fn test_profile_returns_username_and_email() {
    let app = spawn_app().await;
    register(&app, "grace").await;
    let token = login(&app, "grace").await;

    let (status, body) = send_json(&app, "GET", "/api/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], json!("grace"));
    assert_eq!(body["email"], json!("grace@example.com"));
}

#[tokio::test]
async fn test_products_are_seeded_and_public() {
    let app = spawn_app().await;

    let (status, body) = send_json(&app, "GET", "/api/products", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let products = body.as_array().expect("products must be an array");
    assert!(!products.is_empty());
    for product in products {
        assert!(product["id"].is_string());
        assert!(product["name"].is_string());
        assert!(product["price"].as_f64().unwrap() > 0.0);
    }
}

#[tokio::test]
async fn test_health_pings_the_store() {
    let app = spawn_app().await;

    let (status, body) = send_json(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("ok"));
}
