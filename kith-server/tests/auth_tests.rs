//! Tests for JWT authentication, registration and email verification

use axum::http::StatusCode;
use axum_test::TestServer;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use kith::storage::MemoryAccountStore;
use kith_server::{
    api::auth::{Claims, TokenPurpose, generate_jwt_token},
    api::auth_service::AuthService,
    config::ServerConfig,
    state::AppState,
};

const TEST_SECRET: &str = "test-secret-key-for-jwt-token-generation";

async fn create_test_server_with_auth() -> (TestServer, Arc<AppState>) {
    let store = Arc::new(MemoryAccountStore::new());

    let mut server_config = ServerConfig::default();
    server_config.enable_auth = true;
    server_config.allow_signup = true;
    server_config.jwt_secret = TEST_SECRET.to_string();

    let mut app_state = AppState::new(store, server_config.clone());
    app_state.set_auth_service(AuthService::new(
        server_config.jwt_secret.clone(),
        server_config.base_url.clone(),
    ));

    let state = Arc::new(app_state);
    let app = kith_server::create_router(state.clone());
    let server = TestServer::new(app).unwrap();

    (server, state)
}

fn register_body(first: &str, last: &str, email: &str) -> serde_json::Value {
    json!({
        "first_name": first,
        "last_name": last,
        "email": email,
        "password": "hunter2secret",
        "birth_year": 1990,
        "birth_month": 6,
        "birth_day": 15,
        "gender": "female"
    })
}

#[tokio::test]
async fn test_jwt_token_generation() {
    let account_id = Uuid::new_v4();
    let username = "testuser";
    let expiration_hours = 24;

    let (token, expires_at) = generate_jwt_token(
        &account_id,
        username,
        TokenPurpose::Session,
        TEST_SECRET,
        expiration_hours,
    )
    .unwrap();

    // Token should not be empty
    assert!(!token.is_empty());

    // Expiration should be in the future
    let now = chrono::Utc::now().timestamp();
    assert!(expires_at > now);

    // Token should be decodable
    let decoding_key = DecodingKey::from_secret(TEST_SECRET.as_ref());
    let validation = Validation::default();
    let token_data = decode::<Claims>(&token, &decoding_key, &validation).unwrap();

    // Verify claims
    assert_eq!(token_data.claims.sub, account_id.to_string());
    assert_eq!(token_data.claims.username, username);
    assert_eq!(token_data.claims.purpose, TokenPurpose::Session);
}

#[tokio::test]
async fn test_jwt_token_validation_wrong_secret() {
    let account_id = Uuid::new_v4();

    let (token, _) = generate_jwt_token(
        &account_id,
        "testuser",
        TokenPurpose::Session,
        TEST_SECRET,
        24,
    )
    .unwrap();

    // Token with wrong secret should fail validation
    let decoding_key = DecodingKey::from_secret("wrong-secret-key".as_ref());
    let validation = Validation::default();
    let result = decode::<Claims>(&token, &decoding_key, &validation);
    assert!(result.is_err());
}

#[tokio::test]
async fn test_register_returns_session_token() {
    let (server, _state) = create_test_server_with_auth().await;

    let response = server
        .post("/api/auth/register")
        .json(&register_body("Alice", "Liddell", "alice@example.com"))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert_eq!(body["first_name"], "Alice");
    assert_eq!(body["verified"], false);
    assert_eq!(body["username"], "aliceliddell");
    assert!(!body["token"].as_str().unwrap().is_empty());

    // The returned token works as a bearer credential
    let username = body["username"].as_str().unwrap();
    let token = body["token"].as_str().unwrap();
    let profile = server
        .get(&format!("/api/profiles/{username}"))
        .authorization_bearer(token)
        .await;
    assert_eq!(profile.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let (server, _state) = create_test_server_with_auth().await;

    let response = server
        .post("/api/auth/register")
        .json(&register_body("Alice", "Liddell", "alice@example.com"))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let response = server
        .post("/api/auth/register")
        .json(&register_body("Alison", "Liddell", "alice@example.com"))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_colliding_names_get_distinct_usernames() {
    let (server, _state) = create_test_server_with_auth().await;

    let first = server
        .post("/api/auth/register")
        .json(&register_body("Alice", "Liddell", "alice@example.com"))
        .await;
    let second = server
        .post("/api/auth/register")
        .json(&register_body("Alice", "Liddell", "alice2@example.com"))
        .await;
    assert_eq!(second.status_code(), StatusCode::CREATED);

    let first: serde_json::Value = first.json();
    let second: serde_json::Value = second.json();
    let first_name = first["username"].as_str().unwrap();
    let second_name = second["username"].as_str().unwrap();
    assert_ne!(first_name, second_name);
    assert!(second_name.starts_with("aliceliddell"));
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let (server, _state) = create_test_server_with_auth().await;

    let mut body = register_body("Alice", "Liddell", "alice@example.com");
    body["password"] = json!("short");
    let response = server.post("/api/auth/register").json(&body).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let (server, _state) = create_test_server_with_auth().await;

    let response = server
        .post("/api/auth/register")
        .json(&register_body("Alice", "Liddell", "not-an-email"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_flow() {
    let (server, _state) = create_test_server_with_auth().await;

    server
        .post("/api/auth/register")
        .json(&register_body("Alice", "Liddell", "alice@example.com"))
        .await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({"email": "alice@example.com", "password": "hunter2secret"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert!(!body["token"].as_str().unwrap().is_empty());

    // Wrong password
    let response = server
        .post("/api/auth/login")
        .json(&json!({"email": "alice@example.com", "password": "wrong-password"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    // Unknown email
    let response = server
        .post("/api/auth/login")
        .json(&json!({"email": "nobody@example.com", "password": "hunter2secret"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_endpoint_requires_token() {
    let (server, _state) = create_test_server_with_auth().await;

    let response = server.get("/api/profiles/someone").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_activation_flow() {
    let (server, _state) = create_test_server_with_auth().await;

    let response = server
        .post("/api/auth/register")
        .json(&register_body("Alice", "Liddell", "alice@example.com"))
        .await;
    let body: serde_json::Value = response.json();
    let session_token = body["token"].as_str().unwrap().to_string();
    let account_id = Uuid::parse_str(body["id"].as_str().unwrap()).unwrap();
    let username = body["username"].as_str().unwrap().to_string();

    // Build the verification token the mail would have carried
    let (verification_token, _) = generate_jwt_token(
        &account_id,
        &username,
        TokenPurpose::Verification,
        TEST_SECRET,
        24,
    )
    .unwrap();

    // A session token is not accepted as a verification token
    let response = server
        .post("/api/auth/activate")
        .authorization_bearer(&session_token)
        .json(&json!({"token": session_token}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = server
        .post("/api/auth/activate")
        .authorization_bearer(&session_token)
        .json(&json!({"token": verification_token}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "account has been activated");

    // Activating twice reports the account already verified
    let response = server
        .post("/api/auth/activate")
        .authorization_bearer(&session_token)
        .json(&json!({"token": verification_token}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    // Re-sending verification mail for a verified account also fails
    let response = server
        .post("/api/auth/send-verification")
        .authorization_bearer(&session_token)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_activation_rejects_another_accounts_token() {
    let (server, _state) = create_test_server_with_auth().await;

    let alice: serde_json::Value = server
        .post("/api/auth/register")
        .json(&register_body("Alice", "Liddell", "alice@example.com"))
        .await
        .json();
    let bob: serde_json::Value = server
        .post("/api/auth/register")
        .json(&register_body("Robert", "Marley", "bob@example.com"))
        .await
        .json();

    let bob_id = Uuid::parse_str(bob["id"].as_str().unwrap()).unwrap();
    let (bobs_verification, _) = generate_jwt_token(
        &bob_id,
        bob["username"].as_str().unwrap(),
        TokenPurpose::Verification,
        TEST_SECRET,
        24,
    )
    .unwrap();

    // Alice cannot consume Bob's verification token
    let response = server
        .post("/api/auth/activate")
        .authorization_bearer(alice["token"].as_str().unwrap())
        .json(&json!({"token": bobs_verification}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_send_verification_for_unverified_account() {
    let (server, _state) = create_test_server_with_auth().await;

    let body: serde_json::Value = server
        .post("/api/auth/register")
        .json(&register_body("Alice", "Liddell", "alice@example.com"))
        .await
        .json();

    let response = server
        .post("/api/auth/send-verification")
        .authorization_bearer(body["token"].as_str().unwrap())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_signup_disabled() {
    let store = Arc::new(MemoryAccountStore::new());
    let mut server_config = ServerConfig::default();
    server_config.enable_auth = true;
    server_config.allow_signup = false;
    server_config.jwt_secret = TEST_SECRET.to_string();

    let mut app_state = AppState::new(store, server_config.clone());
    app_state.set_auth_service(AuthService::new(
        server_config.jwt_secret.clone(),
        server_config.base_url.clone(),
    ));
    let server = TestServer::new(kith_server::create_router(Arc::new(app_state))).unwrap();

    let response = server
        .post("/api/auth/register")
        .json(&register_body("Alice", "Liddell", "alice@example.com"))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}
