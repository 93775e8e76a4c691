//! End-to-end tests for the relationship endpoints

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;
use std::sync::Arc;

use kith::storage::MemoryAccountStore;
use kith_server::{api::auth_service::AuthService, config::ServerConfig, state::AppState};

const TEST_SECRET: &str = "test-secret-key-for-relationship-tests";

struct TestAccount {
    id: String,
    username: String,
    token: String,
}

async fn create_test_server() -> TestServer {
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

    TestServer::new(kith_server::create_router(Arc::new(app_state))).unwrap()
}

async fn register(server: &TestServer, first: &str, last: &str, email: &str) -> TestAccount {
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "first_name": first,
            "last_name": last,
            "email": email,
            "password": "hunter2secret",
            "birth_year": 1990,
            "birth_month": 6,
            "birth_day": 15,
            "gender": "other"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    TestAccount {
        id: body["id"].as_str().unwrap().to_string(),
        username: body["username"].as_str().unwrap().to_string(),
        token: body["token"].as_str().unwrap().to_string(),
    }
}

async fn transition(
    server: &TestServer,
    actor: &TestAccount,
    target_id: &str,
    verb: &str,
) -> (StatusCode, String) {
    let response = server
        .put(&format!("/api/relationships/{target_id}/{verb}"))
        .authorization_bearer(&actor.token)
        .await;
    let status = response.status_code();
    let body: serde_json::Value = response.json();
    let message = body["message"].as_str().unwrap_or_default().to_string();
    (status, message)
}

async fn friendship(
    server: &TestServer,
    viewer: &TestAccount,
    subject: &TestAccount,
) -> serde_json::Value {
    let response = server
        .get(&format!("/api/profiles/{}", subject.username))
        .authorization_bearer(&viewer.token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    body["friendship"].clone()
}

#[tokio::test]
async fn test_request_accept_unfriend_lifecycle() {
    let server = create_test_server().await;
    let alice = register(&server, "Alice", "Liddell", "alice@example.com").await;
    let bob = register(&server, "Robert", "Marley", "bob@example.com").await;

    // Alice sends Bob a friend request
    let (status, message) = transition(&server, &alice, &bob.id, "request").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message, "friend request has been sent");

    // Sending again is a no-op with its own message
    let (status, message) = transition(&server, &alice, &bob.id, "request").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message, "Already a friend");

    // Both sides see the pending request: the sender's own view reports
    // request_received (their id sits in the subject's inbox), the
    // receiver's view reports request_sent.
    let alice_view = friendship(&server, &alice, &bob).await;
    assert_eq!(alice_view["request_received"], true);
    assert_eq!(alice_view["following"], true);
    assert_eq!(alice_view["friends"], false);
    let bob_view = friendship(&server, &bob, &alice).await;
    assert_eq!(bob_view["request_sent"], true);

    // Bob accepts
    let (status, message) = transition(&server, &bob, &alice.id, "accept").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message, "friend request accepted");

    let alice_view = friendship(&server, &alice, &bob).await;
    assert_eq!(alice_view["friends"], true);
    assert_eq!(alice_view["following"], true);
    let bob_view = friendship(&server, &bob, &alice).await;
    assert_eq!(bob_view["friends"], true);

    // Accepting again reports the established friendship
    let (status, message) = transition(&server, &bob, &alice.id, "accept").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message, "Already friends");

    // Alice unfriends Bob
    let (status, message) = transition(&server, &alice, &bob.id, "unfriend").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message, "unfriend done");

    let (status, message) = transition(&server, &alice, &bob.id, "unfriend").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message, "Already not friends");

    let alice_view = friendship(&server, &alice, &bob).await;
    assert_eq!(alice_view["friends"], false);
}

#[tokio::test]
async fn test_cancel_reverses_a_sent_request() {
    let server = create_test_server().await;
    let alice = register(&server, "Alice", "Liddell", "alice@example.com").await;
    let bob = register(&server, "Robert", "Marley", "bob@example.com").await;

    transition(&server, &alice, &bob.id, "request").await;

    let (status, message) = transition(&server, &alice, &bob.id, "cancel").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message, "friend request has been successfully cancelled");

    let (status, message) = transition(&server, &alice, &bob.id, "cancel").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message, "Already cancelled");

    let bob_view = friendship(&server, &bob, &alice).await;
    assert_eq!(bob_view["request_sent"], false);
    // Cancelling also removes the follow the request created
    let alice_view = friendship(&server, &alice, &bob).await;
    assert_eq!(alice_view["following"], false);
}

#[tokio::test]
async fn test_receiver_can_delete_an_incoming_request() {
    let server = create_test_server().await;
    let alice = register(&server, "Alice", "Liddell", "alice@example.com").await;
    let bob = register(&server, "Robert", "Marley", "bob@example.com").await;

    transition(&server, &alice, &bob.id, "request").await;

    let (status, message) = transition(&server, &bob, &alice.id, "remove-request").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message, "delete request done");

    let (status, message) = transition(&server, &bob, &alice.id, "remove-request").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message, "Already deleted");

    let bob_view = friendship(&server, &bob, &alice).await;
    assert_eq!(bob_view["request_sent"], false);
}

#[tokio::test]
async fn test_follow_and_unfollow() {
    let server = create_test_server().await;
    let alice = register(&server, "Alice", "Liddell", "alice@example.com").await;
    let bob = register(&server, "Robert", "Marley", "bob@example.com").await;

    let (status, message) = transition(&server, &alice, &bob.id, "follow").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message, "follow success");

    let (status, message) = transition(&server, &alice, &bob.id, "follow").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message, "Already following");

    let alice_view = friendship(&server, &alice, &bob).await;
    assert_eq!(alice_view["following"], true);
    // A bare follow never creates a request or friendship
    assert_eq!(alice_view["request_sent"], false);
    assert_eq!(alice_view["friends"], false);

    let (status, message) = transition(&server, &alice, &bob.id, "unfollow").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message, "unfollow success");

    let (status, message) = transition(&server, &alice, &bob.id, "unfollow").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message, "Already not following");
}

#[tokio::test]
async fn test_self_reference_is_a_bad_request() {
    let server = create_test_server().await;
    let alice = register(&server, "Alice", "Liddell", "alice@example.com").await;

    for verb in [
        "request",
        "cancel",
        "follow",
        "unfollow",
        "accept",
        "unfriend",
        "remove-request",
    ] {
        let (status, _) = transition(&server, &alice, &alice.id, verb).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "verb: {verb}");
    }
}

#[tokio::test]
async fn test_unknown_target_is_not_found() {
    let server = create_test_server().await;
    let alice = register(&server, "Alice", "Liddell", "alice@example.com").await;
    let ghost = uuid::Uuid::new_v4().to_string();

    let (status, _) = transition(&server, &alice, &ghost, "follow").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_own_profile_carries_empty_projection() {
    let server = create_test_server().await;
    let alice = register(&server, "Alice", "Liddell", "alice@example.com").await;

    let view = friendship(&server, &alice, &alice).await;
    assert_eq!(view["friends"], false);
    assert_eq!(view["following"], false);
    assert_eq!(view["request_sent"], false);
    assert_eq!(view["request_received"], false);
}

#[tokio::test]
async fn test_update_profile_picture() {
    let server = create_test_server().await;
    let alice = register(&server, "Alice", "Liddell", "alice@example.com").await;

    let response = server
        .put("/api/profiles/picture")
        .authorization_bearer(&alice.token)
        .json(&json!({"url": "https://cdn.example.com/alice.png"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server
        .get(&format!("/api/profiles/{}", alice.username))
        .authorization_bearer(&alice.token)
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["picture"], "https://cdn.example.com/alice.png");

    // Empty URL is rejected
    let response = server
        .put("/api/profiles/picture")
        .authorization_bearer(&alice.token)
        .json(&json!({"url": "  "}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_profile_is_not_found() {
    let server = create_test_server().await;
    let alice = register(&server, "Alice", "Liddell", "alice@example.com").await;

    let response = server
        .get("/api/profiles/nobody")
        .authorization_bearer(&alice.token)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
