//! API implementation for the Kith HTTP server

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    middleware,
    response::Json,
    routing::{get, post, put},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

pub mod auth;
pub mod auth_endpoints;
pub mod auth_service;
pub mod profiles;
pub mod relationships;

use auth::auth_middleware;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        auth_endpoints::register,
        auth_endpoints::login,
        auth_endpoints::activate,
        auth_endpoints::send_verification,
        profiles::get_profile,
        profiles::update_picture,
        relationships::send_request,
        relationships::cancel_request,
        relationships::follow,
        relationships::unfollow,
        relationships::accept_request,
        relationships::unfriend,
        relationships::remove_request,
    ),
    components(
        schemas(
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            auth_endpoints::ActivateRequest,
            auth_endpoints::MessageResponse,
            profiles::ProfileResponse,
            profiles::FriendshipDto,
            profiles::UpdatePictureRequest,
            profiles::UpdatePictureResponse,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and email verification"),
        (name = "profiles", description = "Profile lookup and updates"),
        (name = "relationships", description = "Follows, friend requests and friendships"),
    ),
    info(
        title = "Kith API",
        version = "0.1.0",
        description = "RESTful API for the Kith social graph: accounts, follows, friend requests and friendships.",
        contact(
            name = "Kith Contributors",
            url = "https://github.com/kith-net/kith"
        ),
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/api", description = "API base path")
    )
)]
pub struct ApiDoc;

/// Create the main router with all API endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        // Authentication endpoints
        .route("/auth/register", post(auth_endpoints::register))
        .route("/auth/login", post(auth_endpoints::login))
        .route("/auth/activate", post(auth_endpoints::activate))
        .route(
            "/auth/send-verification",
            post(auth_endpoints::send_verification),
        )
        // Profile endpoints
        .route("/profiles/{username}", get(profiles::get_profile))
        .route("/profiles/picture", put(profiles::update_picture))
        // Relationship endpoints: one route per guarded transition
        .route(
            "/relationships/{id}/request",
            put(relationships::send_request),
        )
        .route(
            "/relationships/{id}/cancel",
            put(relationships::cancel_request),
        )
        .route("/relationships/{id}/follow", put(relationships::follow))
        .route("/relationships/{id}/unfollow", put(relationships::unfollow))
        .route(
            "/relationships/{id}/accept",
            put(relationships::accept_request),
        )
        .route("/relationships/{id}/unfriend", put(relationships::unfriend))
        .route(
            "/relationships/{id}/remove-request",
            put(relationships::remove_request),
        )
        // Health check endpoint
        .route("/health", get(health_check))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state);

    // Main router with API prefix and documentation
    let swagger_router = SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi());

    Router::new().nest("/api", api_router).merge(swagger_router)
}

/// Health check endpoint with capability reporting
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health and capabilities", body = serde_json::Value)
    )
)]
async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let store_healthy = state.store.health_check().await.unwrap_or(false);

    Json(serde_json::json!({
        "status": if store_healthy { "OK" } else { "DEGRADED" },
        "version": kith::VERSION,
        "capabilities": {
            "authentication": state.config.enable_auth,
            "signup": state.config.allow_signup,
            "strict_guards": state.engine.config().strict_guards,
            "mail_relay": state.config.mail_relay_url.is_some(),
        }
    }))
}
