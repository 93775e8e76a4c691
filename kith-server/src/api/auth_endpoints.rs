//! Authentication endpoints: registration, login, email verification

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    api::auth::{AuthContext, AuthResponse, LoginRequest, RegisterRequest, require_auth},
    error::ServerError,
    state::AppState,
};

/// Account activation request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ActivateRequest {
    /// Verification token from the activation link
    pub token: String,
}

/// Simple message response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

fn auth_service(state: &AppState) -> Result<&crate::api::auth_service::AuthService, ServerError> {
    state
        .auth_service
        .as_ref()
        .ok_or_else(|| ServerError::Internal("Authentication service not available".to_string()))
}

/// Account registration endpoint
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    summary = "Register a new account",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created successfully", body = AuthResponse),
        (status = 400, description = "Invalid request data"),
        (status = 409, description = "Email already registered"),
        (status = 401, description = "Signup disabled"),
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ServerError> {
    if !state.config.allow_signup {
        return Err(ServerError::Auth("Account signup is disabled".to_string()));
    }

    let auth_service = auth_service(&state)?;
    let (account, token, expires_at) = auth_service
        .register(&state.store, &state.mailer, request)
        .await?;

    let response = AuthResponse {
        id: account.id.to_string(),
        username: account.username,
        first_name: account.first_name,
        last_name: account.last_name,
        picture: account.picture,
        verified: account.verified,
        token,
        expires_at,
        message: Some("Register success! Please verify your email address".to_string()),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login endpoint
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    summary = "Authenticate and get a session token",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 400, description = "Invalid request data"),
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ServerError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ServerError::Auth(
            "Email and password are required".to_string(),
        ));
    }

    let auth_service = auth_service(&state)?;
    let (token, account, expires_at) = auth_service
        .authenticate(&state.store, &request.email, &request.password)
        .await?;

    Ok(Json(AuthResponse {
        id: account.id.to_string(),
        username: account.username,
        first_name: account.first_name,
        last_name: account.last_name,
        picture: account.picture,
        verified: account.verified,
        token,
        expires_at,
        message: None,
    }))
}

/// Account activation endpoint
#[utoipa::path(
    post,
    path = "/api/auth/activate",
    tag = "auth",
    summary = "Activate an account with a verification token",
    request_body = ActivateRequest,
    responses(
        (status = 200, description = "Account activated", body = MessageResponse),
        (status = 400, description = "Already verified or invalid token"),
        (status = 401, description = "Token belongs to another account"),
    )
)]
pub async fn activate(
    State(state): State<Arc<AppState>>,
    auth: Option<Extension<AuthContext>>,
    Json(request): Json<ActivateRequest>,
) -> Result<Json<MessageResponse>, ServerError> {
    let caller = require_auth(auth)?;
    let auth_service = auth_service(&state)?;

    auth_service
        .activate(&state.store, caller.account_id, &request.token)
        .await?;

    Ok(Json(MessageResponse {
        message: "account has been activated".to_string(),
    }))
}

/// Re-send the verification email for the signed-in account
#[utoipa::path(
    post,
    path = "/api/auth/send-verification",
    tag = "auth",
    summary = "Re-send the verification email",
    responses(
        (status = 200, description = "Verification email sent", body = MessageResponse),
        (status = 400, description = "Account already verified"),
        (status = 401, description = "Not signed in"),
    )
)]
pub async fn send_verification(
    State(state): State<Arc<AppState>>,
    auth: Option<Extension<AuthContext>>,
) -> Result<Json<MessageResponse>, ServerError> {
    let caller = require_auth(auth)?;
    let auth_service = auth_service(&state)?;

    auth_service
        .send_verification(&state.store, &state.mailer, caller.account_id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Email verification link has been sent to your account".to_string(),
    }))
}
