//! Authentication and authorization for the Kith API

use std::sync::Arc;

use axum::{
    Extension,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{error::ServerError, state::AppState};

/// What a token is good for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    /// Ordinary session token
    Session,
    /// Short-lived email verification token
    Verification,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account ID
    pub sub: String,
    /// Username
    pub username: String,
    /// Token purpose
    pub purpose: TokenPurpose,
    /// Issued at timestamp
    pub iat: usize,
    /// Expiration timestamp
    pub exp: usize,
}

/// Authenticated caller context
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Account ID
    pub account_id: Uuid,
    /// Username
    pub username: String,
}

/// Account registration request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// First name (3-30 characters)
    pub first_name: String,
    /// Last name (3-30 characters)
    pub last_name: String,
    /// Email address (must be unique)
    pub email: String,
    /// Password (6-40 characters, will be hashed)
    pub password: String,
    /// Birth date components
    pub birth_year: u16,
    pub birth_month: u8,
    pub birth_day: u8,
    /// Self-described gender
    pub gender: String,
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
}

/// Authentication response
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    /// Account ID
    pub id: String,
    /// Username
    pub username: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Profile picture URL, if set
    pub picture: Option<String>,
    /// Whether the email address is verified
    pub verified: bool,
    /// Session JWT token
    pub token: String,
    /// Token expiration timestamp
    pub expires_at: i64,
    /// Informational message, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let path = request.uri().path();
    if is_public_endpoint(path) {
        return Ok(next.run(request).await);
    }

    match headers.typed_get::<Authorization<Bearer>>() {
        Some(auth_header) => {
            // Session tokens only; verification tokens are consumed by
            // the activate endpoint body, never as a bearer credential.
            let auth_context =
                validate_session_token(auth_header.token(), &state.config.jwt_secret)?;
            request.extensions_mut().insert(auth_context);
            Ok(next.run(request).await)
        }
        None if !state.config.enable_auth => Ok(next.run(request).await),
        None => Err(ServerError::Auth("Missing authorization header".to_string())),
    }
}

/// Check if an endpoint is public (doesn't require authentication)
fn is_public_endpoint(path: &str) -> bool {
    // Paths are seen prefix-stripped inside the nested /api router.
    matches!(path, "/health" | "/auth/login" | "/auth/register")
        || path.starts_with("/docs")
        || path.starts_with("/api-docs")
}

/// Pull the caller out of the request extensions, erroring when the
/// request carried no valid token (possible with auth disabled).
pub fn require_auth(auth: Option<Extension<AuthContext>>) -> Result<AuthContext, ServerError> {
    auth.map(|Extension(context)| context)
        .ok_or_else(|| ServerError::Auth("This operation requires a signed-in caller".to_string()))
}

/// Validate a session JWT token and return the authentication context
pub fn validate_session_token(token: &str, secret: &str) -> Result<AuthContext, ServerError> {
    let claims = decode_token(token, secret)?;
    if claims.purpose != TokenPurpose::Session {
        return Err(ServerError::Auth("Not a session token".to_string()));
    }

    let account_id = Uuid::parse_str(&claims.sub)
        .map_err(|e| ServerError::Auth(format!("Invalid account ID in token: {}", e)))?;

    Ok(AuthContext {
        account_id,
        username: claims.username,
    })
}

/// Decode and validate any Kith JWT, returning its claims
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, ServerError> {
    let decoding_key = DecodingKey::from_secret(secret.as_ref());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| ServerError::Auth(format!("Invalid token: {}", e)))?;

    Ok(token_data.claims)
}

/// Generate a JWT token for an account
pub fn generate_jwt_token(
    account_id: &Uuid,
    username: &str,
    purpose: TokenPurpose,
    secret: &str,
    expiration_hours: u64,
) -> Result<(String, i64), ServerError> {
    let now = chrono::Utc::now().timestamp() as usize;
    let exp = now + (expiration_hours * 3600) as usize;

    let claims = Claims {
        sub: account_id.to_string(),
        username: username.to_string(),
        purpose,
        iat: now,
        exp,
    };

    let encoding_key = EncodingKey::from_secret(secret.as_ref());
    let token = encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| ServerError::Auth(format!("Failed to generate token: {}", e)))?;

    Ok((token, exp as i64))
}

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, ServerError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| ServerError::Auth(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServerError> {
    bcrypt::verify(password, hash)
        .map_err(|e| ServerError::Auth(format!("Failed to verify password: {}", e)))
}
