//! Profile endpoints: public profile lookup and picture updates

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use kith::graph::FriendshipStatus;
use kith::models::Account;

use crate::{
    api::auth::{AuthContext, require_auth},
    error::ServerError,
    state::AppState,
};

/// Public view of an account. The password hash never leaves the store
/// boundary through this type.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub picture: Option<String>,
    pub verified: bool,
    pub birth_year: u16,
    pub birth_month: u8,
    pub birth_day: u8,
    pub gender: String,
    /// Relationship between the caller and this profile
    pub friendship: FriendshipDto,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Friendship projection between the caller and a profile
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct FriendshipDto {
    pub friends: bool,
    pub following: bool,
    pub request_sent: bool,
    pub request_received: bool,
}

impl From<FriendshipStatus> for FriendshipDto {
    fn from(status: FriendshipStatus) -> Self {
        Self {
            friends: status.friends,
            following: status.following,
            request_sent: status.request_sent,
            request_received: status.request_received,
        }
    }
}

/// Profile picture update request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePictureRequest {
    /// URL of the new profile picture
    pub url: String,
}

/// Profile picture update response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdatePictureResponse {
    pub picture: String,
}

fn profile_response(account: Account, friendship: FriendshipDto) -> ProfileResponse {
    ProfileResponse {
        id: account.id.to_string(),
        username: account.username,
        first_name: account.first_name,
        last_name: account.last_name,
        email: account.email,
        picture: account.picture,
        verified: account.verified,
        birth_year: account.birth_year,
        birth_month: account.birth_month,
        birth_day: account.birth_day,
        gender: account.gender,
        friendship,
        created_at: account.created_at,
    }
}

/// Look up a profile by username
#[utoipa::path(
    get,
    path = "/api/profiles/{username}",
    tag = "profiles",
    summary = "Get a profile by username",
    params(
        ("username" = String, Path, description = "Username to look up")
    ),
    responses(
        (status = 200, description = "Profile found", body = ProfileResponse),
        (status = 404, description = "No account with that username"),
        (status = 401, description = "Not signed in"),
    )
)]
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    auth: Option<Extension<AuthContext>>,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, ServerError> {
    let caller = require_auth(auth)?;

    let account = state
        .store
        .get_by_username(&username)
        .await?
        .ok_or_else(|| ServerError::NotFound("user not found".to_string()))?;

    // Looking at your own profile carries an empty projection.
    let friendship = if account.id == caller.account_id {
        FriendshipDto::default()
    } else {
        state
            .engine
            .friendship_status(caller.account_id, account.id)
            .await?
            .into()
    };

    Ok(Json(profile_response(account, friendship)))
}

/// Update the caller's profile picture
#[utoipa::path(
    put,
    path = "/api/profiles/picture",
    tag = "profiles",
    summary = "Update the caller's profile picture",
    request_body = UpdatePictureRequest,
    responses(
        (status = 200, description = "Picture updated", body = UpdatePictureResponse),
        (status = 400, description = "Empty picture URL"),
        (status = 401, description = "Not signed in"),
    )
)]
pub async fn update_picture(
    State(state): State<Arc<AppState>>,
    auth: Option<Extension<AuthContext>>,
    Json(request): Json<UpdatePictureRequest>,
) -> Result<Json<UpdatePictureResponse>, ServerError> {
    let caller = require_auth(auth)?;

    let url = request.url.trim();
    if url.is_empty() {
        return Err(ServerError::BadRequest(
            "picture URL must not be empty".to_string(),
        ));
    }

    state
        .store
        .set_picture(caller.account_id, url.to_string())
        .await?;

    Ok(Json(UpdatePictureResponse {
        picture: url.to_string(),
    }))
}
