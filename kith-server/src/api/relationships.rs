//! Relationship endpoints: the seven guarded graph transitions
//!
//! Every handler resolves the caller from the bearer token, runs one
//! transition against the target account in the path, and answers 200
//! with the outcome message whether the transition applied or the pair
//! was already in the requested state. Self-reference and unknown
//! accounts surface as 400 and 404 through the error type.

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use kith::graph::RelationshipAction;

use crate::{
    api::auth::{AuthContext, require_auth},
    api::auth_endpoints::MessageResponse,
    error::ServerError,
    state::AppState,
};

async fn run_transition(
    state: &AppState,
    action: RelationshipAction,
    auth: Option<Extension<AuthContext>>,
    target: Uuid,
) -> Result<Json<MessageResponse>, ServerError> {
    let caller = require_auth(auth)?;
    let outcome = state.engine.run(action, caller.account_id, target).await?;

    let message = match outcome {
        kith::graph::Outcome::Applied => action.applied_message(),
        kith::graph::Outcome::AlreadyInState => action.already_message(),
    };

    Ok(Json(MessageResponse {
        message: message.to_string(),
    }))
}

/// Send a friend request to another account
#[utoipa::path(
    put,
    path = "/api/relationships/{id}/request",
    tag = "relationships",
    summary = "Send a friend request",
    params(("id" = Uuid, Path, description = "Target account ID")),
    responses(
        (status = 200, description = "Request sent or already pending", body = MessageResponse),
        (status = 400, description = "Cannot send a request to yourself"),
        (status = 404, description = "Target account not found"),
    )
)]
pub async fn send_request(
    State(state): State<Arc<AppState>>,
    auth: Option<Extension<AuthContext>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ServerError> {
    run_transition(&state, RelationshipAction::SendFriendRequest, auth, id).await
}

/// Cancel a friend request the caller sent
#[utoipa::path(
    put,
    path = "/api/relationships/{id}/cancel",
    tag = "relationships",
    summary = "Cancel a sent friend request",
    params(("id" = Uuid, Path, description = "Target account ID")),
    responses(
        (status = 200, description = "Request cancelled or already cancelled", body = MessageResponse),
        (status = 400, description = "Cannot cancel a request to yourself"),
        (status = 404, description = "Target account not found"),
    )
)]
pub async fn cancel_request(
    State(state): State<Arc<AppState>>,
    auth: Option<Extension<AuthContext>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ServerError> {
    run_transition(&state, RelationshipAction::CancelFriendRequest, auth, id).await
}

/// Follow another account
#[utoipa::path(
    put,
    path = "/api/relationships/{id}/follow",
    tag = "relationships",
    summary = "Follow an account",
    params(("id" = Uuid, Path, description = "Target account ID")),
    responses(
        (status = 200, description = "Now following or already following", body = MessageResponse),
        (status = 400, description = "Cannot follow yourself"),
        (status = 404, description = "Target account not found"),
    )
)]
pub async fn follow(
    State(state): State<Arc<AppState>>,
    auth: Option<Extension<AuthContext>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ServerError> {
    run_transition(&state, RelationshipAction::Follow, auth, id).await
}

/// Unfollow another account
#[utoipa::path(
    put,
    path = "/api/relationships/{id}/unfollow",
    tag = "relationships",
    summary = "Unfollow an account",
    params(("id" = Uuid, Path, description = "Target account ID")),
    responses(
        (status = 200, description = "Unfollowed or already not following", body = MessageResponse),
        (status = 400, description = "Cannot unfollow yourself"),
        (status = 404, description = "Target account not found"),
    )
)]
pub async fn unfollow(
    State(state): State<Arc<AppState>>,
    auth: Option<Extension<AuthContext>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ServerError> {
    run_transition(&state, RelationshipAction::Unfollow, auth, id).await
}

/// Accept a pending friend request from another account
#[utoipa::path(
    put,
    path = "/api/relationships/{id}/accept",
    tag = "relationships",
    summary = "Accept a friend request",
    params(("id" = Uuid, Path, description = "Sender account ID")),
    responses(
        (status = 200, description = "Request accepted or already friends", body = MessageResponse),
        (status = 400, description = "Cannot accept a request from yourself"),
        (status = 404, description = "Sender account not found"),
    )
)]
pub async fn accept_request(
    State(state): State<Arc<AppState>>,
    auth: Option<Extension<AuthContext>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ServerError> {
    run_transition(&state, RelationshipAction::AcceptFriendRequest, auth, id).await
}

/// Sever a friendship
#[utoipa::path(
    put,
    path = "/api/relationships/{id}/unfriend",
    tag = "relationships",
    summary = "Unfriend an account",
    params(("id" = Uuid, Path, description = "Target account ID")),
    responses(
        (status = 200, description = "Unfriended or already not friends", body = MessageResponse),
        (status = 400, description = "Cannot unfriend yourself"),
        (status = 404, description = "Target account not found"),
    )
)]
pub async fn unfriend(
    State(state): State<Arc<AppState>>,
    auth: Option<Extension<AuthContext>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ServerError> {
    run_transition(&state, RelationshipAction::Unfriend, auth, id).await
}

/// Discard a pending friend request in the caller's inbox
#[utoipa::path(
    put,
    path = "/api/relationships/{id}/remove-request",
    tag = "relationships",
    summary = "Delete an incoming friend request",
    params(("id" = Uuid, Path, description = "Sender account ID")),
    responses(
        (status = 200, description = "Request deleted or already deleted", body = MessageResponse),
        (status = 400, description = "Cannot delete a request from yourself"),
        (status = 404, description = "Sender account not found"),
    )
)]
pub async fn remove_request(
    State(state): State<Arc<AppState>>,
    auth: Option<Extension<AuthContext>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ServerError> {
    run_transition(&state, RelationshipAction::DeleteIncomingRequest, auth, id).await
}
