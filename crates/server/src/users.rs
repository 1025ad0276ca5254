//! User API endpoints

use api_types::user::UserView;
use axum::{
    Json,
    extract::{Path, State},
};
use engine::User;

use crate::{ServerError, server::ServerState};

/// Projects a user for the wire, stripping the password.
pub(crate) fn view(user: User) -> UserView {
    UserView {
        id: user.id,
        username: user.username,
        email: user.email,
        full_name: user.full_name,
        avatar_url: user.avatar_url,
        bio: user.bio,
        role: user.role,
        donation_count: user.donation_count,
        total_donated: user.total_donated,
        created_at: user.created_at,
    }
}

/// Handle requests for one user's public profile
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<UserView>, ServerError> {
    let user = state.engine.user(id).await?;
    Ok(Json(view(user)))
}
