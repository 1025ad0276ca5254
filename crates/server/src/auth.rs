//! Session API endpoints

use api_types::user::{AuthResponse, Login, Register, UserView};
use axum::{Json, extract::State, http::StatusCode};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use engine::NewUser;

use crate::{
    Message, ServerError,
    server::{CurrentUser, ServerState},
    users,
};

/// Handle requests for registering a new account
///
/// A successful registration also opens a session, so the client can act
/// immediately with the returned token.
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<Register>,
) -> Result<(StatusCode, Json<AuthResponse>), ServerError> {
    let user = state
        .engine
        .register(NewUser {
            username: payload.username,
            password: payload.password,
            email: payload.email,
            full_name: payload.full_name,
            avatar_url: payload.avatar_url,
            bio: payload.bio,
            role: payload.role,
        })
        .await?;

    let token = state.sessions.create(user.id).await;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: users::view(user),
        }),
    ))
}

/// Handle requests for opening a session
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<Login>,
) -> Result<Json<AuthResponse>, ServerError> {
    let user = state
        .engine
        .authenticate(&payload.username, &payload.password)
        .await?
        .ok_or_else(|| ServerError::Unauthorized("invalid username or password".to_string()))?;

    let token = state.sessions.create(user.id).await;

    Ok(Json(AuthResponse {
        token,
        user: users::view(user),
    }))
}

/// Handle requests for closing the current session
pub async fn logout(
    CurrentUser(_user): CurrentUser,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
    State(state): State<ServerState>,
) -> Result<Json<Message>, ServerError> {
    state.sessions.remove(bearer.token()).await;

    Ok(Json(Message {
        message: "Logged out successfully".to_string(),
    }))
}

/// Handle requests for the caller's own account
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserView> {
    Json(users::view(user))
}
