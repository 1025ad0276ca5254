use axum::{
    RequestPartsExt, Router,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use std::sync::Arc;

use crate::{ServerError, auth, campaigns, categories, donations, sessions::Sessions, users};
use engine::{Engine, User};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub sessions: Arc<Sessions>,
}

/// The user behind the request's bearer token.
///
/// Handlers that take a `CurrentUser` argument reject unauthenticated
/// requests with 401 before the handler body runs; routes without it stay
/// public.
pub struct CurrentUser(pub User);

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| ServerError::Unauthorized("not authenticated".to_string()))?;

        let user_id = state
            .sessions
            .user_id(bearer.token())
            .await
            .ok_or_else(|| ServerError::Unauthorized("not authenticated".to_string()))?;

        let user = state
            .engine
            .user(user_id)
            .await
            .map_err(|_| ServerError::Unauthorized("not authenticated".to_string()))?;

        Ok(CurrentUser(user))
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/users/{id}", get(users::get))
        .route("/api/campaigns", get(campaigns::list).post(campaigns::create))
        .route(
            "/api/campaigns/{id}",
            get(campaigns::get)
                .patch(campaigns::update)
                .delete(campaigns::delete),
        )
        .route("/api/campaigns/{id}/stats", get(campaigns::stats))
        .route(
            "/api/campaigns/category/{category}",
            get(campaigns::list_by_category),
        )
        .route(
            "/api/campaigns/creator/{creator_id}",
            get(campaigns::list_by_creator),
        )
        .route("/api/donations", post(donations::create))
        .route(
            "/api/donations/campaign/{campaign_id}",
            get(donations::list_by_campaign),
        )
        .route(
            "/api/donations/user/{user_id}",
            get(donations::list_by_user),
        )
        .route("/api/categories", get(categories::list))
        .with_state(state)
}

pub async fn run(engine: Engine, bind: &str) {
    let listener = match tokio::net::TcpListener::bind(bind).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        sessions: Arc::new(Sessions::new()),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
