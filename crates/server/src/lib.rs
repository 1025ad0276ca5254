use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run, run_with_listener, spawn_with_listener};
pub use sessions::Sessions;

mod auth;
mod campaigns;
mod categories;
mod donations;
mod server;
mod sessions;
mod users;

pub mod types {
    pub mod user {
        pub use api_types::user::{AuthResponse, Login, Register, UserView};
    }

    pub mod campaign {
        pub use api_types::campaign::{
            CampaignListParams, CampaignNew, CampaignStatsView, CampaignUpdate, CampaignView,
        };
    }

    pub mod donation {
        pub use api_types::donation::{DonationNew, DonationView};
    }

    pub mod category {
        pub use api_types::category::CategoryView;
    }
}

pub enum ServerError {
    Engine(EngineError),
    Unauthorized(String),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

#[derive(Serialize)]
struct Message {
    message: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::Validation(_) | EngineError::ExistingKey(_) | EngineError::InvalidState(_) => {
            StatusCode::BAD_REQUEST
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Unauthorized(err) => (StatusCode::UNAUTHORIZED, err),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
