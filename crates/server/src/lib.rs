use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use api_types::ErrorResponse;
pub use server::{CorsConfig, ServerState, router, run_with_listener, spawn_with_listener};

mod auth;
mod offers;
mod server;
mod users;
mod views;
mod wishes;
mod wishlists;

pub mod types {
    pub mod auth {
        pub use api_types::auth::{SignIn, SignInResponse, SignUp};
    }

    pub mod user {
        pub use api_types::user::{FindUsers, UserProfile, UserPublic, UserUpdate};
    }

    pub mod wish {
        pub use api_types::wish::{WishNew, WishSummary, WishUpdate, WishView};
    }

    pub mod offer {
        pub use api_types::offer::{OfferNew, OfferView};
    }

    pub mod wishlist {
        pub use api_types::wishlist::{WishlistNew, WishlistUpdate, WishlistView};
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        EngineError::InvalidInput(_) | EngineError::InvalidState(_) => StatusCode::BAD_REQUEST,
        EngineError::InvalidAmount(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
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
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
