//! Error handling for the authentication service

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::authenticator::AuthenticatorError;

/// Errors surfaced to HTTP clients
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid password")]
    InvalidPassword { attempts_remaining: u32 },

    #[error("Too many login attempts. Please try again later.")]
    TooManyAttempts { retry_after: u64 },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Current password is incorrect")]
    WrongCurrentPassword,

    #[error("Admin password not configured")]
    NotConfigured,

    #[error("Server error")]
    InternalServerError,
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::BadRequest(rejection.body_text())
    }
}

impl From<AuthenticatorError> for AuthError {
    fn from(err: AuthenticatorError) -> Self {
        match err {
            AuthenticatorError::NotConfigured => AuthError::NotConfigured,
            other => {
                error!("Authentication failed internally: {}", other);
                AuthError::InternalServerError
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, body) = match self {
            AuthError::BadRequest(_) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            AuthError::InvalidPassword { attempts_remaining } => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": message, "attemptsRemaining": attempts_remaining }),
            ),
            AuthError::TooManyAttempts { retry_after } => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({ "error": message, "retryAfter": retry_after }),
            ),
            AuthError::Unauthorized | AuthError::WrongCurrentPassword => {
                (StatusCode::UNAUTHORIZED, json!({ "error": message }))
            }
            AuthError::NotConfigured | AuthError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": message }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
