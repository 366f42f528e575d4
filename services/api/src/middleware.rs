//! Authentication middleware for bearer token validation

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use common::{http::bearer_token, token::Claims};
use tracing::debug;

use crate::{error::ApiError, state::AppState};

/// Authentication middleware
///
/// Verifies the bearer token against the shared secret only; the store is
/// not consulted.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers()).ok_or(ApiError::Unauthorized)?;

    let claims = state
        .token_service
        .verify(token)
        .filter(Claims::is_admin)
        .ok_or_else(|| {
            debug!("Rejected {} {} without a valid admin token", req.method(), req.uri().path());
            ApiError::Unauthorized
        })?;

    // Insert the claims into the request extensions
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
