//! Middleware for bearer token validation

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use common::{http::bearer_token, token::Claims};
use tracing::debug;

use crate::{AppState, error::AuthError};

/// Require an admin bearer token and hand its claims to the handler
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(req.headers()).ok_or(AuthError::Unauthorized)?;

    let claims = state
        .token_service
        .verify(token)
        .filter(Claims::is_admin)
        .ok_or_else(|| {
            debug!("Rejected request to {} without a valid admin token", req.uri().path());
            AuthError::Unauthorized
        })?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
