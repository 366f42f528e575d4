//! Authentication service routes

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, UserAgent, authorization::Bearer},
};
use common::http::{cors_layer, preflight};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::{
    AppState,
    authenticator::{LoginOutcome, PasswordChange},
    error::AuthError,
    middleware::auth_middleware,
    models::{ChangePasswordRequest, LoginRequest, LoginResponse},
    rate_limiter::client_id,
    repositories::login_log::LOGIN_LOG_LIMIT,
    validation::{require, validate_new_password},
};

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/auth/change-password", post(change_password))
        .route("/auth/logins", get(recent_logins))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/login", post(login))
        .route("/auth/verify", get(verify))
        .merge(admin)
        .layer(middleware::from_fn(preflight))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store_healthy = state.store.health_check().await.unwrap_or_else(|e| {
        error!("Store health check failed: {}", e);
        false
    });

    let status = if store_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if store_healthy { "ok" } else { "degraded" },
            "service": "auth-service",
            "store": store_healthy,
        })),
    )
}

/// Admin login endpoint
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    user_agent: Option<TypedHeader<UserAgent>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let Json(payload) = payload?;
    let password =
        require(payload.password.as_deref(), "Password is required").map_err(AuthError::BadRequest)?;

    let client = client_id(&headers);
    let user_agent = user_agent.as_ref().map(|TypedHeader(agent)| agent.as_str());

    match state.authenticator.login(&client, password, user_agent).await? {
        LoginOutcome::Authenticated { token } => Ok(Json(LoginResponse {
            success: true,
            token,
            expires_in: state.authenticator.token_expires_in(),
        })),
        LoginOutcome::Rejected { attempts_remaining } => {
            Err(AuthError::InvalidPassword { attempts_remaining })
        }
        LoginOutcome::Locked { retry_after } => Err(AuthError::TooManyAttempts { retry_after }),
    }
}

/// Token verification endpoint; always 200, validity is in the body
pub async fn verify(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> impl IntoResponse {
    let claims = bearer.and_then(|TypedHeader(auth)| state.token_service.verify(auth.token()));

    match claims {
        Some(claims) => Json(json!({ "valid": true, "user": claims })),
        None => Json(json!({ "valid": false })),
    }
}

/// Admin password change endpoint
pub async fn change_password(
    State(state): State<AppState>,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AuthError> {
    let Json(payload) = payload?;

    let missing = "Current and new password required";
    let current = require(payload.current_password.as_deref(), missing).map_err(AuthError::BadRequest)?;
    let new = require(payload.new_password.as_deref(), missing).map_err(AuthError::BadRequest)?;
    validate_new_password(new).map_err(AuthError::BadRequest)?;

    match state.authenticator.change_password(current, new).await? {
        PasswordChange::Changed => Ok(Json(json!({
            "success": true,
            "message": "Password changed successfully",
        }))),
        PasswordChange::WrongPassword => Err(AuthError::WrongCurrentPassword),
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginLogQuery {
    pub limit: Option<usize>,
}

/// Recent successful logins, newest first
pub async fn recent_logins(
    State(state): State<AppState>,
    Query(query): Query<LoginLogQuery>,
) -> Result<impl IntoResponse, AuthError> {
    let limit = query.limit.unwrap_or(LOGIN_LOG_LIMIT);
    let entries = state.authenticator.recent_logins(limit).await?;
    Ok(Json(entries))
}
