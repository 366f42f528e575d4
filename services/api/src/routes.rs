//! API service routes

use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use common::{
    http::{cors_layer, preflight},
    models::{SettingsDocument, SettingsKind},
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::{
    backup,
    error::{ApiError, ApiResult},
    middleware::auth_middleware,
    models::{BackupImport, ProjectIdPayload, ProjectPayload, ReorderRequest, SettingsUpdateRequest},
    state::AppState,
};

/// Create the router for the API service
///
/// Reads of `/projects` and `/settings` are public; every write needs an
/// admin bearer token.
pub fn create_router(state: AppState) -> Router {
    let admin = middleware::from_fn_with_state(state.clone(), auth_middleware);

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/projects",
            get(list_public_projects).merge(
                post(create_project)
                    .put(update_project)
                    .delete(delete_project)
                    .route_layer(admin.clone()),
            ),
        )
        .route(
            "/projects/all",
            get(list_all_projects).route_layer(admin.clone()),
        )
        .route(
            "/projects/order",
            put(reorder_projects).route_layer(admin.clone()),
        )
        .route(
            "/settings",
            get(get_settings).merge(post(update_settings).route_layer(admin.clone())),
        )
        .route(
            "/settings/export",
            get(export_backup).route_layer(admin.clone()),
        )
        .route(
            "/settings/import",
            post(import_backup).route_layer(admin),
        )
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
            "service": "api-service",
            "store": store_healthy,
        })),
    )
}

/// Visible projects, in display order
pub async fn list_public_projects(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.project_repository.list_public().await?))
}

/// Every project, hidden ones included
pub async fn list_all_projects(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.project_repository.list().await?))
}

/// Create a project
pub async fn create_project(
    State(state): State<AppState>,
    payload: Result<Json<ProjectPayload>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let draft = payload.into_draft().map_err(ApiError::BadRequest)?;

    let project = state.project_repository.create(draft).await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// Update the project named by the body's `id`
pub async fn update_project(
    State(state): State<AppState>,
    payload: Result<Json<ProjectPayload>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let (id, patch) = payload.into_patch().map_err(ApiError::BadRequest)?;

    let project = state
        .project_repository
        .update(&id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

/// Delete the project named by the body's `id` (or the `id` query parameter)
pub async fn delete_project(
    State(state): State<AppState>,
    Query(query): Query<ProjectIdPayload>,
    payload: Result<Json<ProjectIdPayload>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = payload
        .ok()
        .and_then(|Json(body)| body.id)
        .or(query.id)
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Project ID is required".to_string()))?;

    if !state.project_repository.delete(&id).await? {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    Ok(Json(json!({ "success": true })))
}

/// Rewrite the project order
pub async fn reorder_projects(
    State(state): State<AppState>,
    payload: Result<Json<ReorderRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let ids = payload
        .ids
        .ok_or_else(|| ApiError::BadRequest("Project IDs are required".to_string()))?;

    let projects = state
        .project_repository
        .reorder(&ids)
        .await?
        .ok_or_else(|| {
            ApiError::BadRequest("IDs must list every project exactly once".to_string())
        })?;

    Ok(Json(projects))
}

/// Public settings bundle
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.settings_repository.bundle().await?))
}

/// Replace one settings document
pub async fn update_settings(
    State(state): State<AppState>,
    payload: Result<Json<SettingsUpdateRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;

    let kind = payload.kind.filter(|kind| !kind.is_empty());
    let data = payload.data.filter(|data| !data.is_null());
    let (Some(kind), Some(data)) = (kind, data) else {
        return Err(ApiError::BadRequest(
            "Type and data are required".to_string(),
        ));
    };

    let kind: SettingsKind = kind.parse().map_err(ApiError::BadRequest)?;
    let document = SettingsDocument::parse(kind, data).map_err(ApiError::BadRequest)?;
    state.settings_repository.update(&document).await?;

    Ok(Json(json!({ "success": true })))
}

/// Download a full backup
pub async fn export_backup(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(backup::export(&state).await?))
}

/// Restore a backup
pub async fn import_backup(
    State(state): State<AppState>,
    payload: Result<Json<BackupImport>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    Ok(Json(backup::import(&state, payload).await?))
}
