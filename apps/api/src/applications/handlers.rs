use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::extract::AuthUser;
use crate::errors::AppError;
use crate::models::application::{ApplicationPatch, JobApplication};
use crate::state::AppState;

use super::service::{self, CreateApplicationRequest};

/// GET /api/applications
pub async fn handle_list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<JobApplication>>, AppError> {
    let applications = service::list(state.applications.as_ref(), user.id).await?;
    Ok(Json(applications))
}

/// POST /api/applications
pub async fn handle_create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateApplicationRequest>,
) -> Result<(StatusCode, Json<JobApplication>), AppError> {
    let application = service::create(state.applications.as_ref(), user.id, req).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// PUT /api/applications/:id
pub async fn handle_update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<ApplicationPatch>,
) -> Result<Json<JobApplication>, AppError> {
    let application = service::update(state.applications.as_ref(), user.id, id, patch).await?;
    Ok(Json(application))
}

/// DELETE /api/applications/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    service::delete(state.applications.as_ref(), user.id, id).await?;
    Ok(Json(json!({ "message": "Application deleted successfully" })))
}
