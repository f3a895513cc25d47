use axum::{extract::State, http::StatusCode, Json};

use crate::errors::AppError;
use crate::models::user::{UserPatch, UserProfile};
use crate::state::AppState;

use super::extract::AuthUser;
use super::service::{self, AuthResponse, LoginRequest, ProfileResponse, RegisterRequest};

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let response = service::register(state.users.as_ref(), &state.config.jwt_secret, req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = service::login(state.users.as_ref(), &state.config.jwt_secret, req).await?;
    Ok(Json(response))
}

/// GET /api/auth/me
pub async fn handle_get_me(AuthUser(user): AuthUser) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        message: "Profile fetched successfully".to_string(),
        user: UserProfile::from(&user),
    })
}

/// PUT /api/auth/me
pub async fn handle_update_me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(patch): Json<UserPatch>,
) -> Result<Json<ProfileResponse>, AppError> {
    let response = service::update_profile(state.users.as_ref(), &user, patch).await?;
    Ok(Json(response))
}
