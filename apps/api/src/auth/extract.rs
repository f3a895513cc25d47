use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

use super::service;

/// Extractor gating every route under the applications and profile
/// namespaces. Resolves `Authorization: Bearer <token>` to the full account
/// record; any failure along the way is a 401.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized)?;
        let bearer_token = header_value
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        let user =
            service::authenticate(state.users.as_ref(), &state.config.jwt_secret, bearer_token)
                .await?;
        Ok(Self(user))
    }
}
