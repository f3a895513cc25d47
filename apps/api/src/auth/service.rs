use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::user::{NewUser, PublicUser, User, UserPatch, UserProfile};
use crate::store::UserStore;

use super::{password, token};

/// Missing fields deserialize as empty strings so validation can answer with
/// the contract's 400 messages instead of a body-rejection status.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: PublicUser,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub message: String,
    pub user: UserProfile,
}

pub async fn register(
    store: &dyn UserStore,
    secret: &str,
    req: RegisterRequest,
) -> Result<AuthResponse, AppError> {
    if req.name.is_empty() || req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation("All fields are required".to_string()));
    }
    if req.password.chars().count() < 6 {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    if store.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let password_hash = password::hash(&req.password)?;
    let user = store
        .insert(NewUser {
            name: req.name,
            email: req.email,
            password_hash,
        })
        .await?;
    let token = token::sign(secret, user.id)?;

    Ok(AuthResponse {
        message: "User registered successfully".to_string(),
        user: PublicUser::from(&user),
        token,
    })
}

pub async fn login(
    store: &dyn UserStore,
    secret: &str,
    req: LoginRequest,
) -> Result<AuthResponse, AppError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    // Unknown email and wrong password share one error so the response never
    // reveals which half failed.
    let user = store
        .find_by_email(&req.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;
    if !password::verify(&req.password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    let token = token::sign(secret, user.id)?;

    Ok(AuthResponse {
        message: "Login successful".to_string(),
        user: PublicUser::from(&user),
        token,
    })
}

/// The API layer's authorization gate: validates the token and resolves the
/// account it references.
pub async fn authenticate(
    store: &dyn UserStore,
    secret: &str,
    bearer_token: &str,
) -> Result<User, AppError> {
    let claims = token::verify(secret, bearer_token)?;
    store
        .find_by_id(claims.sub)
        .await?
        .ok_or(AppError::Unauthorized)
}

pub async fn update_profile(
    store: &dyn UserStore,
    user: &User,
    patch: UserPatch,
) -> Result<ProfileResponse, AppError> {
    if let Some(email) = &patch.email {
        if email != &user.email {
            if let Some(existing) = store.find_by_email(email).await? {
                if existing.id != user.id {
                    return Err(AppError::Conflict(
                        "Email already in use by another account".to_string(),
                    ));
                }
            }
        }
    }

    let updated = store.update(user.id, patch).await?;

    Ok(ProfileResponse {
        message: "Profile updated successfully".to_string(),
        user: UserProfile::from(&updated),
    })
}
