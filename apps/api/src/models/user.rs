use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Full account record as persisted. The password hash never leaves the
/// server: it is skipped on serialization and all client-facing responses go
/// through [`PublicUser`] or [`UserProfile`] anyway.
#[derive(Debug, Clone, Deserialize, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub current_role: Option<String>,
    pub target_role: Option<String>,
    pub location: Option<String>,
    pub experience_level: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
    pub job_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The subset of user fields returned alongside a freshly issued token.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Full profile as the client renders it. Unset optional fields are reported
/// as empty strings, which is the wire contract the client was written
/// against.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub current_role: String,
    pub target_role: String,
    pub location: String,
    pub experience_level: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
    pub job_notes: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            current_role: user.current_role.clone().unwrap_or_default(),
            target_role: user.target_role.clone().unwrap_or_default(),
            location: user.location.clone().unwrap_or_default(),
            experience_level: user.experience_level.clone().unwrap_or_default(),
            linkedin: user.linkedin.clone().unwrap_or_default(),
            github: user.github.clone().unwrap_or_default(),
            portfolio: user.portfolio.clone().unwrap_or_default(),
            job_notes: user.job_notes.clone().unwrap_or_default(),
        }
    }
}

/// Fields required to persist a new account. The hash is computed before this
/// struct is built.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Profile patch. A `None` field means "leave unchanged"; a present field
/// overwrites, including with an empty string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub current_role: Option<String>,
    pub target_role: Option<String>,
    pub location: Option<String>,
    pub experience_level: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
    pub job_notes: Option<String>,
}
