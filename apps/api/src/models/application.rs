use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Pipeline stage of a job application. Stored as the `application_status`
/// Postgres enum; serialized with the variant names the client displays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "application_status")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Interview,
    Offer,
    Rejected,
    Wishlist,
}

/// One tracked job application, owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company: String,
    pub position: String,
    pub status: ApplicationStatus,
    pub applied_date: DateTime<Utc>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fully resolved insert record: defaults have already been applied by the
/// service layer.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub user_id: Uuid,
    pub company: String,
    pub position: String,
    pub status: ApplicationStatus,
    pub applied_date: DateTime<Utc>,
    pub notes: String,
}

/// Partial update. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPatch {
    pub company: Option<String>,
    pub position: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub applied_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}
