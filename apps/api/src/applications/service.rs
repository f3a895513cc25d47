use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{ApplicationPatch, ApplicationStatus, JobApplication, NewApplication};
use crate::store::ApplicationStore;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    pub company: String,
    pub position: String,
    pub status: Option<ApplicationStatus>,
    pub applied_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

pub async fn list(
    store: &dyn ApplicationStore,
    user_id: Uuid,
) -> Result<Vec<JobApplication>, AppError> {
    store.list_for_user(user_id).await
}

pub async fn create(
    store: &dyn ApplicationStore,
    user_id: Uuid,
    req: CreateApplicationRequest,
) -> Result<JobApplication, AppError> {
    let company = req.company.trim();
    let position = req.position.trim();
    if company.is_empty() || position.is_empty() {
        return Err(AppError::Validation(
            "Company and position are required".to_string(),
        ));
    }

    store
        .insert(NewApplication {
            user_id,
            company: company.to_string(),
            position: position.to_string(),
            status: req.status.unwrap_or_default(),
            applied_date: req.applied_date.unwrap_or_else(Utc::now),
            notes: req.notes.unwrap_or_default(),
        })
        .await
}

pub async fn update(
    store: &dyn ApplicationStore,
    user_id: Uuid,
    id: Uuid,
    mut patch: ApplicationPatch,
) -> Result<JobApplication, AppError> {
    for field in [&mut patch.company, &mut patch.position] {
        if let Some(value) = field {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(AppError::Validation(
                    "Company and position cannot be empty".to_string(),
                ));
            }
            *value = trimmed.to_string();
        }
    }

    store
        .update_owned(user_id, id, patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found for this user".to_string()))
}

pub async fn delete(store: &dyn ApplicationStore, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
    if store.delete_owned(user_id, id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound(
            "Application not found for this user".to_string(),
        ))
    }
}
