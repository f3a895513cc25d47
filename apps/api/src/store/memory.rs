use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{ApplicationPatch, JobApplication, NewApplication};
use crate::models::user::{NewUser, User, UserPatch};

use super::{ApplicationStore, UserStore};

/// In-memory store backing the test suite. Mirrors the Postgres semantics:
/// unique emails, combined id+owner predicates, newest-created-first listing.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    applications: RwLock<HashMap<Uuid, JobApplication>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let now = Utc::now();
        let record = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            current_role: None,
            target_role: None,
            location: None,
            experience_level: None,
            linkedin: None,
            github: None,
            portfolio: None,
            job_notes: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, AppError> {
        let mut users = self.users.write().await;

        if let Some(email) = &patch.email {
            if users.values().any(|u| u.id != id && &u.email == email) {
                return Err(AppError::Conflict(
                    "Email already in use by another account".to_string(),
                ));
            }
        }

        let user = users
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(current_role) = patch.current_role {
            user.current_role = Some(current_role);
        }
        if let Some(target_role) = patch.target_role {
            user.target_role = Some(target_role);
        }
        if let Some(location) = patch.location {
            user.location = Some(location);
        }
        if let Some(experience_level) = patch.experience_level {
            user.experience_level = Some(experience_level);
        }
        if let Some(linkedin) = patch.linkedin {
            user.linkedin = Some(linkedin);
        }
        if let Some(github) = patch.github {
            user.github = Some(github);
        }
        if let Some(portfolio) = patch.portfolio {
            user.portfolio = Some(portfolio);
        }
        if let Some(job_notes) = patch.job_notes {
            user.job_notes = Some(job_notes);
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<JobApplication>, AppError> {
        let mut rows: Vec<JobApplication> = self
            .applications
            .read()
            .await
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert(&self, application: NewApplication) -> Result<JobApplication, AppError> {
        let now = Utc::now();
        let record = JobApplication {
            id: Uuid::new_v4(),
            user_id: application.user_id,
            company: application.company,
            position: application.position,
            status: application.status,
            applied_date: application.applied_date,
            notes: application.notes,
            created_at: now,
            updated_at: now,
        };
        self.applications
            .write()
            .await
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_owned(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: ApplicationPatch,
    ) -> Result<Option<JobApplication>, AppError> {
        let mut applications = self.applications.write().await;

        let Some(application) = applications.get_mut(&id).filter(|a| a.user_id == user_id) else {
            return Ok(None);
        };

        if let Some(company) = patch.company {
            application.company = company;
        }
        if let Some(position) = patch.position {
            application.position = position;
        }
        if let Some(status) = patch.status {
            application.status = status;
        }
        if let Some(applied_date) = patch.applied_date {
            application.applied_date = applied_date;
        }
        if let Some(notes) = patch.notes {
            application.notes = notes;
        }
        application.updated_at = Utc::now();

        Ok(Some(application.clone()))
    }

    async fn delete_owned(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut applications = self.applications.write().await;
        match applications.get(&id) {
            Some(a) if a.user_id == user_id => {
                applications.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
