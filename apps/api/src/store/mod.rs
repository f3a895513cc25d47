pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{ApplicationPatch, JobApplication, NewApplication};
use crate::models::user::{NewUser, User, UserPatch};

/// Persistence for account records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new account. Fails with a conflict if the email is taken.
    async fn insert(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Applies the patch to an existing account. `None` fields are left
    /// untouched.
    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, AppError>;
}

/// Persistence for job-application records.
///
/// Mutating operations match on both `id` and `user_id` in a single
/// predicate, so a record owned by another user is indistinguishable from a
/// record that does not exist.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// All applications owned by `user_id`, newest-created first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<JobApplication>, AppError>;

    async fn insert(&self, application: NewApplication) -> Result<JobApplication, AppError>;

    /// Patches the record matching both `id` and `user_id`; `None` when no
    /// such record.
    async fn update_owned(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: ApplicationPatch,
    ) -> Result<Option<JobApplication>, AppError>;

    /// Deletes the record matching both `id` and `user_id`; `false` when no
    /// such record.
    async fn delete_owned(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError>;
}
