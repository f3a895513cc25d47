use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{ApplicationPatch, JobApplication, NewApplication};
use crate::models::user::{NewUser, User, UserPatch};

use super::{ApplicationStore, UserStore};

/// PostgreSQL-backed store. One instance serves both store traits.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// The services pre-check email uniqueness for friendly messages; the unique
/// index still closes the race between check and insert.
fn unique_email_conflict(message: &str) -> impl FnOnce(sqlx::Error) -> AppError + '_ {
    move |err| match &err {
        sqlx::Error::Database(db) if db.kind() == ErrorKind::UniqueViolation => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::Database(err),
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(unique_email_conflict("User already exists"))?;

        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                "current_role" = COALESCE($4, "current_role"),
                target_role = COALESCE($5, target_role),
                location = COALESCE($6, location),
                experience_level = COALESCE($7, experience_level),
                linkedin = COALESCE($8, linkedin),
                github = COALESCE($9, github),
                portfolio = COALESCE($10, portfolio),
                job_notes = COALESCE($11, job_notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.email)
        .bind(&patch.current_role)
        .bind(&patch.target_role)
        .bind(&patch.location)
        .bind(&patch.experience_level)
        .bind(&patch.linkedin)
        .bind(&patch.github)
        .bind(&patch.portfolio)
        .bind(&patch.job_notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(unique_email_conflict("Email already in use by another account"))?;

        row.ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}

#[async_trait]
impl ApplicationStore for PgStore {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<JobApplication>, AppError> {
        let rows = sqlx::query_as::<_, JobApplication>(
            "SELECT * FROM applications WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn insert(&self, application: NewApplication) -> Result<JobApplication, AppError> {
        let row = sqlx::query_as::<_, JobApplication>(
            r#"
            INSERT INTO applications (user_id, company, position, status, applied_date, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(application.user_id)
        .bind(&application.company)
        .bind(&application.position)
        .bind(application.status)
        .bind(application.applied_date)
        .bind(&application.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_owned(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: ApplicationPatch,
    ) -> Result<Option<JobApplication>, AppError> {
        // Ownership is part of the WHERE clause on purpose: a miss never
        // reveals whether the id exists under another user.
        let row = sqlx::query_as::<_, JobApplication>(
            r#"
            UPDATE applications SET
                company = COALESCE($3, company),
                position = COALESCE($4, position),
                status = COALESCE($5, status),
                applied_date = COALESCE($6, applied_date),
                notes = COALESCE($7, notes),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&patch.company)
        .bind(&patch.position)
        .bind(patch.status)
        .bind(patch.applied_date)
        .bind(&patch.notes)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete_owned(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM applications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
