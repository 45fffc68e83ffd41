use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::models::Job;
use crate::models::job::JobRow;

/// Saved-job store keyed by user identity.
///
/// Carried in `AppState` as `Arc<dyn JobStore>`.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn insert(&self, user_id: Uuid, job: &Job) -> Result<(), AppError>;

    /// Newest first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<Job>, AppError>;
}

pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn insert(&self, user_id: Uuid, job: &Job) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO jobs
                (id, user_id, title, company, location, url, source, status, match_score, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(job.id)
        .bind(user_id)
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(&job.url)
        .bind(&job.source)
        .bind(job.status.as_str())
        .bind(job.match_score)
        .bind(job.created_at)
        .execute(&self.pool)
        .await?;

        info!("Saved job {} ({} at {}) for user {user_id}", job.id, job.title, job.company);
        Ok(())
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<Job>, AppError> {
        let rows = sqlx::query_as::<_, JobRow>(
            "SELECT * FROM jobs WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| Job::try_from(row).map_err(AppError::Internal))
            .collect()
    }
}
