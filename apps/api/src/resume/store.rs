//! Résumé persistence. Metadata and derived sections go to Postgres; the raw
//! content body goes to S3. Every query is scoped to the owning `user_id`.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::resume::models::{ResumeDocument, ResumeFormat, ResumeSummary};
use crate::resume::objects::ObjectStore;
use crate::resume::record::format_timestamp;
use crate::resume::size::format_bytes;

/// Opaque résumé store keyed by user identity.
///
/// Carried in `AppState` as `Arc<dyn ResumeStore>`.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn insert(&self, user_id: Uuid, resume: &ResumeDocument) -> Result<(), AppError>;

    /// Newest first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<ResumeSummary>, AppError>;

    async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Option<ResumeDocument>, AppError>;

    /// Returns false when the user owns no résumé with `resume.id`.
    async fn update(&self, user_id: Uuid, resume: &ResumeDocument) -> Result<bool, AppError>;

    /// Returns false when the user owns no résumé with `id`.
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError>;
}

pub fn summarize(resume: &ResumeDocument) -> ResumeSummary {
    ResumeSummary {
        id: resume.id,
        name: resume.name.clone(),
        format: resume.format,
        size_bytes: resume.content.len() as i64,
        size: format_bytes(resume.content.len()),
        sections_found: resume
            .sections
            .as_ref()
            .map(|s| s.found())
            .unwrap_or_default(),
        created_at: resume.created_at.clone(),
    }
}

fn summary_from_row(row: ResumeRow) -> Result<ResumeSummary, AppError> {
    Ok(ResumeSummary {
        id: row.id,
        format: row.format.parse::<ResumeFormat>()?,
        size: format_bytes(usize::try_from(row.size_bytes).unwrap_or_default()),
        size_bytes: row.size_bytes,
        sections_found: row.sections.map(|s| s.0.found()).unwrap_or_default(),
        created_at: format_timestamp(row.created_at),
        name: row.name,
    })
}

fn document_from_row(row: ResumeRow, content: String) -> Result<ResumeDocument, AppError> {
    Ok(ResumeDocument {
        id: row.id,
        format: row.format.parse::<ResumeFormat>()?,
        sections: row.sections.map(|s| s.0),
        created_at: format_timestamp(row.created_at),
        name: row.name,
        content,
    })
}

fn parse_timestamp(value: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("record timestamp '{value}' is not RFC 3339"))?
        .with_timezone(&Utc))
}

// ────────────────────────────────────────────────────────────────────────────
// Postgres + S3
// ────────────────────────────────────────────────────────────────────────────

pub struct PgResumeStore {
    pool: PgPool,
    objects: Arc<dyn ObjectStore>,
}

impl PgResumeStore {
    pub fn new(pool: PgPool, objects: Arc<dyn ObjectStore>) -> Self {
        Self { pool, objects }
    }

    fn object_key(user_id: Uuid, resume: &ResumeDocument) -> String {
        format!(
            "resumes/{}/{}.{}",
            user_id,
            resume.id,
            resume.format.extension()
        )
    }

    async fn put_content(&self, key: &str, resume: &ResumeDocument) -> Result<(), AppError> {
        self.objects
            .put(key, resume.content.clone(), resume.format.content_type())
            .await
    }

    /// Best-effort removal; failures are logged, not returned.
    async fn remove_content(&self, key: &str) {
        if let Err(e) = self.objects.delete(key).await {
            warn!("Could not remove resume object {key}: {e}");
        }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn insert(&self, user_id: Uuid, resume: &ResumeDocument) -> Result<(), AppError> {
        let created_at = parse_timestamp(&resume.created_at)?;
        let s3_key = Self::object_key(user_id, resume);
        self.put_content(&s3_key, resume).await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO resumes
                (id, user_id, name, format, size_bytes, sections, s3_key, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            "#,
        )
        .bind(resume.id)
        .bind(user_id)
        .bind(&resume.name)
        .bind(resume.format.as_str())
        .bind(resume.content.len() as i64)
        .bind(resume.sections.clone().map(Json))
        .bind(&s3_key)
        .bind(created_at)
        .execute(&self.pool)
        .await;

        if let Err(e) = inserted {
            warn!("Resume row insert failed; removing object {s3_key}");
            self.remove_content(&s3_key).await;
            return Err(e.into());
        }

        info!("Stored resume {} for user {user_id} at {s3_key}", resume.id);
        Ok(())
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<ResumeSummary>, AppError> {
        let rows = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(summary_from_row).collect()
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Option<ResumeDocument>, AppError> {
        let row = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let content = self.objects.get(&row.s3_key).await?;
        document_from_row(row, content).map(Some)
    }

    async fn update(&self, user_id: Uuid, resume: &ResumeDocument) -> Result<bool, AppError> {
        let s3_key: Option<String> =
            sqlx::query_scalar("SELECT s3_key FROM resumes WHERE id = $1 AND user_id = $2")
                .bind(resume.id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        let Some(s3_key) = s3_key else {
            return Ok(false);
        };

        self.put_content(&s3_key, resume).await?;

        sqlx::query(
            r#"
            UPDATE resumes
            SET name = $1, size_bytes = $2, sections = $3, updated_at = now()
            WHERE id = $4 AND user_id = $5
            "#,
        )
        .bind(&resume.name)
        .bind(resume.content.len() as i64)
        .bind(resume.sections.clone().map(Json))
        .bind(resume.id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        info!("Updated resume {} for user {user_id}", resume.id);
        Ok(true)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let s3_key: Option<String> = sqlx::query_scalar(
            "DELETE FROM resumes WHERE id = $1 AND user_id = $2 RETURNING s3_key",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(s3_key) = s3_key else {
            return Ok(false);
        };

        self.remove_content(&s3_key).await;

        info!("Deleted resume {id} for user {user_id}");
        Ok(true)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory store for route tests
// ────────────────────────────────────────────────────────────────────────────
