//! Axum route handlers for the Jobs API.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::metrics::{compute_job_metrics, JobMetrics};
use crate::jobs::models::{Job, JobStatus};
use crate::routes::UserIdQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveJobRequest {
    pub user_id: Uuid,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub match_score: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<Job>,
    pub metrics: JobMetrics,
}

fn required(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(value.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// POST /api/v1/jobs
pub async fn handle_save_job(
    State(state): State<AppState>,
    Json(request): Json<SaveJobRequest>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    if let Some(score) = request.match_score {
        if !(0.0..=100.0).contains(&score) {
            return Err(AppError::Validation(format!(
                "match_score must be between 0 and 100, got {score}"
            )));
        }
    }

    let job = Job {
        id: state.ids.next_id(),
        title: required("title", &request.title)?,
        company: required("company", &request.company)?,
        location: optional(request.location),
        url: optional(request.url),
        source: optional(request.source).unwrap_or_else(|| "manual".to_string()),
        status: request.status,
        match_score: request.match_score,
        created_at: state.clock.now(),
    };

    state.jobs.insert(request.user_id, &job).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs?user_id=
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<JobListResponse>, AppError> {
    let jobs = state.jobs.list(params.user_id).await?;
    let metrics = compute_job_metrics(&jobs);
    Ok(Json(JobListResponse { jobs, metrics }))
}

/// GET /api/v1/jobs/metrics?user_id=
pub async fn handle_job_metrics(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<JobMetrics>, AppError> {
    let jobs = state.jobs.list(params.user_id).await?;
    Ok(Json(compute_job_metrics(&jobs)))
}
