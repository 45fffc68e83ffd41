//! Axum route handlers for the Résumé API.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::resume::models::{ResumeDocument, ResumeFormat, ResumeSummary};
use crate::resume::record::create_record_with_sections;
use crate::resume::sections::{extract_sections, SectionMap};
use crate::resume::size::{
    format_bytes, format_size, infer_format, validate_size, MAX_RESUME_BYTES,
};
use crate::resume::store::summarize;
use crate::routes::UserIdQuery;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateResumeRequest {
    pub user_id: Uuid,
    pub name: String,
    pub content: String,
    /// Inferred from `name` when omitted.
    #[serde(default)]
    pub format: Option<ResumeFormat>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateResumeRequest {
    pub user_id: Uuid,
    pub content: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewSectionsRequest {
    pub content: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

fn check_content(content: &str) -> Result<(), AppError> {
    if content.trim().is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }
    if !validate_size(content) {
        return Err(AppError::PayloadTooLarge(format!(
            "Resume is {}; the limit is {}",
            format_size(content),
            format_bytes(MAX_RESUME_BYTES)
        )));
    }
    Ok(())
}

fn check_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    Ok(name.to_string())
}

async fn store_new_resume(
    state: &AppState,
    user_id: Uuid,
    name: String,
    content: String,
    format: ResumeFormat,
) -> Result<ResumeDocument, AppError> {
    check_content(&content)?;
    let name = check_name(&name)?;

    let resume = create_record_with_sections(
        name,
        content,
        format,
        state.ids.as_ref(),
        state.clock.as_ref(),
    );
    state.resumes.insert(user_id, &resume).await?;

    let summary = summarize(&resume);
    info!(
        "Created resume {} ({}, {}, sections: {:?}) for user {user_id}",
        summary.id, summary.format, summary.size, summary.sections_found
    );
    Ok(resume)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Json(request): Json<CreateResumeRequest>,
) -> Result<(StatusCode, Json<ResumeDocument>), AppError> {
    let format = request
        .format
        .unwrap_or_else(|| infer_format(&request.name));
    let resume = store_new_resume(
        &state,
        request.user_id,
        request.name,
        request.content,
        format,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

/// POST /api/v1/resumes/upload?user_id=
///
/// Multipart body: `file` (UTF-8 text, required) and `name` (optional, defaults
/// to the uploaded filename). The filename extension decides the format.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeDocument>), AppError> {
    let mut file: Option<(String, String)> = None;
    let mut display_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let field_name = field.name().map(str::to_owned);
        match field_name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("resume.txt").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid file: {e}")))?;
                let content = String::from_utf8(bytes.to_vec()).map_err(|_| {
                    AppError::Validation("Resume file must be UTF-8 text".to_string())
                })?;
                file = Some((filename, content));
            }
            Some("name") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid name field: {e}")))?;
                display_name = Some(text);
            }
            _ => {}
        }
    }

    let (filename, content) =
        file.ok_or_else(|| AppError::Validation("No resume file provided".to_string()))?;
    let format = infer_format(&filename);
    let name = display_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(filename);

    let resume = store_new_resume(&state, params.user_id, name, content, format).await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

/// GET /api/v1/resumes?user_id=
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ResumeSummary>>, AppError> {
    Ok(Json(state.resumes.list(params.user_id).await?))
}

/// GET /api/v1/resumes/:id?user_id=
///
/// Returns the stored content for editing.
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResumeDocument>, AppError> {
    state
        .resumes
        .get(params.user_id, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

/// PUT /api/v1/resumes/:id
///
/// Replaces the content and re-derives sections from it.
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateResumeRequest>,
) -> Result<Json<ResumeDocument>, AppError> {
    check_content(&request.content)?;
    let name = request.name.as_deref().map(check_name).transpose()?;

    let mut resume = state
        .resumes
        .get(request.user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;

    resume.replace_content(request.content);
    if let Some(name) = name {
        resume.name = name;
    }

    if !state.resumes.update(request.user_id, &resume).await? {
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    }
    Ok(Json(resume))
}

/// DELETE /api/v1/resumes/:id?user_id=
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    if state.resumes.delete(params.user_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Resume {id} not found")))
    }
}

/// POST /api/v1/resumes/sections
///
/// Stateless preview of what the extractor finds in `content`.
pub async fn handle_preview_sections(
    Json(request): Json<PreviewSectionsRequest>,
) -> Result<Json<SectionMap>, AppError> {
    check_content(&request.content)?;
    Ok(Json(extract_sections(&request.content)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_content_rejects_blank() {
        let err = check_content("  \n\t").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_check_content_reports_size_when_too_large() {
        let err = check_content(&"a".repeat(MAX_RESUME_BYTES + 1)).unwrap_err();
        match err {
            AppError::PayloadTooLarge(msg) => {
                assert_eq!(msg, "Resume is 50.0 KB; the limit is 50.0 KB")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_check_name_trims() {
        assert_eq!(check_name("  cv.md ").unwrap(), "cv.md");
        assert!(check_name("   ").is_err());
    }
}
