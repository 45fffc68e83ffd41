pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::jobs::handlers as jobs;
use crate::resume::handlers as resumes;
use crate::state::AppState;

/// `?user_id=` scoping for read endpoints. Authentication happens upstream.
#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route(
            "/api/v1/resumes",
            get(resumes::handle_list_resumes).post(resumes::handle_create_resume),
        )
        .route("/api/v1/resumes/upload", post(resumes::handle_upload_resume))
        .route(
            "/api/v1/resumes/sections",
            post(resumes::handle_preview_sections),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get_resume)
                .put(resumes::handle_update_resume)
                .delete(resumes::handle_delete_resume),
        )
        // Jobs API
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_save_job),
        )
        .route("/api/v1/jobs/metrics", get(jobs::handle_job_metrics))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt; // for oneshot

    use super::*;
    use crate::jobs::store::memory::MemoryJobStore;
    use crate::resume::record::testing::{FixedClock, SequentialIds};
    use crate::resume::store::memory::MemoryResumeStore;

    const USER: Uuid = Uuid::from_u128(0xA11CE);
    const OTHER_USER: Uuid = Uuid::from_u128(0xB0B);

    fn test_app() -> Router {
        build_router(AppState {
            resumes: Arc::new(MemoryResumeStore::default()),
            jobs: Arc::new(MemoryJobStore::default()),
            ids: Arc::new(SequentialIds::default()),
            clock: Arc::new(FixedClock::at_test_epoch()),
        })
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn create_resume(app: &Router, name: &str, content: &str) -> Value {
        let (status, body) = send(
            app,
            json_request(
                "POST",
                "/api/v1/resumes",
                json!({ "user_id": USER, "name": name, "content": content }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    #[tokio::test]
    async fn test_health_check() {
        let (status, body) = send(&test_app(), empty_request("GET", "/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "scout-api");
    }

    #[tokio::test]
    async fn test_create_resume_extracts_sections_and_infers_format() {
        let app = test_app();
        let body = create_resume(
            &app,
            "resume.MD",
            "# Summary\nBuilt things.\n# Experience\nDid things.",
        )
        .await;

        assert_eq!(body["id"], Uuid::from_u128(1).to_string());
        assert_eq!(body["format"], "markdown");
        assert_eq!(body["created_at"], "2026-10-19T09:30:00.000Z");
        assert_eq!(
            body["sections"],
            json!({ "summary": "Built things.", "experience": "Did things." })
        );
    }

    #[tokio::test]
    async fn test_create_resume_explicit_format_wins() {
        let app = test_app();
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/resumes",
                json!({
                    "user_id": USER,
                    "name": "resume",
                    "content": "Skills: Go",
                    "format": "markdown"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["format"], "markdown");
    }

    #[tokio::test]
    async fn test_create_resume_rejects_oversized_content() {
        let app = test_app();
        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/resumes",
                json!({ "user_id": USER, "name": "big.txt", "content": "a".repeat(51_201) }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");

        let (_, list) = send(&app, empty_request("GET", &format!("/api/v1/resumes?user_id={USER}"))).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_create_resume_accepts_content_at_limit() {
        let app = test_app();
        let body = create_resume(&app, "big.txt", &"a".repeat(51_200)).await;
        assert_eq!(body["sections"], json!({}));
    }

    #[tokio::test]
    async fn test_create_resume_rejects_blank_content() {
        let (status, body) = send(
            &test_app(),
            json_request(
                "POST",
                "/api/v1/resumes",
                json!({ "user_id": USER, "name": "cv.txt", "content": "   " }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_get_resume_is_scoped_to_owner() {
        let app = test_app();
        let created = create_resume(&app, "cv.txt", "Skills: Go, Rust\nEducation: BS CS").await;
        let id = created["id"].as_str().unwrap();

        let (status, body) = send(
            &app,
            empty_request("GET", &format!("/api/v1/resumes/{id}?user_id={USER}")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], "Skills: Go, Rust\nEducation: BS CS");

        let (status, body) = send(
            &app,
            empty_request("GET", &format!("/api/v1/resumes/{id}?user_id={OTHER_USER}")),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_list_resumes_returns_summaries() {
        let app = test_app();
        create_resume(&app, "cv.md", "# Objective\nGrow.\n").await;

        let (status, body) = send(
            &app,
            empty_request("GET", &format!("/api/v1/resumes?user_id={USER}")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["name"], "cv.md");
        assert_eq!(list[0]["size"], "18 B");
        assert_eq!(list[0]["sections_found"], json!(["summary"]));
        assert!(list[0].get("content").is_none());
    }

    #[tokio::test]
    async fn test_update_resume_rederives_sections() {
        let app = test_app();
        let created = create_resume(&app, "cv.txt", "Skills: Go").await;
        let id = created["id"].as_str().unwrap();

        let (status, body) = send(
            &app,
            json_request(
                "PUT",
                &format!("/api/v1/resumes/{id}"),
                json!({ "user_id": USER, "content": "Education: BS CS", "name": "cv-v2.txt" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "cv-v2.txt");
        assert_eq!(body["sections"], json!({ "education": "BS CS" }));
        // Identity and creation time survive edits.
        assert_eq!(body["id"], created["id"]);
        assert_eq!(body["created_at"], created["created_at"]);

        let (_, fetched) = send(
            &app,
            empty_request("GET", &format!("/api/v1/resumes/{id}?user_id={USER}")),
        )
        .await;
        assert_eq!(fetched["content"], "Education: BS CS");
    }

    #[tokio::test]
    async fn test_update_unknown_resume_is_not_found() {
        let (status, _) = send(
            &test_app(),
            json_request(
                "PUT",
                &format!("/api/v1/resumes/{}", Uuid::from_u128(99)),
                json!({ "user_id": USER, "content": "Skills: Go" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_resume() {
        let app = test_app();
        let created = create_resume(&app, "cv.txt", "Skills: Go").await;
        let uri = format!("/api/v1/resumes/{}?user_id={USER}", created["id"].as_str().unwrap());

        let (status, _) = send(&app, empty_request("DELETE", &uri)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, empty_request("DELETE", &uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_preview_sections() {
        let (status, body) = send(
            &test_app(),
            json_request(
                "POST",
                "/api/v1/resumes/sections",
                json!({ "content": "# Summary\n# Skills\nRust" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "summary": "", "skills": "Rust" }));
    }

    #[tokio::test]
    async fn test_multipart_upload_uses_filename() {
        let app = test_app();
        let boundary = "scout-test-boundary";
        let payload = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"jane.markdown\"\r\n\
             Content-Type: text/markdown\r\n\r\n\
             ## Technical Skills\nRust, SQL\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri(format!("/api/v1/resumes/upload?user_id={USER}"))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(payload))
            .unwrap();

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert_eq!(body["name"], "jane.markdown");
        assert_eq!(body["format"], "markdown");
        assert_eq!(body["sections"], json!({ "skills": "Rust, SQL" }));
    }

    #[tokio::test]
    async fn test_multipart_upload_without_file_is_rejected() {
        let boundary = "scout-test-boundary";
        let payload = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"name\"\r\n\r\n\
             My CV\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri(format!("/api/v1/resumes/upload?user_id={USER}"))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(payload))
            .unwrap();

        let (status, body) = send(&test_app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "No resume file provided");
    }

    #[tokio::test]
    async fn test_save_and_list_jobs_with_metrics() {
        let app = test_app();
        for (title, company, status, score) in [
            ("Backend Engineer", "Acme", "applied", json!(90.0)),
            ("Platform Engineer", "acme", "saved", json!(70.0)),
            ("SRE", "Globex", "interviewing", Value::Null),
        ] {
            let (code, body) = send(
                &app,
                json_request(
                    "POST",
                    "/api/v1/jobs",
                    json!({
                        "user_id": USER,
                        "title": title,
                        "company": company,
                        "status": status,
                        "match_score": score
                    }),
                ),
            )
            .await;
            assert_eq!(code, StatusCode::CREATED, "{body}");
            assert_eq!(body["source"], "manual");
        }

        let (status, body) = send(
            &app,
            empty_request("GET", &format!("/api/v1/jobs?user_id={USER}")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["jobs"].as_array().unwrap().len(), 3);

        let metrics = &body["metrics"];
        assert_eq!(metrics["total"], 3);
        assert_eq!(metrics["active"], 2);
        assert_eq!(metrics["scored"], 2);
        assert_eq!(metrics["average_score"], 80.0);
        assert_eq!(metrics["high_match"], 1);
        assert_eq!(metrics["unique_companies"], 2);
        assert_eq!(metrics["by_status"]["saved"], 1);

        let (_, other) = send(
            &app,
            empty_request("GET", &format!("/api/v1/jobs/metrics?user_id={OTHER_USER}")),
        )
        .await;
        assert_eq!(other["total"], 0);
        assert_eq!(other["average_score"], Value::Null);
    }

    #[tokio::test]
    async fn test_save_job_rejects_out_of_range_score() {
        let (status, body) = send(
            &test_app(),
            json_request(
                "POST",
                "/api/v1/jobs",
                json!({ "user_id": USER, "title": "SRE", "company": "Acme", "match_score": 140 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_save_job_requires_company() {
        let (status, _) = send(
            &test_app(),
            json_request(
                "POST",
                "/api/v1/jobs",
                json!({ "user_id": USER, "title": "SRE", "company": "  " }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
