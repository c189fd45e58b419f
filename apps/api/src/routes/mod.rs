pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::extraction::handlers;
use crate::notify::handlers as notify_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route(
            "/api/v1/resumes",
            post(handlers::handle_submit).get(handlers::handle_list),
        )
        .route("/api/v1/resumes/export", get(handlers::handle_export))
        .route("/api/v1/uploads/:filename", get(handlers::handle_download))
        // Notifications
        .route(
            "/api/v1/notifications",
            post(notify_handlers::handle_notify),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{Config, EmailConfig, MatcherConfig};
    use crate::extraction::matchers::MatcherSet;
    use crate::notify::build_notifier;
    use crate::store::{InMemoryResultStore, ResultStore};
    use crate::uploads::UploadStorage;

    const BOUNDARY: &str = "resunerboundary";
    const JANE: &str = "Jane Doe\njane.doe@example.com\nEDUCATION\nABC University of Engineering\nTECHNICAL SKILLS\nPython, Go\nPROJECTS\n...";

    struct TestApp {
        router: Router,
        store: Arc<InMemoryResultStore>,
        upload_dir: TempDir,
    }

    fn test_app() -> TestApp {
        test_app_with_limit(1024 * 1024)
    }

    fn test_app_with_limit(max_upload_bytes: usize) -> TestApp {
        let upload_dir = tempfile::tempdir().unwrap();
        let config = Config {
            port: 0,
            rust_log: "debug".to_string(),
            upload_dir: upload_dir.path().to_path_buf(),
            max_upload_bytes,
            matchers: MatcherConfig::default(),
            email: EmailConfig::default(),
        };
        let store = Arc::new(InMemoryResultStore::new());
        let state = AppState {
            store: store.clone(),
            uploads: UploadStorage::new(&config.upload_dir),
            matchers: Arc::new(MatcherSet::from_config(&config.matchers).unwrap()),
            notifier: build_notifier(&config.email).unwrap(),
            config,
        };
        TestApp {
            router: build_router(state),
            store,
            upload_dir,
        }
    }

    fn multipart_upload(filename: &str, content: &str, format: Option<&str>) -> Request<Body> {
        let mut body = String::new();
        if let Some(tag) = format {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"format\"\r\n\r\n{tag}\r\n"
            ));
        }
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n{content}\r\n--{BOUNDARY}--\r\n"
        ));

        Request::builder()
            .method("POST")
            .uri("/api/v1/resumes")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, json: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let response = app.router.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_submit_returns_all_results_newest_first() {
        let app = test_app();

        let first = app
            .router
            .clone()
            .oneshot(multipart_upload("first.txt", JANE, None))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .router
            .clone()
            .oneshot(multipart_upload("second.txt", "John Roe\n", Some("plain-text")))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::OK);

        let results = body_json(second).await;
        let results = results.as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["original_filename"], "second.txt");
        assert_eq!(results[0]["groups"]["NAME"][0], "John Roe");
        assert_eq!(results[1]["original_filename"], "first.txt");
        assert_eq!(results[1]["groups"]["EMAIL"][0], "jane.doe@example.com");
        assert_eq!(
            results[1]["groups"]["TECHNICAL SKILLS"],
            serde_json::json!(["Python", "Go"])
        );
    }

    #[tokio::test]
    async fn test_submit_unsupported_format() {
        let app = test_app();
        let response = app
            .router
            .oneshot(multipart_upload("resume.docx", JANE, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"]["code"],
            "UNSUPPORTED_FORMAT"
        );
        assert!(app.store.list_all().is_empty());
    }

    #[tokio::test]
    async fn test_submit_without_file_part() {
        let app = test_app();
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"format\"\r\n\r\npdf\r\n--{BOUNDARY}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/resumes")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app.router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "EMPTY_SUBMISSION");
    }

    #[tokio::test]
    async fn test_submit_over_body_limit() {
        let app = test_app_with_limit(256);
        let oversized = "x".repeat(4096);
        let response = app
            .router
            .oneshot(multipart_upload("big.txt", &oversized, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            body_json(response).await["error"]["code"],
            "PAYLOAD_TOO_LARGE"
        );
        assert!(app.store.list_all().is_empty());
    }

    #[tokio::test]
    async fn test_list_with_skill_filter() {
        let app = test_app();
        app.router
            .clone()
            .oneshot(multipart_upload("jane.txt", JANE, None))
            .await
            .unwrap();
        app.router
            .clone()
            .oneshot(multipart_upload("rust.txt", "Ann Lee\nSKILLS\nRust\n\n", None))
            .await
            .unwrap();

        let all = body_json(app.router.clone().oneshot(get("/api/v1/resumes")).await.unwrap()).await;
        assert_eq!(all.as_array().unwrap().len(), 2);

        let filtered = body_json(
            app.router
                .clone()
                .oneshot(get("/api/v1/resumes?skill=pyth"))
                .await
                .unwrap(),
        )
        .await;
        let filtered = filtered.as_array().unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0]["original_filename"], "jane.txt");
    }

    #[tokio::test]
    async fn test_export_empty_store() {
        let app = test_app();
        let response = app
            .router
            .oneshot(get("/api/v1/resumes/export"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "EXPORT_FAILURE");
    }

    #[tokio::test]
    async fn test_export_csv() {
        let app = test_app();
        app.router
            .clone()
            .oneshot(multipart_upload("jane.txt", JANE, None))
            .await
            .unwrap();

        let response = app
            .router
            .oneshot(get("/api/v1/resumes/export"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"resume_analysis.csv\""
        );
        let csv = String::from_utf8(body_bytes(response).await).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "Filename,Name,Email,College,Technical Skills");
        assert_eq!(
            lines[1],
            "jane.txt,Jane Doe,jane.doe@example.com,ABC University of Engineering,\"Python, Go\""
        );
    }

    #[tokio::test]
    async fn test_download_uploaded_document() {
        let app = test_app();
        let response = app
            .router
            .clone()
            .oneshot(multipart_upload("jane.txt", JANE, None))
            .await
            .unwrap();
        let results = body_json(response).await;
        let stored = results[0]["stored_filename"].as_str().unwrap().to_string();
        assert!(app.upload_dir.path().join(&stored).exists());

        let response = app
            .router
            .clone()
            .oneshot(get(&format!("/api/v1/uploads/{stored}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(body_bytes(response).await, JANE.as_bytes());

        let missing = app
            .router
            .oneshot(get("/api/v1/uploads/nothing_here.pdf"))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_notify_simulated() {
        let app = test_app();
        let response = app
            .router
            .oneshot(post_json(
                "/api/v1/notifications",
                serde_json::json!({"email": "jane@example.com", "status": "accepted", "name": "Jane"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["mode"], "simulation");
        assert_eq!(json["message"], "Simulated email sent to jane@example.com");
    }

    #[tokio::test]
    async fn test_notify_validation() {
        let app = test_app();
        for payload in [
            serde_json::json!({"status": "accepted"}),
            serde_json::json!({"email": "  ", "status": "rejected"}),
            serde_json::json!({"email": "jane@example.com", "status": "maybe"}),
            serde_json::json!({"email": "jane@example.com"}),
        ] {
            let response = app
                .router
                .clone()
                .oneshot(post_json("/api/v1/notifications", payload))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
        }
    }
}
