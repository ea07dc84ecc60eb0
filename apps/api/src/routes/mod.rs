pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post, put},
    Router,
};

use crate::interview::handlers as interview;
use crate::roster::handlers as roster;
use crate::services::handlers as services;
use crate::state::AppState;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // AI service endpoints
        .route("/api/extractText", post(services::handle_extract_text))
        .route("/api/parseResume", post(services::handle_parse_resume))
        .route(
            "/api/generateQuestions",
            post(services::handle_generate_questions),
        )
        .route(
            "/api/evaluateInterview",
            post(services::handle_evaluate_interview),
        )
        // Interview station
        .route("/api/v1/interview", get(interview::handle_get_view))
        .route(
            "/api/v1/interview/resume",
            post(interview::handle_upload_resume),
        )
        .route(
            "/api/v1/interview/details",
            post(interview::handle_supply_field),
        )
        .route("/api/v1/interview/draft", put(interview::handle_update_draft))
        .route(
            "/api/v1/interview/answer",
            post(interview::handle_submit_answer),
        )
        .route(
            "/api/v1/interview/display",
            get(interview::handle_get_display).post(interview::handle_display_changed),
        )
        .route("/api/v1/interview/retry", post(interview::handle_retry))
        .route("/api/v1/interview/reset", post(interview::handle_reset))
        .route("/api/v1/interview/restore", post(interview::handle_restore))
        // Roster
        .route(
            "/api/v1/candidates",
            get(roster::handle_list_candidates).delete(roster::handle_clear_candidates),
        )
        .route(
            "/api/v1/candidates/:id/status",
            patch(roster::handle_set_triage_status),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::interview::integrity::DirectiveDisplay;
    use crate::interview::orchestrator::{Orchestrator, StationDeps};
    use crate::storage::{MemoryRosterRepository, MemorySessionStore};
    use crate::testing::{RecordingDisplay, StubServices};

    async fn test_app() -> Router {
        let services = Arc::new(StubServices::complete());
        let deps = StationDeps {
            services: services.clone(),
            sessions: Arc::new(MemorySessionStore::default()),
            roster: Arc::new(MemoryRosterRepository::default()),
            display: Arc::new(RecordingDisplay::default()),
        };
        let (orchestrator, station) = Orchestrator::restore(deps).await.unwrap();
        tokio::spawn(orchestrator.run());
        let (_host, directives) = DirectiveDisplay::new();
        build_router(AppState {
            station,
            ai: services,
            display: directives,
        })
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(test_app().await, get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "interview-api");
    }

    #[tokio::test]
    async fn test_fresh_station_view() {
        let (status, body) = send(test_app().await, get_request("/api/v1/interview")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session"]["status"], "not_started");
        assert_eq!(body["awaiting_restore"], false);
        assert_eq!(body["pending"], Value::Null);
    }

    #[tokio::test]
    async fn test_details_before_upload_is_conflict() {
        let request = json_request("POST", "/api/v1/interview/details", json!({ "value": "Ada" }));
        let (status, body) = send(test_app().await, request).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "INVALID_TRANSITION");
    }

    #[tokio::test]
    async fn test_multipart_upload_starts_identity_call() {
        let boundary = "interviewboundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"resume\"; filename=\"resume.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n\
             Ada Lovelace\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/interview/resume")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();
        let (status, body) = send(test_app().await, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pending"], "identity");
    }

    #[tokio::test]
    async fn test_display_directive_defaults_to_idle() {
        let (status, body) = send(test_app().await, get_request("/api/v1/interview/display")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "directive": "idle" }));
    }

    #[tokio::test]
    async fn test_parse_resume_requires_text() {
        let request = json_request("POST", "/api/parseResume", json!({}));
        let (status, body) = send(test_app().await, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INPUT_ERROR");
    }

    #[tokio::test]
    async fn test_generate_questions_returns_wire_shape() {
        let request = json_request("POST", "/api/generateQuestions", json!({}));
        let (status, body) = send(test_app().await, request).await;
        assert_eq!(status, StatusCode::OK);
        let questions = body["questions"].as_array().unwrap();
        assert_eq!(questions.len(), 6);
        assert_eq!(questions[0]["question"], "What is JSX?");
        assert_eq!(questions[0]["difficulty"], "Easy");
        assert_eq!(questions[0]["time"], 20);
    }

    #[tokio::test]
    async fn test_evaluate_rejects_mismatched_lengths() {
        let request = json_request(
            "POST",
            "/api/evaluateInterview",
            json!({
                "questions": [{ "question": "What is JSX?", "difficulty": "Easy", "time": 20 }],
                "answers": [],
            }),
        );
        let (status, body) = send(test_app().await, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INPUT_ERROR");
    }

    #[tokio::test]
    async fn test_evaluate_returns_score() {
        let request = json_request(
            "POST",
            "/api/evaluateInterview",
            json!({
                "questions": [{ "question": "What is JSX?", "difficulty": "Easy", "time": 20 }],
                "answers": [""],
            }),
        );
        let (status, body) = send(test_app().await, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"], 82);
    }

    #[tokio::test]
    async fn test_unknown_candidate_triage_is_noop() {
        let request = json_request(
            "PATCH",
            "/api/v1/candidates/nope/status",
            json!({ "status": "selected" }),
        );
        let (status, body) = send(test_app().await, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }
}
