pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/job", get(handlers::handle_get_job))
        // Interview API
        .route(
            "/api/v1/interviews",
            post(handlers::handle_create_interview),
        )
        .route(
            "/api/v1/interviews/:id",
            get(handlers::handle_get_progress).delete(handlers::handle_delete_interview),
        )
        .route(
            "/api/v1/interviews/:id/messages",
            post(handlers::handle_send_message),
        )
        .route(
            "/api/v1/interviews/:id/decision",
            post(handlers::handle_force_decision),
        )
        .route(
            "/api/v1/interviews/:id/report",
            get(handlers::handle_get_report),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::config::Config;
    use crate::interview::evaluator::AnswerEvaluator;
    use crate::interview::orchestrator::Interviewer;
    use crate::interview::qualifications::MANDATORY;
    use crate::interview::store::SessionStore;
    use crate::interview::testing::{ScriptedCompletion, StubScorer};

    fn test_state(llm: ScriptedCompletion) -> AppState {
        let evaluator = AnswerEvaluator::new(
            Arc::new(StubScorer::depth(0.9)),
            Duration::from_millis(200),
        );
        AppState {
            interviewer: Arc::new(Interviewer::new(Arc::new(llm), Arc::new(evaluator))),
            sessions: SessionStore::new(),
            config: Config {
                llm_api_key: "test-key".to_string(),
                llm_api_url: "http://localhost:0".to_string(),
                llm_model: "test-model".to_string(),
                llm_timeout_secs: 1,
                port: 0,
                rust_log: "debug".to_string(),
            },
        }
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn create(app: &Router) -> String {
        let (status, body) = call(app, Method::POST, "/api/v1/interviews", None).await;
        assert_eq!(status, StatusCode::CREATED);
        body["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_reports_model() {
        let app = build_router(test_state(ScriptedCompletion::replying("ok")));
        let (status, body) = call(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model"], "test-model");
    }

    #[tokio::test]
    async fn test_job_facts_are_public() {
        let app = build_router(test_state(ScriptedCompletion::replying("ok")));
        let (status, body) = call(&app, Method::GET, "/api/v1/job", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["company"], "Tsavo West Inc");
        assert!(body.get("description").is_none());
    }

    #[tokio::test]
    async fn test_create_interview_returns_first_question() {
        let app = build_router(test_state(ScriptedCompletion::replying("ok")));
        let (status, body) = call(&app, Method::POST, "/api/v1/interviews", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["phase"], "mandatory");
        assert_eq!(body["quick_options"], json!(["Yes", "No"]));
        assert!(body["reply"].as_str().unwrap().ends_with(MANDATORY[0].question));
        assert_eq!(body["progress"]["total"], 9);
    }

    #[tokio::test]
    async fn test_quick_option_resolves_to_its_text() {
        let app = build_router(test_state(ScriptedCompletion::replying("Great.")));
        let id = create(&app).await;

        let uri = format!("/api/v1/interviews/{id}/messages");
        let (status, body) = call(&app, Method::POST, &uri, Some(json!({ "quick_option": 0 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["classification"], "on_topic");
        assert_eq!(body["progress"]["mandatory_done"], 1);
        assert!(body["reply"].as_str().unwrap().contains(MANDATORY[1].question));

        let (status, _) = call(&app, Method::POST, &uri, Some(json!({ "quick_option": 7 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_message_body_requires_text_or_option() {
        let app = build_router(test_state(ScriptedCompletion::replying("ok")));
        let id = create(&app).await;
        let uri = format!("/api/v1/interviews/{id}/messages");
        let (status, body) = call(&app, Method::POST, &uri, Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let app = build_router(test_state(ScriptedCompletion::replying("ok")));
        let uri = format!("/api/v1/interviews/{}", Uuid::new_v4());
        let (status, body) = call(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_rejected_credentials_return_503_and_keep_state() {
        let app = build_router(test_state(ScriptedCompletion::unauthorized()));
        let id = create(&app).await;

        let uri = format!("/api/v1/interviews/{id}/messages");
        let (status, body) = call(&app, Method::POST, &uri, Some(json!({ "message": "Yes" }))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "LLM_UNAVAILABLE");
        assert!(!body.to_string().contains("401"));

        let (_, progress) = call(&app, Method::GET, &format!("/api/v1/interviews/{id}"), None).await;
        assert_eq!(progress["mandatory_done"], 0);
        assert_eq!(progress["phase"], "mandatory");
    }

    #[tokio::test]
    async fn test_decision_report_and_delete() {
        let app = build_router(test_state(ScriptedCompletion::failing()));
        let id = create(&app).await;
        let base = format!("/api/v1/interviews/{id}");

        call(&app, Method::POST, &format!("{base}/messages"), Some(json!({ "message": "Yes" }))).await;

        let (status, body) = call(&app, Method::POST, &format!("{base}/decision"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phase"], "job_qa");
        assert!(body["reply"].as_str().unwrap().contains("Not Qualified"));

        let (status, report) = call(&app, Method::GET, &format!("{base}/report"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(report["summary"].as_str().unwrap().contains("> \"Yes\""));
        assert_eq!(report["breakdown"]["decision"], "Not Qualified");
        assert_eq!(report["breakdown"]["mandatory_score"], 10.0);

        let (status, _) = call(&app, Method::DELETE, &base, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&app, Method::GET, &base, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
