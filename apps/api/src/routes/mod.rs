pub mod ask;
pub mod chat;
pub mod health;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::config::Config;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz_handler))
        .route("/prewarm", get(health::prewarm_handler))
        .route("/ask", post(ask::ask_handler))
        .route("/chat", post(chat::chat_handler))
        .with_state(state)
}

/// `*` allows any origin; otherwise only the configured origins may call the API.
pub fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::llm_client::{ChatCompleter, ChatMessage, LlmError};
    use crate::models::resume::Resume;
    use crate::rag::index::ResumeIndex;
    use crate::rag::{Calibration, LazyIndex};

    const RESUME: &str = r#"{
        "basics": {"name": "Ada", "email": "ada@example.com", "summary": "Systems engineer."},
        "projects": [{"name": "X", "description": "Built a cache. Reduced latency by 50%"}]
    }"#;

    /// Echoes how many messages it was sent and what the last one said.
    struct EchoCompleter;

    #[async_trait]
    impl ChatCompleter for EchoCompleter {
        async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
            let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
            Ok(format!("{} messages, last: {last}", messages.len()))
        }
    }

    struct FailingCompleter;

    #[async_trait]
    impl ChatCompleter for FailingCompleter {
        async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 401,
                message: "Invalid API Key".to_string(),
            })
        }
    }

    fn app(llm: Arc<dyn ChatCompleter>) -> Router {
        let resume = Resume::from_json_str(RESUME).unwrap();
        let index = ResumeIndex::build(resume, Calibration::default());
        build_router(AppState {
            rag: Arc::new(LazyIndex::ready(index)),
            llm,
        })
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_healthz() {
        let (status, body) = send(app(Arc::new(EchoCompleter)), "GET", "/healthz", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn test_prewarm_builds_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.json");
        std::fs::write(&path, RESUME).unwrap();

        let rag = Arc::new(LazyIndex::new(&path, Calibration::default()));
        let router = build_router(AppState {
            rag: rag.clone(),
            llm: Arc::new(EchoCompleter),
        });

        let (status, body) = send(router, "GET", "/prewarm", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "warmed": true }));
        assert!(rag.is_built());
    }

    #[tokio::test]
    async fn test_prewarm_missing_resume_is_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        let router = build_router(AppState {
            rag: Arc::new(LazyIndex::new(dir.path().join("missing.json"), Calibration::default())),
            llm: Arc::new(EchoCompleter),
        });

        let (status, body) = send(router, "GET", "/prewarm", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "INDEX_ERROR");
    }

    #[tokio::test]
    async fn test_ask_routes_email_question() {
        let (status, body) = send(
            app(Arc::new(EchoCompleter)),
            "POST",
            "/ask",
            Some(json!({ "query": "What is your email?" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], "ada@example.com");
        assert_eq!(body["intent"], "email");
        assert_eq!(body["confidence"], 0.95);
        assert_eq!(body["sources"], json!([]));
    }

    #[tokio::test]
    async fn test_ask_generic_question_returns_sources() {
        let (status, body) = send(
            app(Arc::new(EchoCompleter)),
            "POST",
            "/ask",
            Some(json!({ "query": "Tell me about your cache project", "top_k": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["intent"], "generic");
        assert_eq!(body["sources"].as_array().map(Vec::len), Some(1));
        assert!(body["answer"].as_str().unwrap().contains("cache"));
    }

    #[tokio::test]
    async fn test_ask_rejects_bad_parameters() {
        let (status, body) = send(
            app(Arc::new(EchoCompleter)),
            "POST",
            "/ask",
            Some(json!({ "query": "email", "top_k": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, _) = send(
            app(Arc::new(EchoCompleter)),
            "POST",
            "/ask",
            Some(json!({ "query": "email", "min_conf": 1.5 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_forwards_grounded_conversation() {
        let (status, body) = send(
            app(Arc::new(EchoCompleter)),
            "POST",
            "/chat",
            Some(json!({
                "message": "What did you build?",
                "history": [
                    {"role": "user", "content": "hi"},
                    {"role": "assistant", "content": "hello!"}
                ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        // persona + context + 2 history turns + the message
        assert_eq!(body["reply"], "5 messages, last: What did you build?");
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_message() {
        let (status, _) = send(
            app(Arc::new(EchoCompleter)),
            "POST",
            "/chat",
            Some(json!({ "message": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_rejects_zero_top_k() {
        let (status, body) = send(
            app(Arc::new(EchoCompleter)),
            "POST",
            "/chat",
            Some(json!({ "message": "hello", "top_k": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_first_requests_build_the_index_off_the_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.json");
        std::fs::write(&path, RESUME).unwrap();

        let rag = Arc::new(LazyIndex::new(&path, Calibration::default()));
        let router = build_router(AppState {
            rag: rag.clone(),
            llm: Arc::new(EchoCompleter),
        });

        let ask = || {
            send(
                router.clone(),
                "POST",
                "/ask",
                Some(json!({ "query": "What is your email?" })),
            )
        };
        let (first, second, third) = tokio::join!(ask(), ask(), ask());

        for (status, body) in [first, second, third] {
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["answer"], "ada@example.com");
        }
        assert!(rag.is_built());
    }

    #[tokio::test]
    async fn test_chat_surfaces_upstream_status() {
        let (status, body) = send(
            app(Arc::new(FailingCompleter)),
            "POST",
            "/chat",
            Some(json!({ "message": "hello" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "Invalid API Key");
    }

    #[test]
    fn test_cors_layer_builds_for_listed_origins() {
        let config = Config {
            groq_api_key: "k".to_string(),
            groq_api_url: String::new(),
            groq_chat_model: String::new(),
            resume_path: "resume.json".into(),
            allowed_origins: vec!["https://ada.dev".to_string(), "bad\norigin".to_string()],
            port: 8080,
            rust_log: "info".to_string(),
        };
        let _layer = cors_layer(&config);
    }
}
