use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// The fixed event forwarded for every accepted webhook call.
pub fn dispatch_payload() -> Value {
    json!({
        "event_type": "jira-updated",
        "client_payload": { "from": "jira" }
    })
}

/// Forwards the fixed dispatch event to the code-hosting API.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self) -> Result<()>;
}

pub struct GithubDispatcher {
    http: reqwest::Client,
    api_base: String,
    repo: String,
    token: String,
}

impl GithubDispatcher {
    pub fn new(repo: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        Self::with_api_base("https://api.github.com", repo, token)
    }

    pub fn with_api_base(
        api_base: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent("tavle-relay")
            .build()
            .context("failed to build dispatch HTTP client")?;

        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            repo: repo.into(),
            token: token.into(),
        })
    }

    fn dispatch_url(&self) -> String {
        format!("{}/repos/{}/dispatches", self.api_base, self.repo)
    }
}

#[async_trait]
impl Dispatcher for GithubDispatcher {
    async fn dispatch(&self) -> Result<()> {
        let response = self
            .http
            .post(self.dispatch_url())
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .json(&dispatch_payload())
            .send()
            .await
            .context("failed to reach the dispatch API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("repository dispatch failed: status={} body={}", status, body);
        }

        Ok(())
    }
}

pub fn build_router(dispatcher: Arc<dyn Dispatcher>) -> Router {
    Router::new()
        .route("/jira-webhook", post(webhook_handler))
        .with_state(dispatcher)
}

/// Accept any well-formed JSON payload and forward the fixed dispatch event.
/// The payload itself is not inspected.
async fn webhook_handler(
    State(dispatcher): State<Arc<dyn Dispatcher>>,
    Json(_payload): Json<Value>,
) -> StatusCode {
    match dispatcher.dispatch().await {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(e) => {
            tracing::error!("webhook forwarding failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    struct RecordingDispatcher {
        calls: AtomicUsize,
        fail: bool,
    }

    impl RecordingDispatcher {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl Dispatcher for RecordingDispatcher {
        async fn dispatch(&self) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                bail!("upstream rejected the dispatch");
            }
            Ok(())
        }
    }

    fn webhook_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/jira-webhook")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_forwarding_success_responds_no_content() {
        let dispatcher = RecordingDispatcher::new(false);
        let app = build_router(dispatcher.clone());

        let response = app
            .oneshot(webhook_request(r#"{"issue": {"key": "WEB-1"}}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 1);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_forwarding_failure_responds_server_error() {
        let dispatcher = RecordingDispatcher::new(true);
        let app = build_router(dispatcher.clone());

        let response = app.oneshot(webhook_request("{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_malformed_json_never_reaches_the_dispatcher() {
        let dispatcher = RecordingDispatcher::new(false);
        let app = build_router(dispatcher.clone());

        let response = app.oneshot(webhook_request("{not json")).await.unwrap();

        assert!(response.status().is_client_error());
        assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_payload_contents_are_not_validated() {
        let dispatcher = RecordingDispatcher::new(false);
        let app = build_router(dispatcher.clone());

        // any JSON shape is forwarded, even an unrelated one
        let response = app.oneshot(webhook_request(r#"[1, 2, 3]"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn test_dispatch_payload_shape() {
        let payload = dispatch_payload();
        assert_eq!(payload["event_type"], "jira-updated");
        assert_eq!(payload["client_payload"]["from"], "jira");
    }

    #[test]
    fn test_dispatch_url() {
        let dispatcher =
            GithubDispatcher::with_api_base("https://api.github.com/", "acme/board", "t").unwrap();
        assert_eq!(
            dispatcher.dispatch_url(),
            "https://api.github.com/repos/acme/board/dispatches"
        );
    }
}
