//! HttpReplyBackend -- concrete [`ReplyBackend`] over HTTP.
//!
//! Sends one `POST {base_url}{analyze_path}` per call with the message and
//! its conversation history, bounded by the configured request timeout.
//! No retries: every failure maps straight onto a [`BackendError`].

use std::time::Duration;

use parley_core::backend::ReplyBackend;
use parley_core::text::{preview, EXCERPT_CHARS};
use parley_types::backend::{BackendReply, BackendRequest};
use parley_types::chat::ContextEntry;
use parley_types::config::BackendConfig;
use parley_types::error::BackendError;
use tracing::debug;

/// Reply backend reached over HTTP with a JSON body.
pub struct HttpReplyBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpReplyBackend {
    /// Create a backend client posting to `base_url` + `path`.
    ///
    /// `timeout` bounds the whole exchange, connect through body read.
    pub fn new(base_url: &str, path: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: join_endpoint(base_url, path),
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        Self::new(&config.base_url, &config.analyze_path, config.timeout())
    }

    /// The full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ReplyBackend for HttpReplyBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn generate(
        &self,
        message: &str,
        history: &[ContextEntry],
    ) -> Result<BackendReply, BackendError> {
        let body = BackendRequest {
            message: message.to_string(),
            conversation_history: history.to_vec(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        debug!(status = status.as_u16(), endpoint = %self.endpoint, "Reply backend responded");

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                excerpt: preview(&error_body, EXCERPT_CHARS),
            });
        }

        let bytes = response.bytes().await.map_err(classify)?;
        let reply = serde_json::from_slice::<BackendReply>(&bytes)
            .map_err(|e| BackendError::Malformed(format!("failed to parse response: {e}")))?;
        check_confidence(reply)
    }
}

fn classify(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::Transport(e.to_string())
    }
}

/// Reject replies whose confidence is outside `[0, 1]` (NaN included).
fn check_confidence(reply: BackendReply) -> Result<BackendReply, BackendError> {
    if (0.0..=1.0).contains(&reply.confidence) {
        Ok(reply)
    } else {
        Err(BackendError::Malformed(format!(
            "confidence {} outside [0, 1]",
            reply.confidence
        )))
    }
}

fn join_endpoint(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.is_empty() {
        base.to_string()
    } else if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    fn backend_for(server: &mockito::ServerGuard, timeout: Duration) -> HttpReplyBackend {
        HttpReplyBackend::new(&server.url(), "/analyze", timeout).unwrap()
    }

    #[test]
    fn test_join_endpoint() {
        assert_eq!(join_endpoint("http://ai:8000", "/analyze"), "http://ai:8000/analyze");
        assert_eq!(join_endpoint("http://ai:8000/", "/analyze"), "http://ai:8000/analyze");
        assert_eq!(join_endpoint("http://ai:8000", "analyze"), "http://ai:8000/analyze");
        assert_eq!(join_endpoint("http://ai:8000/v1", ""), "http://ai:8000/v1");
    }

    #[test]
    fn test_from_config() {
        let config = BackendConfig {
            base_url: "http://localhost:9000/".to_string(),
            analyze_path: "/analyze".to_string(),
            timeout_secs: 5,
        };
        let backend = HttpReplyBackend::from_config(&config).unwrap();
        assert_eq!(backend.endpoint(), "http://localhost:9000/analyze");
    }

    #[tokio::test]
    async fn test_success_sends_message_and_history() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/analyze")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "message": "hello",
                "conversation_history": [
                    {"role": "user", "content": "earlier"},
                    {"role": "assistant", "content": "reply"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"reply":"Hi there!","intent":"greeting","confidence":0.95}"#)
            .create_async()
            .await;

        let backend = backend_for(&server, Duration::from_secs(5));
        let history = [ContextEntry::user("earlier"), ContextEntry::assistant("reply")];
        let reply = backend.generate("hello", &history).await.unwrap();

        assert_eq!(reply.reply, "Hi there!");
        assert_eq!(reply.intent, "greeting");
        assert!((reply.confidence - 0.95).abs() < f64::EPSILON);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_carries_status_and_excerpt() {
        let mut server = mockito::Server::new_async().await;
        let long_body = "x".repeat(200);
        server
            .mock("POST", "/analyze")
            .with_status(500)
            .with_body(&long_body)
            .create_async()
            .await;

        let backend = backend_for(&server, Duration::from_secs(5));
        let err = backend.generate("hello", &[]).await.unwrap_err();

        match err {
            BackendError::Status { status, excerpt } => {
                assert_eq!(status, 500);
                assert_eq!(excerpt.chars().count(), 60);
                assert!(excerpt.ends_with("..."));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_with_empty_body() {
        let mut server = mockito::Server::new_async().await;
        server.mock("POST", "/analyze").with_status(404).create_async().await;

        let backend = backend_for(&server, Duration::from_secs(5));
        let err = backend.generate("hello", &[]).await.unwrap_err();

        assert!(
            matches!(err, BackendError::Status { status: 404, ref excerpt } if excerpt.is_empty())
        );
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/analyze")
            .with_status(200)
            .with_body(r#"{"reply": 42}"#)
            .create_async()
            .await;

        let backend = backend_for(&server, Duration::from_secs(5));
        let err = backend.generate("hello", &[]).await.unwrap_err();

        assert!(matches!(err, BackendError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_out_of_range_confidence_is_malformed() {
        for body in [
            r#"{"reply":"x","intent":"greeting","confidence":7.5}"#,
            r#"{"reply":"x","intent":"greeting","confidence":-0.1}"#,
        ] {
            let mut server = mockito::Server::new_async().await;
            server
                .mock("POST", "/analyze")
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(body)
                .create_async()
                .await;

            let backend = backend_for(&server, Duration::from_secs(5));
            let err = backend.generate("hello", &[]).await.unwrap_err();

            assert!(matches!(err, BackendError::Malformed(_)), "body {body} gave {err:?}");
        }
    }

    #[tokio::test]
    async fn test_confidence_bounds_are_inclusive() {
        for confidence in ["0.0", "1.0"] {
            let mut server = mockito::Server::new_async().await;
            server
                .mock("POST", "/analyze")
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(format!(
                    r#"{{"reply":"x","intent":"greeting","confidence":{confidence}}}"#
                ))
                .create_async()
                .await;

            let backend = backend_for(&server, Duration::from_secs(5));
            assert!(backend.generate("hello", &[]).await.is_ok());
        }
    }

    #[test]
    fn test_nan_confidence_is_rejected() {
        let reply = BackendReply {
            reply: "x".to_string(),
            intent: "greeting".to_string(),
            confidence: f64::NAN,
        };
        assert!(matches!(check_confidence(reply), Err(BackendError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_unresponsive_server_times_out() {
        // Accept connections but never answer.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hold = tokio::spawn(async move {
            let mut sockets = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                sockets.push(socket);
            }
        });

        let backend = HttpReplyBackend::new(
            &format!("http://{addr}"),
            "/analyze",
            Duration::from_millis(200),
        )
        .unwrap();
        let err = backend.generate("hello", &[]).await.unwrap_err();

        assert!(matches!(err, BackendError::Timeout));
        hold.abort();
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend =
            HttpReplyBackend::new(&format!("http://{addr}"), "/analyze", Duration::from_secs(2))
                .unwrap();
        let err = backend.generate("hello", &[]).await.unwrap_err();

        assert!(matches!(err, BackendError::Transport(_)));
    }
}
