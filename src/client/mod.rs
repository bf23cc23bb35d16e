//! HTTP client for the remote traffic-signal controller.
//!
//! Thin typed wrapper over the controller's REST contract. Every failed
//! request is classified into the [`RequestFailure`] taxonomy; interpreting
//! the success envelopes is left to the synchronization layer.

mod error;

pub use error::RequestFailure;

use crate::model::{HistoryEntry, TrafficSnapshot, VideoSource};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Response envelope shared by `/status` and `/history`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
}

/// Acknowledgement envelope for `/start` and `/stop`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandAck {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// `/health` probe response.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Typed client for the controller's REST endpoints.
pub struct ControllerClient {
    /// Base URL including the API prefix, e.g. `http://localhost:5000/api`.
    base_url: String,
    /// Shared HTTP client for connection pooling.
    client: Client,
    /// Per-request deadline.
    timeout: Duration,
}

impl ControllerClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self::with_client(base_url, timeout, Client::new())
    }

    /// Create a client with a custom `reqwest` client (for testing).
    pub fn with_client(base_url: impl Into<String>, timeout: Duration, client: Client) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client,
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe the controller's liveness endpoint.
    pub async fn health(&self) -> Result<HealthResponse, RequestFailure> {
        self.get_json("/health").await
    }

    /// Fetch the current traffic snapshot envelope.
    pub async fn status(&self) -> Result<Envelope<TrafficSnapshot>, RequestFailure> {
        self.get_json("/status").await
    }

    /// Fetch the historical signal-cycle log envelope.
    pub async fn history(&self) -> Result<Envelope<Vec<HistoryEntry>>, RequestFailure> {
        self.get_json("/history").await
    }

    /// Ask the controller to start its detection pipeline on `source`.
    pub async fn start(&self, source: &VideoSource) -> Result<CommandAck, RequestFailure> {
        let url = format!("{}/start", self.base_url);
        let body = serde_json::json!({ "video_path": source });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| RequestFailure::from_transport(&e))?;

        Self::decode(response).await
    }

    /// Ask the controller to stop its detection pipeline.
    pub async fn stop(&self) -> Result<CommandAck, RequestFailure> {
        let url = format!("{}/stop", self.base_url);

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| RequestFailure::from_transport(&e))?;

        Self::decode(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestFailure> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| RequestFailure::from_transport(&e))?;

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RequestFailure> {
        let status = response.status();
        if !status.is_success() {
            return Err(RequestFailure::BackendError {
                status: status.as_u16(),
                status_text: status
                    .canonical_reason()
                    .unwrap_or("Unknown")
                    .to_string(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| RequestFailure::UnknownFailure(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LaneId;
    use mockito::Server;

    fn test_client(base_url: String) -> ControllerClient {
        ControllerClient::new(base_url, Duration::from_secs(5))
    }

    #[test]
    fn test_trailing_slash_trimmed_from_base_url() {
        let client = test_client("http://localhost:5000/api/".to_string());
        assert_eq!(client.base_url(), "http://localhost:5000/api");
    }

    #[tokio::test]
    async fn test_health_ok() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(r#"{"status":"ok","message":"Backend is running"}"#)
            .create_async()
            .await;

        let client = test_client(server.url());
        let health = client.health().await.unwrap();

        mock.assert_async().await;
        assert!(health.is_ok());
        assert_eq!(health.message, "Backend is running");
    }

    #[tokio::test]
    async fn test_health_unexpected_status_field() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(r#"{"status":"starting"}"#)
            .create_async()
            .await;

        let client = test_client(server.url());
        let health = client.health().await.unwrap();
        assert!(!health.is_ok());
    }

    #[tokio::test]
    async fn test_status_success_envelope() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/status")
            .with_status(200)
            .with_body(
                r#"{"success":true,"data":{
                    "current_lane":"North",
                    "lane_counts":{"North":10,"South":2,"East":0,"West":4},
                    "remaining_time":12,
                    "signal_timings":{"North":30,"South":20,"East":15,"West":25},
                    "timestamp":"2025-11-03T14:05:12.000131"
                }}"#,
            )
            .create_async()
            .await;

        let client = test_client(server.url());
        let envelope = client.status().await.unwrap();

        mock.assert_async().await;
        assert!(envelope.success);
        let snapshot = envelope.data.unwrap();
        assert_eq!(snapshot.current_lane, Some(LaneId::North));
        assert_eq!(snapshot.remaining_time, Some(12));
    }

    #[tokio::test]
    async fn test_status_http_error_classified_as_backend_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/status")
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let client = test_client(server.url());
        let err = client.status().await.unwrap_err();

        assert_eq!(
            err,
            RequestFailure::BackendError {
                status: 503,
                status_text: "Service Unavailable".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_status_malformed_body_is_unknown_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/status")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = test_client(server.url());
        let err = client.status().await.unwrap_err();
        assert!(matches!(err, RequestFailure::UnknownFailure(_)));
    }

    #[tokio::test]
    async fn test_status_unreachable_is_network_failure() {
        let client = ControllerClient::new(
            "http://127.0.0.1:1/api".to_string(),
            Duration::from_secs(1),
        );
        let err = client.status().await.unwrap_err();
        assert!(matches!(
            err,
            RequestFailure::NetworkUnreachable | RequestFailure::NoResponse
        ));
    }

    #[tokio::test]
    async fn test_history_envelope() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/history")
            .with_status(200)
            .with_body(
                r#"{"success":true,"data":[
                    {"timestamp":"2025-11-03T14:05:12","lane":"East","east_count":7,"signal_time":20},
                    {"timestamp":"2025-11-03T14:04:50","lane":"North","north_count":3,"signal_time":30}
                ]}"#,
            )
            .create_async()
            .await;

        let client = test_client(server.url());
        let envelope = client.history().await.unwrap();

        mock.assert_async().await;
        let entries = envelope.data.unwrap();
        assert_eq!(entries.len(), 2);
        // Backend order preserved, newest first
        assert_eq!(entries[0].lane, LaneId::East);
        assert_eq!(entries[1].lane, LaneId::North);
    }

    #[tokio::test]
    async fn test_start_sends_webcam_sentinel() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/start")
            .match_body(mockito::Matcher::Json(serde_json::json!({"video_path": 0})))
            .with_status(200)
            .with_body(r#"{"success":true,"message":"Processing started"}"#)
            .create_async()
            .await;

        let client = test_client(server.url());
        let ack = client.start(&VideoSource::Webcam).await.unwrap();

        mock.assert_async().await;
        assert!(ack.success);
    }

    #[tokio::test]
    async fn test_start_sends_video_path() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/start")
            .match_body(mockito::Matcher::Json(
                serde_json::json!({"video_path": "sample.mp4"}),
            ))
            .with_status(200)
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        let client = test_client(server.url());
        let ack = client
            .start(&VideoSource::File("sample.mp4".to_string()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(ack.success);
    }

    #[tokio::test]
    async fn test_stop_posts_without_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/stop")
            .with_status(200)
            .with_body(r#"{"success":true,"message":"Processing stopped"}"#)
            .create_async()
            .await;

        let client = test_client(server.url());
        let ack = client.stop().await.unwrap();

        mock.assert_async().await;
        assert!(ack.success);
    }
}
