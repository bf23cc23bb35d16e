//! Failure taxonomy for requests against the controller.

use thiserror::Error;

/// Classified outcome of a failed request.
///
/// Call sites match exhaustively on this; every failure mode of a poll or
/// command lands in exactly one variant.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestFailure {
    /// No transport-level connection could be established.
    #[error("cannot connect to backend")]
    NetworkUnreachable,

    /// The backend accepted the connection but returned a non-success status.
    #[error("backend error {status}: {status_text}")]
    BackendError { status: u16, status_text: String },

    /// The request was sent but no response arrived before the connection
    /// was abandoned.
    #[error("no response from backend")]
    NoResponse,

    /// Any other failure mode.
    #[error("request failed: {0}")]
    UnknownFailure(String),
}

impl RequestFailure {
    /// Classify a transport-level `reqwest` error.
    ///
    /// Non-success HTTP statuses never reach this path; the client maps those
    /// to [`RequestFailure::BackendError`] from the response itself.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_connect() {
            RequestFailure::NetworkUnreachable
        } else if err.is_timeout() {
            RequestFailure::NoResponse
        } else {
            RequestFailure::UnknownFailure(err.to_string())
        }
    }

    /// One user-facing message per variant, with a remediation hint where
    /// the failure is actionable.
    pub fn user_message(&self) -> String {
        match self {
            RequestFailure::NetworkUnreachable => {
                "Cannot connect to backend server. Please ensure the backend is running \
                 and the port is not blocked by a firewall."
                    .to_string()
            }
            RequestFailure::BackendError {
                status,
                status_text,
            } => {
                format!("Backend error: {status} - {status_text}")
            }
            RequestFailure::NoResponse => {
                "No response from backend. Please check if the backend server is running."
                    .to_string()
            }
            RequestFailure::UnknownFailure(message) => {
                format!("Failed to fetch traffic status: {message}")
            }
        }
    }
}
