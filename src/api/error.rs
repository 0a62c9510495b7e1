//! Error types for the API access layer.

use thiserror::Error;

/// Failure of one executed API request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure: DNS, connect, timeout, interrupted body.
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response. The message carries the response body text when the
    /// server sent one, otherwise `HTTP <status>`.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// 2xx response whose body could not be decoded as the expected JSON.
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build the error for a non-2xx response from its body text.
    pub(crate) async fn from_response(resp: reqwest::Response) -> Self {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            format!("HTTP {}", status)
        } else {
            body
        };
        ApiError::Status { status, message }
    }

    /// Whether this is a 401/403 the UI should treat as "must re-authenticate".
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ApiError::Status {
                status: 401 | 403,
                ..
            }
        )
    }
}
