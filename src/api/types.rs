//! Error definitions for the pricing backend API.

use thiserror::Error;

/// Errors that can occur while talking to the pricing backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, timeout or other transport failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response. `message` is the server-provided text when present.
    #[error("backend returned {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status { status: u16, message: Option<String> },

    /// The bearer credential was rejected. Reported to the credential provider.
    #[error("unauthorized")]
    Unauthorized,

    /// The response body was not the expected JSON shape.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The base URL cannot carry the requested path.
    #[error("invalid URL: {0}")]
    Url(String),
}

impl ApiError {
    /// Message suitable for a user-facing notification.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Transport failures and 5xx responses may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            ApiError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Result type for pricing API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"message": ..}`, `{"error": ..}` or plain text.
pub fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => ["message", "error", "msg"]
            .iter()
            .find_map(|key| json.get(key).and_then(|v| v.as_str()))
            .map(str::to_string),
        Err(_) => Some(body.to_string()),
    }
}
