use reqwest::StatusCode;
use serde::Deserialize;

/// Failure taxonomy for one request/response cycle. Every variant is
/// screen-local and recoverable; the user retries by re-triggering the
/// action.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// Transport-level failure, no response was received.
    #[error("connection error: {0}")]
    Transport(#[from] reqwest::Error),
    /// Token missing locally, or the server signalled it is invalid/expired.
    #[error("not authorized")]
    Unauthorized,
    /// Caught client-side before any request was sent.
    #[error("{0}")]
    Validation(String),
    #[error("not found")]
    NotFound,
    /// Server rejected a well-formed request.
    #[error("request failed ({status}): {message}")]
    Api { status: u16, message: String },
}

pub type ClientResult<T> = Result<T, ClientError>;

// Error bodies vary across backend handlers: {message}, {error}, {detail},
// sometimes several at once. Folded into one diagnostic string.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl ClientError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ClientError::Validation(msg.into())
    }

    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Unauthorized,
            StatusCode::NOT_FOUND => ClientError::NotFound,
            _ => {
                let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
                let mut message = parsed
                    .message
                    .or(parsed.error)
                    .unwrap_or_else(|| "request failed".to_string());
                if let Some(detail) = parsed.detail {
                    message = format!("{message} ({detail})");
                }
                ClientError::Api { status: status.as_u16(), message }
            }
        }
    }

    /// True when the session token was rejected (or never present); callers
    /// typically clear the session and send the user back to login.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }
}
