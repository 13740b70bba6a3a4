//! Cart store errors.

use bazaar::cart::CartError;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No credential, or the server refused the one sent.
    #[error("authentication required")]
    Unauthorized,

    /// The server rejected the request; carries its message.
    #[error("{0}")]
    ValidationFailed(String),

    /// The line or resource does not exist.
    #[error("not found")]
    NotFound,

    /// The server failed or could not be reached.
    #[error("cart service unavailable: {0}")]
    Transport(String),

    /// An HTTP transport or body decoding error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A success response omitted the expected payload.
    #[error("response carried no {0}")]
    MissingData(&'static str),

    /// The response body was not the expected shape.
    #[error("unexpected response body")]
    Decode(#[from] serde_json::Error),

    /// The returned cart could not be assembled.
    #[error("invalid cart snapshot")]
    Cart(#[from] CartError),
}

impl StoreError {
    /// Map a non-success status and its body to an error.
    ///
    /// The body's `message` field is used for rejections when present.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthorized,
            StatusCode::NOT_FOUND => Self::NotFound,
            status if status.is_client_error() => {
                Self::ValidationFailed(server_message(body).unwrap_or_else(|| status.to_string()))
            }
            status => Self::Transport(match server_message(body) {
                Some(message) => format!("{status}: {message}"),
                None => status.to_string(),
            }),
        }
    }

    /// Whether retrying later could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Http(_))
    }
}

fn server_message(body: &str) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct MessageBody {
        message: Option<String>,
    }

    serde_json::from_str::<MessageBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
}
