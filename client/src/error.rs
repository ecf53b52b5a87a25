use reqwest::StatusCode;
use thiserror::Error;

/// The one way a request to the photo api can fail.
///
/// The variants only exist so the log line says what went wrong, loaders treat
/// all of them the same.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("api responded with {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("unable to decode api response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    pub fn status(status: StatusCode, message: impl Into<String>) -> FetchError {
        FetchError::Status {
            status,
            message: message.into(),
        }
    }
}
