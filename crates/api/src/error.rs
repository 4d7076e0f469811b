use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the interview service.
///
/// Display strings are written for the candidate; they end up in the inline
/// error banner.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("service not found; please check that the interview backend is running")]
    NotFound,

    #[error("server error ({0}); please try again later")]
    Server(StatusCode),

    #[error("request failed with status {0}")]
    HttpStatus(StatusCode),

    #[error("cannot connect to the interview service at {0}")]
    Unreachable(String),

    #[error("the interview service did not answer in time")]
    Timeout,

    #[error("response is missing `{0}`")]
    MissingPayload(&'static str),

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error(transparent)]
    Http(reqwest::Error),
}

impl ApiError {
    /// Maps a non-success status to the error shown to the candidate.
    #[must_use]
    pub fn from_status(status: StatusCode) -> Self {
        if status == StatusCode::NOT_FOUND {
            ApiError::NotFound
        } else if status.is_server_error() {
            ApiError::Server(status)
        } else {
            ApiError::HttpStatus(status)
        }
    }

    /// Classifies a transport error against the configured base url.
    #[must_use]
    pub fn from_transport(err: reqwest::Error, base_url: &str) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Unreachable(base_url.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::from_status(status)
        } else {
            ApiError::Http(err)
        }
    }
}
