use std::time::Duration;

use shared::error::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Status {
        status: u16,
        code: Option<ErrorCode>,
        message: String,
    },
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("invalid server url '{0}'")]
    InvalidServerUrl(String),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}
