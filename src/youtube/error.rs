use thiserror::Error;

/// Why a single remote call produced nothing usable.
///
/// These never escape the acquisition pipeline: the search and comment
/// clients log them, record them as the stop reason and keep what they have.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("YouTube API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response shape: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Quota exhaustion shows up as a 403 with a `quotaExceeded` reason.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, ApiError::Status { status: 403, body } if body.contains("quotaExceeded"))
    }
}
