//! Rate feed error types.

use thiserror::Error;

/// Errors from one fetch cycle. None of them is fatal to the refresh loop.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Connection error, timeout or unreadable body.
    #[error("rate source unavailable: {0}")]
    UpstreamUnavailable(#[from] reqwest::Error),

    /// The rate source answered with a non-success status.
    #[error("rate source returned status {0}")]
    UpstreamStatus(u16),

    /// The body is not JSON or lacks the expected top-level object.
    #[error("malformed rate source response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

impl FeedError {
    /// Returns the error code for logs and diagnostics.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            Self::UpstreamStatus(_) => "UPSTREAM_STATUS",
            Self::MalformedResponse(_) => "MALFORMED_UPSTREAM_RESPONSE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error() {
        let err = FeedError::UpstreamStatus(503);
        assert_eq!(err.to_string(), "rate source returned status 503");
        assert_eq!(err.error_code(), "UPSTREAM_STATUS");
    }

    #[test]
    fn test_malformed_error_from_serde() {
        let err: FeedError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.error_code(), "MALFORMED_UPSTREAM_RESPONSE");
    }
}
