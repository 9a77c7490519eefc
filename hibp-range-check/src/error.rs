use std::time::Duration;

use crate::hasher::HashPrefix;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed for prefix {prefix}: {source}")]
    HttpRequest {
        prefix: HashPrefix,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for prefix {prefix}")]
    HttpStatus { prefix: HashPrefix, status: u16 },

    #[error("request for prefix {prefix} timed out after {timeout:?}")]
    Timeout { prefix: HashPrefix, timeout: Duration },

    #[error("range response for prefix {prefix} is not a range listing: {reason}")]
    InvalidResponse { prefix: HashPrefix, reason: String },

    #[error("range query for prefix {prefix} failed after {retries} retries: {source}")]
    RetriesExhausted {
        prefix: HashPrefix,
        retries: u32,
        #[source]
        source: Box<Error>,
    },

    #[error("invalid hash prefix {0:?}: expected 5 hex characters")]
    InvalidPrefix(String),

    #[error("invalid SHA-1 hash {0:?}: expected 40 hex characters")]
    InvalidHash(String),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("check cancelled after an earlier failure in the batch")]
    Cancelled,
}

impl Error {
    /// Returns true for failures of the remote range query itself.
    pub fn is_query_failure(&self) -> bool {
        matches!(
            self,
            Error::HttpRequest { .. }
                | Error::HttpStatus { .. }
                | Error::Timeout { .. }
                | Error::InvalidResponse { .. }
                | Error::RetriesExhausted { .. }
        )
    }

    /// Returns true when repeating the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::HttpRequest { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }

    /// The hash prefix whose query produced this error, if any.
    pub fn prefix(&self) -> Option<HashPrefix> {
        match self {
            Error::HttpRequest { prefix, .. }
            | Error::HttpStatus { prefix, .. }
            | Error::Timeout { prefix, .. }
            | Error::InvalidResponse { prefix, .. }
            | Error::RetriesExhausted { prefix, .. } => Some(*prefix),
            _ => None,
        }
    }

    pub(crate) fn from_request(
        prefix: HashPrefix,
        source: reqwest::Error,
        timeout: Duration,
    ) -> Self {
        if source.is_timeout() {
            Error::Timeout { prefix, timeout }
        } else {
            Error::HttpRequest { prefix, source }
        }
    }
}
