use reqwest::StatusCode;
use thiserror::Error;

/// Transport, HTTP or decoding failure of a single request.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error: {status} from {url}")]
    Status { status: StatusCode, url: String },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Outcome of a search that did not produce results.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The caller abandoned the request. Expected and silent.
    #[error("search cancelled")]
    Cancelled,

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl SearchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SearchError::Cancelled)
    }
}
