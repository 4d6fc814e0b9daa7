//! Error type shared by the remote lookup clients.
//!
//! "No cover available" is not an error: fetchers return `Ok(None)` for it.
//! Everything here is a transport or protocol fault.

/// Errors that can occur while talking to remote services
#[derive(Debug, Clone, thiserror::Error)]
pub enum EnrichmentError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Rate limited - try again later")]
    RateLimited,
}

impl From<reqwest::Error> for EnrichmentError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => Self::Http {
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
                status: status.as_u16(),
            },
            None => Self::Network(e.to_string()),
        }
    }
}
