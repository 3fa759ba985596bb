use thiserror::Error;

/// Failures that prevent a request from producing a response
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection, TLS, timeout or other transport failure
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A 2xx body could not be decoded into the expected shape
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Base endpoint is not a usable URL
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// Building the HTTP client or a request failed
    #[error("failed to build HTTP client or request: {0}")]
    Build(#[source] reqwest::Error),

    /// The owning session was closed before the response arrived
    #[error("session cancelled")]
    Cancelled,
}

impl ClientError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }
}
