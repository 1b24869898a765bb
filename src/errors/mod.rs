use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidEnvVar { name: String, value: String },

    // Input errors
    #[error("Invalid country code: {0}")]
    InvalidCountry(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    // Network errors
    #[error("HTTP client setup failed: {0}")]
    Http(#[from] reqwest::Error),

    // Output errors
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type NewsResult<T> = Result<T, NewsError>;

/// Reason code attached to every [`NetworkFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    Timeout,
    HttpStatus,
    ConnectionError,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::Timeout => "timeout",
            FailureReason::HttpStatus => "http_status",
            FailureReason::ConnectionError => "connection_error",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fetch that did not produce a usable body. Returned, never raised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkFailure {
    #[error("Timed out fetching {url}")]
    Timeout { url: String },

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Connection error fetching {url}: {message}")]
    Connection { url: String, message: String },
}

impl NetworkFailure {
    pub fn reason(&self) -> FailureReason {
        match self {
            NetworkFailure::Timeout { .. } => FailureReason::Timeout,
            NetworkFailure::HttpStatus { .. } => FailureReason::HttpStatus,
            NetworkFailure::Connection { .. } => FailureReason::ConnectionError,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            NetworkFailure::Timeout { url }
            | NetworkFailure::HttpStatus { url, .. }
            | NetworkFailure::Connection { url, .. } => url,
        }
    }
}

/// Feed payload could not be read as RSS, Atom or JSON Feed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Feed parsing failed: {0}")]
pub struct ParseFailure(pub String);

/// Neither extractor produced a title or a summary for a page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No readable content at {url}")]
pub struct ExtractionFailure {
    pub url: String,
}
