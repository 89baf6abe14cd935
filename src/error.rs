use std::time::Duration;

use thiserror::Error;

/// Rejected run configuration. Reported once; the batch never starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing Serper API key (pass --api-key or set SERPER_API_KEY)")]
    MissingApiKey,

    #[error("no keywords to analyze")]
    NoKeywords,

    #[error("result count must be between {min} and {max}, got {got}")]
    ResultCount { min: u8, max: u8, got: u8 },

    #[error("concurrency must be at least 1")]
    Concurrency,
}

/// Failure of a single provider call. Recovered at the keyword boundary.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("malformed response body: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Parse(err.to_string())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("platform label cannot be empty")]
    EmptyLabel,

    #[error("duplicate platform label: {0}")]
    DuplicateLabel(String),

    #[error("platform {0} has no domains")]
    NoDomains(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("unsupported export extension: {0}")]
    UnknownFormat(String),
}
