//! Sync error types
//!
//! `SyncError` covers every failure the jobs can hit. Where it is raised
//! decides whether it is fatal: configuration and top-level fetch/list
//! failures abort the run, record- and company-level failures are logged
//! and counted by the caller.

use thiserror::Error;

/// Why a single raw item could not be turned into a typed record
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    /// Item is not a JSON object
    #[error("expected an object, got {0}")]
    NotAnObject(&'static str),

    /// Field holds a value that cannot be read as text
    #[error("field {field} holds a non-scalar value")]
    InvalidField { field: &'static str },

    /// Natural key missing or not an integer
    #[error("invalid code in field {field}: {value:?}")]
    InvalidCode { field: &'static str, value: String },
}

/// Sync job error
#[derive(Debug, Error)]
pub enum SyncError {
    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data source answered with a non-200 status
    #[error("API request failed with status {status}")]
    Api { status: u16, body: String },

    /// Network failure or timeout talking to the data source
    #[error("API transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body is not valid JSON
    #[error("Invalid API response: {0}")]
    Decode(String),

    /// Raw item could not be mapped
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// Database error (lookup, write, commit or connection)
    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),

    /// Company code requested on the command line is not in the store
    #[error("Company not found: {0}")]
    CompanyNotFound(i64),

    /// A batch worker died before reporting its counts
    #[error("Batch failed: {0}")]
    Batch(String),
}

impl SyncError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Response body for logging, when the error carries one
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Api { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_keeps_status_and_body() {
        let err = SyncError::Api {
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "API request failed with status 503");
        assert_eq!(err.body(), Some("maintenance"));
    }

    #[test]
    fn mapping_error_converts() {
        let err: SyncError = MappingError::NotAnObject("string").into();
        assert!(matches!(err, SyncError::Mapping(MappingError::NotAnObject(_))));
        assert!(err.body().is_none());
    }
}
