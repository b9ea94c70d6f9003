//! Error types for the search crate.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while loading a record store or running a diagnosis.
///
/// Scoring and normalization never fail; every variant here is a data error.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The store holds no records
    #[error("Record store is empty: no diagnostics loaded")]
    EmptyStore,

    /// The store document could not be parsed
    #[error("Malformed record store: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The store file could not be read
    #[error("Failed to read record store {path}: {source}")]
    Io {
        /// Path that was being read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Error code for integration with autodiag-core error handling.
/// Range: 11xxx for search errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorCode {
    /// Store has no records
    EmptyStore = 11001,
    /// Store JSON is malformed
    Malformed = 11002,
    /// Store file unreadable
    Io = 11003,
}

impl SearchError {
    /// Returns the error code for this error.
    pub fn code(&self) -> SearchErrorCode {
        match self {
            SearchError::EmptyStore => SearchErrorCode::EmptyStore,
            SearchError::Malformed(_) => SearchErrorCode::Malformed,
            SearchError::Io { .. } => SearchErrorCode::Io,
        }
    }
}
