//! # Store Errors
//!
//! Error taxonomy shared by the store, the query compiler and the
//! pagination engine.
//!
//! - `Input`: a required argument is missing or invalid. Raised before any
//!   store round trip.
//! - `QueryBuild`: a filter or sort the store refuses at query construction.
//! - `Operation`: the count, probe, fetch or write itself failed.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store and query errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Missing or invalid argument
    #[error("Invalid input: {0}")]
    Input(String),

    /// Filter or sort rejected while building the query
    #[error("Query build error: {0}")]
    QueryBuild(String),

    /// Store round trip failed
    #[error("Store operation failed: {0}")]
    Operation(String),
}

impl StoreError {
    /// Create an input error
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Create a query build error
    pub fn query_build(msg: impl Into<String>) -> Self {
        Self::QueryBuild(msg.into())
    }

    /// Create an operation error
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Input(_) => "INPUT_ERROR",
            Self::QueryBuild(_) => "QUERY_BUILD_ERROR",
            Self::Operation(_) => "STORE_OPERATION_ERROR",
        }
    }

    /// Returns the message without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Input(msg) | Self::QueryBuild(msg) | Self::Operation(msg) => msg,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::QueryBuild(e.to_string())
    }
}
