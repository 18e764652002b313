//! Error types for the warehouse store.

use thiserror::Error;

/// Warehouse store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open or create the warehouse database (S001).
    #[error("[S001] Warehouse connection failed: {0}")]
    ConnectionError(String),

    /// Schema migration failed (S002).
    #[error("[S002] Warehouse migration failed: {0}")]
    MigrationError(String),

    /// SQL execution error (S003).
    #[error("[S003] Warehouse query failed: {0}")]
    QueryError(String),

    /// Transaction management error (S004).
    #[error("[S004] Warehouse transaction failed: {0}")]
    TransactionError(String),

    /// A stored value could not be decoded into its row type (S005).
    #[error("[S005] Warehouse row decode failed: {0}")]
    DecodeError(String),

    /// DuckDB driver error with preserved source chain (S006).
    #[error("[S006] DuckDB error")]
    DuckDb(#[source] duckdb::Error),
}

/// Result type alias for [`StoreError`].
pub type StoreResult<T> = Result<T, StoreError>;

impl From<duckdb::Error> for StoreError {
    fn from(err: duckdb::Error) -> Self {
        StoreError::DuckDb(err)
    }
}

/// Context helper mirroring the `?`-with-message pattern used throughout
/// the store: wraps a driver error into [`StoreError::QueryError`] naming
/// the statement that failed.
pub trait StoreResultExt<T> {
    fn query_context(self, context: &str) -> StoreResult<T>;
}

impl<T> StoreResultExt<T> for Result<T, duckdb::Error> {
    fn query_context(self, context: &str) -> StoreResult<T> {
        self.map_err(|e| StoreError::QueryError(format!("{context}: {e}")))
    }
}
