//! Error types for lf-core

use thiserror::Error;

/// Core error type for LedgerFlow
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Entity kind string did not parse
    #[error("[E001] Unknown entity kind: '{name}'")]
    UnknownEntityKind { name: String },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
