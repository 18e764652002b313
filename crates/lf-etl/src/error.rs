//! Error types for the ETL engine.

use lf_core::TenantId;
use thiserror::Error;

/// ETL engine errors.
#[derive(Error, Debug)]
pub enum EtlError {
    /// The requested tenant is not in the registry (P001).
    ///
    /// Input validation failure: the whole invocation stops before any
    /// partial execution.
    #[error("[P001] Unknown tenant {0}")]
    UnknownTenant(TenantId),

    /// A core type/logic error (P002).
    #[error("[P002] {0}")]
    Core(#[from] lf_core::CoreError),

    /// A warehouse store error (P003).
    #[error("[P003] {0}")]
    Store(#[from] lf_store::StoreError),
}

/// Result type alias for [`EtlError`].
pub type EtlResult<T> = Result<T, EtlError>;
