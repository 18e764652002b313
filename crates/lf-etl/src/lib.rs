//! lf-etl - ETL engine for LedgerFlow
//!
//! Loads the tenant-isolated star schema from collector-owned staging:
//! dimension loaders (with hierarchy flattening), the DRE totalizer
//! classifier, fact loaders (with the enrichment invalidation rule), a
//! dependency-ordered orchestrator, and an integrity checker.
//!
//! Entry points take any [`lf_store::Warehouse`] implementation and an
//! optional tenant; omitting the tenant processes every tenant the registry
//! knows. An unknown tenant fails the invocation before any step runs.

mod calendar;
mod control;
mod dimensions;
mod facts;

#[cfg(test)]
pub(crate) mod testutil;

pub mod error;
pub mod integrity;
pub mod pipeline;

pub use error::{EtlError, EtlResult};
pub use integrity::{check_integrity, refresh_statistics};
pub use pipeline::run_pipeline;

use lf_core::{DimensionKind, FactKind, StepStats, TenantId};
use lf_store::Warehouse;

/// Run one dimension loader.
pub fn load_dimension<S: Warehouse>(
    store: &S,
    entity: DimensionKind,
    tenant: Option<TenantId>,
) -> EtlResult<StepStats> {
    let filter = pipeline::validate_tenant(store, tenant)?;
    dimensions::load(store, entity, &filter)
}

/// Run one fact loader.
pub fn load_fact<S: Warehouse>(
    store: &S,
    entity: FactKind,
    tenant: Option<TenantId>,
) -> EtlResult<StepStats> {
    let filter = pipeline::validate_tenant(store, tenant)?;
    facts::load(store, entity, &filter)
}

/// Re-run the totalizer classification without reloading the dimension.
pub fn classify_totalizers<S: Warehouse>(
    store: &S,
    tenant: Option<TenantId>,
) -> EtlResult<StepStats> {
    let filter = pipeline::validate_tenant(store, tenant)?;
    dimensions::classify_totalizers(store, &filter)
}
