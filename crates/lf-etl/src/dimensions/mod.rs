//! Dimension loaders.
//!
//! One loader per dimension entity. Each reads staging within the tenant
//! filter, projects scalar columns, flattens hierarchies where the entity
//! has one, and upserts by natural key overwriting every derived column.
//! Malformed rows are skipped with a warning and counted, never fatal.

mod category;
mod category_dre;
mod cost_center;
mod person;
pub(crate) mod totalizer;

use crate::error::EtlResult;
use lf_core::{DimensionKind, StepStats};
use lf_store::{DimensionWriter, LoadControlStore, StagingReader, TenantFilter};

pub(crate) use totalizer::classify_totalizers;

/// Run one dimension loader within `filter`'s scope.
pub(crate) fn load<S>(
    store: &S,
    entity: DimensionKind,
    filter: &TenantFilter,
) -> EtlResult<StepStats>
where
    S: StagingReader + DimensionWriter + LoadControlStore,
{
    match entity {
        DimensionKind::Category => category::load(store, filter),
        DimensionKind::CategoryDre => category_dre::load(store, filter),
        DimensionKind::Person => person::load(store, filter),
        DimensionKind::CostCenter => cost_center::load(store, filter),
    }
}
