//! Fact loaders.
//!
//! Each joins staging to dimension keys by tenant-scoped natural id and
//! upserts by the fact's natural key. Facts depend on the dimensions loaded
//! earlier in the same run; an unresolved join is logged and left for the
//! integrity checker, never fatal.

mod balance;
mod contract;
mod ledger;
mod sale;

use crate::error::EtlResult;
use lf_core::{DimensionKind, EntityId, FactKind, StepStats, TenantId};
use lf_store::{
    DimensionReader, FactWriter, LoadControlStore, StagingReader, TenantFilter,
};
use std::collections::{HashMap, HashSet};

/// Run one fact loader within `filter`'s scope.
pub(crate) fn load<S>(store: &S, entity: FactKind, filter: &TenantFilter) -> EtlResult<StepStats>
where
    S: StagingReader + FactWriter + DimensionReader + LoadControlStore,
{
    match entity {
        FactKind::Ledger => ledger::load(store, filter),
        FactKind::Sale => sale::load(store, filter),
        FactKind::Contract => contract::load(store, filter),
        FactKind::AccountBalance => balance::load(store, filter),
    }
}

/// Lazily-fetched dimension key sets, one per (tenant, dimension).
///
/// Loaders probe these to flag joins that will not resolve; the fact row is
/// written either way, so a re-run after the dimension catches up heals it.
pub(crate) struct KeyCache<'a, S: DimensionReader> {
    store: &'a S,
    cache: HashMap<(TenantId, DimensionKind), HashSet<EntityId>>,
}

impl<'a, S: DimensionReader> KeyCache<'a, S> {
    pub(crate) fn new(store: &'a S) -> Self {
        Self {
            store,
            cache: HashMap::new(),
        }
    }

    pub(crate) fn contains(
        &mut self,
        tenant: TenantId,
        dimension: DimensionKind,
        id: EntityId,
    ) -> EtlResult<bool> {
        if !self.cache.contains_key(&(tenant, dimension)) {
            let keys = self.store.dimension_keys(tenant, dimension)?;
            self.cache.insert((tenant, dimension), keys);
        }
        Ok(self.cache[&(tenant, dimension)].contains(&id))
    }
}
