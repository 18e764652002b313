//! Cost center dimension loader.

use crate::control::PassTracker;
use crate::error::EtlResult;
use lf_core::{CostCenterRow, EntityKind, StepStats};
use lf_store::{DimensionWriter, LoadControlStore, StagingReader, TenantFilter};

pub(crate) fn load<S>(store: &S, filter: &TenantFilter) -> EtlResult<StepStats>
where
    S: StagingReader + DimensionWriter + LoadControlStore,
{
    let mut stats = StepStats::default();
    let mut tracker = PassTracker::new();

    for row in store.cost_centers(filter)? {
        tracker.observe(row.tenant, row.credential, row.collected_at);

        let Some(name) = &row.name else {
            log::warn!(
                "dim:cost_center tenant {}: cost center {} has no name, skipping",
                row.tenant,
                row.cost_center_id
            );
            stats.skipped += 1;
            continue;
        };

        store.upsert_cost_center(&CostCenterRow {
            tenant: row.tenant,
            cost_center_id: row.cost_center_id,
            code: row.code.clone(),
            name: name.clone(),
            inactive: row.inactive,
        })?;
        stats.upserted += 1;
    }

    tracker.commit(store, EntityKind::CostCenter)?;
    Ok(stats)
}

#[cfg(test)]
#[path = "cost_center_test.rs"]
mod tests;
