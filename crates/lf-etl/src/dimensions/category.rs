//! Plain (cash-flow) category dimension loader.

use crate::control::PassTracker;
use crate::error::EtlResult;
use lf_core::{CategoryRow, EntityKind, HierarchyMap, StagingCategory, StepStats, TenantId};
use lf_store::{DimensionWriter, LoadControlStore, StagingReader, TenantFilter};
use std::collections::HashMap;

pub(crate) fn load<S>(store: &S, filter: &TenantFilter) -> EtlResult<StepStats>
where
    S: StagingReader + DimensionWriter + LoadControlStore,
{
    let staged = store.categories(filter)?;
    let mut by_tenant: HashMap<TenantId, Vec<StagingCategory>> = HashMap::new();
    for row in staged {
        by_tenant.entry(row.tenant).or_default().push(row);
    }

    let mut stats = StepStats::default();
    let mut tracker = PassTracker::new();

    for (tenant, rows) in by_tenant {
        // One adjacency map per tenant; flattening never crosses tenants.
        let hierarchy = HierarchyMap::from_categories(&rows);

        for row in &rows {
            tracker.observe(row.tenant, row.credential, row.collected_at);

            let Some(name) = &row.name else {
                log::warn!(
                    "dim:category tenant {tenant}: category {} has no name, skipping",
                    row.category_id
                );
                stats.skipped += 1;
                continue;
            };

            let path = hierarchy.flatten(row.category_id);
            store.upsert_category(&CategoryRow {
                tenant: row.tenant,
                category_id: row.category_id,
                name: name.clone(),
                external_code: row.external_code.clone(),
                levels: path.levels,
                depth: path.depth,
            })?;
            stats.upserted += 1;
        }
    }

    tracker.commit(store, EntityKind::Category)?;
    Ok(stats)
}

#[cfg(test)]
#[path = "category_test.rs"]
mod tests;
