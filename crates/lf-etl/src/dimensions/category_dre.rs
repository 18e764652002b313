//! DRE (income statement) category dimension loader.
//!
//! Writes one base row per staged category and, while the 5-level width
//! allows, one synthetic expansion row per linked financial category with
//! the link as an extra leaf level. Expansion rows reuse the base row's
//! position and external code, since the link shares its slot in the
//! statement structure.

use crate::control::PassTracker;
use crate::error::EtlResult;
use lf_core::{
    CategoryDreRow, EntityKind, HierarchyMap, StagingCategory, StepStats, TenantId, NO_ENTITY,
};
use lf_store::{DimensionWriter, LoadControlStore, StagingReader, TenantFilter};
use std::collections::HashMap;

pub(crate) fn load<S>(store: &S, filter: &TenantFilter) -> EtlResult<StepStats>
where
    S: StagingReader + DimensionWriter + LoadControlStore,
{
    let staged = store.dre_categories(filter)?;
    let mut by_tenant: HashMap<TenantId, Vec<StagingCategory>> = HashMap::new();
    for row in staged {
        by_tenant.entry(row.tenant).or_default().push(row);
    }

    let mut stats = StepStats::default();
    let mut tracker = PassTracker::new();

    for (tenant, rows) in by_tenant {
        let hierarchy = HierarchyMap::from_categories(&rows);

        for row in &rows {
            tracker.observe(row.tenant, row.credential, row.collected_at);

            let Some(name) = &row.name else {
                log::warn!(
                    "dim:category_dre tenant {tenant}: category {} has no name, skipping",
                    row.category_id
                );
                stats.skipped += 1;
                continue;
            };

            let path = hierarchy.flatten(row.category_id);
            store.upsert_category_dre(&CategoryDreRow {
                tenant: row.tenant,
                category_id: row.category_id,
                expansion_id: NO_ENTITY,
                name: name.clone(),
                external_code: row.external_code.clone(),
                position: row.position.clone(),
                levels: path.levels.clone(),
                depth: path.depth,
            })?;
            stats.upserted += 1;

            for link in &row.financial_links {
                let Some(expanded) = path.with_appended(&link.name) else {
                    log::debug!(
                        "dim:category_dre tenant {tenant}: category {} already at full \
                         depth, not expanding link {}",
                        row.category_id,
                        link.id
                    );
                    continue;
                };
                store.upsert_category_dre(&CategoryDreRow {
                    tenant: row.tenant,
                    category_id: row.category_id,
                    expansion_id: link.id,
                    name: link.name.clone(),
                    external_code: row.external_code.clone(),
                    position: row.position.clone(),
                    levels: expanded.levels,
                    depth: expanded.depth,
                })?;
                stats.upserted += 1;
            }
        }
    }

    tracker.commit(store, EntityKind::CategoryDre)?;
    Ok(stats)
}

#[cfg(test)]
#[path = "category_dre_test.rs"]
mod tests;
