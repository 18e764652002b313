//! Totalizer classification over the DRE category dimension.
//!
//! A DRE row is a totalizer when its staging payload shows it to be purely
//! structural: a root node with no external code, no sub-items, and no
//! linked financial categories. Position, not id, is the stable identity of
//! a statement slot across periods, so the mask keys on (tenant, position).
//! A secondary relation records the non-totalizer rows sharing a
//! totalizer's position.

use crate::error::EtlResult;
use lf_core::{StagingCategory, StepStats, TotalizerPeerRow, TotalizerRow};
use lf_store::{DimensionWriter, StagingReader, TenantFilter};
use std::collections::HashSet;

fn is_totalizer(row: &StagingCategory) -> bool {
    row.parent_id.is_none()
        && row.external_code.is_none()
        && row.subitem_count == 0
        && row.financial_links.is_empty()
}

pub(crate) fn classify_totalizers<S>(store: &S, filter: &TenantFilter) -> EtlResult<StepStats>
where
    S: StagingReader + DimensionWriter,
{
    let staged = store.dre_categories(filter)?;

    let mut stats = StepStats::default();
    let mut totalizers: Vec<TotalizerRow> = Vec::new();
    let mut marked: HashSet<(i64, String)> = HashSet::new();

    for row in &staged {
        if !is_totalizer(row) {
            continue;
        }
        let Some(position) = &row.position else {
            log::warn!(
                "dre:totalizer tenant {}: structural row {} has no position, skipping",
                row.tenant,
                row.category_id
            );
            stats.skipped += 1;
            continue;
        };
        if marked.insert((row.tenant.raw(), position.clone())) {
            totalizers.push(TotalizerRow {
                tenant: row.tenant,
                position: position.clone(),
            });
        }
    }

    let mut peers: Vec<TotalizerPeerRow> = Vec::new();
    for row in &staged {
        if is_totalizer(row) {
            continue;
        }
        let Some(position) = &row.position else {
            continue;
        };
        if marked.contains(&(row.tenant.raw(), position.clone())) {
            peers.push(TotalizerPeerRow {
                tenant: row.tenant,
                position: position.clone(),
                category_id: row.category_id,
            });
        }
    }

    stats.upserted = totalizers.len() + peers.len();
    store.replace_totalizers(filter, &totalizers, &peers)?;
    Ok(stats)
}

#[cfg(test)]
#[path = "totalizer_test.rs"]
mod tests;
