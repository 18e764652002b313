//! Account-balance snapshot fact loader.
//!
//! The fact is an append-only time series, but staging retains the full
//! history for this entity, so the loader replace-sets the filter's rows
//! from staging wholesale. Recompute-heavy and correctness-preserving;
//! kept as observed upstream.

use crate::control::PassTracker;
use crate::error::EtlResult;
use lf_core::{BalanceRow, EntityKind, StepStats};
use lf_store::{FactWriter, LoadControlStore, StagingReader, TenantFilter};

pub(crate) fn load<S>(store: &S, filter: &TenantFilter) -> EtlResult<StepStats>
where
    S: StagingReader + FactWriter + LoadControlStore,
{
    let mut tracker = PassTracker::new();
    let mut rows: Vec<BalanceRow> = Vec::new();

    for reading in store.balance_history(filter)? {
        tracker.observe(reading.tenant, reading.credential, Some(reading.collected_at));
        rows.push(BalanceRow {
            tenant: reading.tenant,
            account_id: reading.account_id,
            account_name: reading.account_name.clone(),
            balance: reading.balance,
            collected_at: reading.collected_at,
        });
    }

    let upserted = store.replace_balances(filter, &rows)?;
    tracker.commit(store, EntityKind::AccountBalance)?;

    Ok(StepStats {
        upserted,
        skipped: 0,
    })
}

#[cfg(test)]
#[path = "balance_test.rs"]
mod tests;
