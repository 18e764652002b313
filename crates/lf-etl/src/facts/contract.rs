//! Contract fact loader.

use crate::control::PassTracker;
use crate::error::EtlResult;
use lf_core::{ContractRow, EntityKind, StepStats};
use lf_store::{FactWriter, LoadControlStore, StagingReader, TenantFilter};

pub(crate) fn load<S>(store: &S, filter: &TenantFilter) -> EtlResult<StepStats>
where
    S: StagingReader + FactWriter + LoadControlStore,
{
    let mut stats = StepStats::default();
    let mut tracker = PassTracker::new();

    for contract in store.contracts(filter)? {
        tracker.observe(contract.tenant, contract.credential, contract.collected_at);

        store.upsert_contract(&ContractRow {
            tenant: contract.tenant,
            contract_id: contract.contract_id,
            number: contract.number.clone(),
            person_id: contract.person_id,
            status: contract.status.clone(),
            starts_on: contract.starts_on,
            ends_on: contract.ends_on,
            monthly_value: contract.monthly_value,
            total_value: contract.total_value,
        })?;
        stats.upserted += 1;
    }

    tracker.commit(store, EntityKind::Contract)?;
    Ok(stats)
}

#[cfg(test)]
#[path = "contract_test.rs"]
mod tests;
