//! Person (customer/supplier) dimension loader.

use crate::control::PassTracker;
use crate::error::EtlResult;
use lf_core::{EntityKind, PersonRow, StepStats};
use lf_store::{DimensionWriter, LoadControlStore, StagingReader, TenantFilter};

pub(crate) fn load<S>(store: &S, filter: &TenantFilter) -> EtlResult<StepStats>
where
    S: StagingReader + DimensionWriter + LoadControlStore,
{
    let mut stats = StepStats::default();
    let mut tracker = PassTracker::new();

    for row in store.people(filter)? {
        tracker.observe(row.tenant, row.credential, row.collected_at);

        let Some(name) = &row.name else {
            log::warn!(
                "dim:person tenant {}: person {} has no name, skipping",
                row.tenant,
                row.person_id
            );
            stats.skipped += 1;
            continue;
        };

        let address = row.address.clone().unwrap_or_default();
        store.upsert_person(&PersonRow {
            tenant: row.tenant,
            person_id: row.person_id,
            name: name.clone(),
            document: row.document.clone(),
            // The upstream payload tags a person with several roles; the
            // first one is the reporting kind.
            kind: row.roles.first().cloned(),
            email: row.email.clone(),
            street: address.street,
            city: address.city,
            state: address.state,
            zip: address.zip,
        })?;
        stats.upserted += 1;
    }

    tracker.commit(store, EntityKind::Person)?;
    Ok(stats)
}

#[cfg(test)]
#[path = "person_test.rs"]
mod tests;
