//! Unified payable/receivable ledger fact loader.
//!
//! Unions both staging families into one fact discriminated by `direction`.
//! One fact row per (document, installment, category, cost center)
//! allocation; an installment without allocations yields a single row with
//! the sentinel key slots. The enrichment invalidation rule runs inside the
//! store upsert, so this loader only projects rows.

use super::KeyCache;
use crate::control::PassTracker;
use crate::error::EtlResult;
use lf_core::{
    DimensionKind, EntityKind, LedgerAllocation, LedgerDirection, LedgerEntryRow, StepStats,
    NO_ENTITY,
};
use lf_store::{
    DimensionReader, FactWriter, LoadControlStore, StagingReader, TenantFilter,
};

fn control_entity(direction: LedgerDirection) -> EntityKind {
    match direction {
        LedgerDirection::Payable => EntityKind::Payable,
        LedgerDirection::Receivable => EntityKind::Receivable,
    }
}

pub(crate) fn load<S>(store: &S, filter: &TenantFilter) -> EtlResult<StepStats>
where
    S: StagingReader + FactWriter + DimensionReader + LoadControlStore,
{
    let mut stats = StepStats::default();
    let mut keys = KeyCache::new(store);

    for direction in [LedgerDirection::Payable, LedgerDirection::Receivable] {
        let mut tracker = PassTracker::new();

        for doc in store.ledger_documents(filter, direction)? {
            tracker.observe(doc.tenant, doc.credential, doc.collected_at);

            if let Some(person) = doc.person_id {
                if !keys.contains(doc.tenant, DimensionKind::Person, person)? {
                    log::warn!(
                        "fact:ledger tenant {}: document {} references unknown person {person}",
                        doc.tenant,
                        doc.document_id
                    );
                }
            }

            for installment in &doc.installments {
                // An unallocated installment still produces one fact row,
                // keyed with the sentinel slots.
                let whole = [LedgerAllocation {
                    category_id: None,
                    cost_center_id: None,
                    amount: installment.total,
                }];
                let allocations: &[LedgerAllocation] = if installment.allocations.is_empty() {
                    &whole
                } else {
                    &installment.allocations
                };

                for alloc in allocations {
                    if let Some(category) = alloc.category_id {
                        if !keys.contains(doc.tenant, DimensionKind::Category, category)? {
                            log::warn!(
                                "fact:ledger tenant {}: document {} references unknown \
                                 category {category}",
                                doc.tenant,
                                doc.document_id
                            );
                        }
                    }
                    if let Some(cost_center) = alloc.cost_center_id {
                        if !keys.contains(doc.tenant, DimensionKind::CostCenter, cost_center)? {
                            log::warn!(
                                "fact:ledger tenant {}: document {} references unknown \
                                 cost center {cost_center}",
                                doc.tenant,
                                doc.document_id
                            );
                        }
                    }

                    store.upsert_ledger_entry(&LedgerEntryRow {
                        tenant: doc.tenant,
                        document_id: doc.document_id,
                        installment_id: installment.installment_id,
                        category_id: alloc.category_id.unwrap_or(NO_ENTITY),
                        cost_center_id: alloc.cost_center_id.unwrap_or(NO_ENTITY),
                        direction,
                        person_id: doc.person_id,
                        description: doc.description.clone(),
                        allocated_amount: alloc.amount,
                        installment_total: installment.total,
                        paid_amount: installment.paid_amount,
                        unpaid_amount: installment.total - installment.paid_amount,
                        status: installment.status.clone().or_else(|| doc.status.clone()),
                        issue_date: doc.issue_date,
                        due_date: installment.due_date.or(doc.due_date),
                        // The store decides the stored flag from the
                        // invalidation rule; these are the inserted defaults.
                        detailed: false,
                        detailed_at: None,
                    })?;
                    stats.upserted += 1;
                }
            }
        }

        tracker.commit(store, control_entity(direction))?;
    }

    Ok(stats)
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
