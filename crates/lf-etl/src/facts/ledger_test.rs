use super::*;
use crate::testutil::{collected, installment, ledger_document, CRED, T1};
use lf_core::{EntityId, LoadControlKey};
use lf_store::MemoryStore;

fn allocation(category: Option<i64>, cost_center: Option<i64>, amount: f64) -> LedgerAllocation {
    LedgerAllocation {
        category_id: category.map(EntityId::new),
        cost_center_id: cost_center.map(EntityId::new),
        amount,
    }
}

#[test]
fn one_fact_row_per_allocation() {
    let store = MemoryStore::new();
    store.stage_ledger_document(ledger_document(
        T1,
        100,
        LedgerDirection::Payable,
        vec![installment(
            1,
            100.0,
            vec![allocation(Some(10), Some(20), 60.0), allocation(Some(11), None, 40.0)],
        )],
    ));

    let stats = load(&store, &TenantFilter::All).unwrap();
    assert_eq!(stats.upserted, 2);

    let rows = store.ledger_entries(T1);
    assert_eq!(rows.len(), 2);
    let first = rows
        .iter()
        .find(|r| r.category_id == EntityId::new(10))
        .unwrap();
    assert_eq!(first.allocated_amount, 60.0);
    assert_eq!(first.installment_total, 100.0);
    assert_eq!(first.unpaid_amount, 100.0);
    assert_eq!(first.cost_center_id, EntityId::new(20));
}

#[test]
fn unallocated_installment_gets_a_sentinel_row() {
    let store = MemoryStore::new();
    store.stage_ledger_document(ledger_document(
        T1,
        100,
        LedgerDirection::Receivable,
        vec![installment(1, 250.0, Vec::new())],
    ));

    load(&store, &TenantFilter::All).unwrap();

    let rows = store.ledger_entries(T1);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category_id, NO_ENTITY);
    assert_eq!(rows[0].cost_center_id, NO_ENTITY);
    assert_eq!(rows[0].allocated_amount, 250.0);
    assert_eq!(rows[0].direction, LedgerDirection::Receivable);
}

#[test]
fn installment_status_and_due_date_win_over_the_document() {
    let store = MemoryStore::new();
    let mut doc = ledger_document(
        T1,
        100,
        LedgerDirection::Payable,
        vec![installment(1, 50.0, Vec::new())],
    );
    doc.status = Some("overdue".into());
    doc.installments[0].status = None;
    doc.installments[0].due_date = None;
    store.stage_ledger_document(doc);

    load(&store, &TenantFilter::All).unwrap();

    let rows = store.ledger_entries(T1);
    assert_eq!(rows[0].status.as_deref(), Some("overdue"));
    assert_eq!(rows[0].due_date, chrono::NaiveDate::from_ymd_opt(2024, 4, 1));
}

#[test]
fn rerun_with_unchanged_core_fields_preserves_enrichment() {
    let store = MemoryStore::new();
    store.stage_ledger_document(ledger_document(
        T1,
        100,
        LedgerDirection::Payable,
        vec![installment(1, 50.0, Vec::new())],
    ));
    load(&store, &TenantFilter::All).unwrap();

    store.mark_ledger_detailed(T1, EntityId::new(100));

    // Second pass over identical staging must not forget the flag.
    load(&store, &TenantFilter::All).unwrap();
    assert!(store.ledger_entries(T1)[0].detailed);
}

#[test]
fn core_field_change_invalidates_enrichment() {
    let store = MemoryStore::new();
    let doc = ledger_document(
        T1,
        100,
        LedgerDirection::Payable,
        vec![installment(1, 50.0, Vec::new())],
    );
    store.stage_ledger_document(doc.clone());
    load(&store, &TenantFilter::All).unwrap();
    store.mark_ledger_detailed(T1, EntityId::new(100));

    let mut changed = doc;
    changed.installments[0].total = 75.0;
    store.stage_ledger_document(changed);
    load(&store, &TenantFilter::All).unwrap();

    let rows = store.ledger_entries(T1);
    assert!(!rows[0].detailed);
    assert_eq!(rows[0].installment_total, 75.0);
}

#[test]
fn each_direction_tracks_its_own_load_control() {
    let store = MemoryStore::new();
    store.stage_ledger_document(ledger_document(
        T1,
        100,
        LedgerDirection::Payable,
        vec![installment(1, 50.0, Vec::new())],
    ));

    load(&store, &TenantFilter::All).unwrap();

    let key = |entity| LoadControlKey {
        tenant: T1,
        credential: CRED,
        entity,
    };
    let payable = store.get(&key(EntityKind::Payable)).unwrap();
    assert!(payable.full_load_done);
    assert_eq!(payable.last_processed_watermark, Some(collected()));

    let receivable = store.get(&key(EntityKind::Receivable)).unwrap();
    assert!(!receivable.full_load_done);
}
