use super::*;
use crate::error::EtlError;
use crate::testutil::{category, installment, ledger_document, T1, T2};
use lf_core::{EntityId, LedgerAllocation, LedgerDirection};
use lf_store::MemoryStore;

fn seed_dangling_ledger(store: &MemoryStore, tenant: lf_core::TenantId) {
    store.add_tenant(tenant);
    store.stage_ledger_document(ledger_document(
        tenant,
        100,
        LedgerDirection::Payable,
        vec![installment(
            1,
            50.0,
            vec![LedgerAllocation {
                category_id: Some(EntityId::new(999)),
                cost_center_id: None,
                amount: 50.0,
            }],
        )],
    ));
    crate::load_fact(store, lf_core::FactKind::Ledger, Some(tenant)).unwrap();
}

#[test]
fn reports_fact_rows_with_unresolved_dimension_keys() {
    let store = MemoryStore::new();
    seed_dangling_ledger(&store, T1);

    let findings = check_integrity(&store, None).unwrap();

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].tenant, T1);
    assert_eq!(findings[0].table, "dw.fact_ledger_entry");
    assert_eq!(findings[0].reason, "category_id has no dim_category row");
    assert_eq!(findings[0].rows, 1);
}

#[test]
fn resolved_keys_produce_no_findings() {
    let store = MemoryStore::new();
    seed_dangling_ledger(&store, T1);
    store.stage_category(category(T1, 999, "Rent", None));
    crate::load_dimension(&store, lf_core::DimensionKind::Category, Some(T1)).unwrap();

    let findings = check_integrity(&store, None).unwrap();
    assert!(findings.is_empty());
}

#[test]
fn tenant_scope_hides_other_tenants_findings() {
    let store = MemoryStore::new();
    seed_dangling_ledger(&store, T1);
    seed_dangling_ledger(&store, T2);

    let findings = check_integrity(&store, Some(T1)).unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].tenant, T1);
}

#[test]
fn unknown_tenant_is_rejected() {
    let store = MemoryStore::new();
    store.add_tenant(T1);

    let err = check_integrity(&store, Some(T2)).unwrap_err();
    assert!(matches!(err, EtlError::UnknownTenant(t) if t == T2));
}

#[test]
fn refresh_statistics_is_a_no_op_on_the_fake() {
    let store = MemoryStore::new();
    refresh_statistics(&store).unwrap();
}
