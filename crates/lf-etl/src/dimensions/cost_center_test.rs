use super::*;
use crate::testutil::{cost_center, T1, T2};
use lf_core::EntityId;
use lf_store::MemoryStore;

#[test]
fn upserts_named_rows_and_skips_unnamed() {
    let store = MemoryStore::new();
    store.stage_cost_center(cost_center(T1, 1, Some("Operations")));
    store.stage_cost_center(cost_center(T1, 2, None));

    let stats = load(&store, &TenantFilter::All).unwrap();
    assert_eq!(stats.upserted, 1);
    assert_eq!(stats.skipped, 1);

    let row = store.cost_center(T1, EntityId::new(1)).unwrap();
    assert_eq!(row.name, "Operations");
    assert_eq!(row.code.as_deref(), Some("CC-1"));
    assert!(store.cost_center(T1, EntityId::new(2)).is_none());
}

#[test]
fn inactive_flag_survives_the_load() {
    let store = MemoryStore::new();
    let mut staged = cost_center(T1, 3, Some("Legacy"));
    staged.inactive = true;
    store.stage_cost_center(staged);

    load(&store, &TenantFilter::All).unwrap();
    assert!(store.cost_center(T1, EntityId::new(3)).unwrap().inactive);
}

#[test]
fn tenant_filter_restricts_the_pass() {
    let store = MemoryStore::new();
    store.stage_cost_center(cost_center(T1, 1, Some("Ops")));
    store.stage_cost_center(cost_center(T2, 1, Some("Ops")));

    let stats = load(&store, &TenantFilter::One(T1)).unwrap();
    assert_eq!(stats.upserted, 1);
    assert!(store.cost_center(T2, EntityId::new(1)).is_none());
}
