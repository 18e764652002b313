use super::*;
use crate::testutil::{collected, contract, CRED, T1};
use lf_core::{EntityId, LoadControlKey};
use lf_store::MemoryStore;

#[test]
fn contracts_are_upserted_by_natural_key() {
    let store = MemoryStore::new();
    store.stage_contract(contract(T1, 400));

    let stats = load(&store, &TenantFilter::All).unwrap();
    assert_eq!(stats.upserted, 1);

    let row = store.contract(T1, EntityId::new(400)).unwrap();
    assert_eq!(row.number.as_deref(), Some("CT-400"));
    assert_eq!(row.monthly_value, 500.0);
}

#[test]
fn restaged_snapshot_overwrites_the_row() {
    let store = MemoryStore::new();
    let staged = contract(T1, 400);
    store.stage_contract(staged.clone());
    load(&store, &TenantFilter::All).unwrap();

    let mut ended = staged;
    ended.status = Some("cancelled".into());
    ended.ends_on = chrono::NaiveDate::from_ymd_opt(2024, 6, 30);
    store.stage_contract(ended);
    load(&store, &TenantFilter::All).unwrap();

    let row = store.contract(T1, EntityId::new(400)).unwrap();
    assert_eq!(row.status.as_deref(), Some("cancelled"));
    assert!(row.ends_on.is_some());
}

#[test]
fn successful_pass_updates_load_control() {
    let store = MemoryStore::new();
    store.stage_contract(contract(T1, 400));

    load(&store, &TenantFilter::All).unwrap();

    let state = store
        .get(&LoadControlKey {
            tenant: T1,
            credential: CRED,
            entity: EntityKind::Contract,
        })
        .unwrap();
    assert!(state.full_load_done);
    assert_eq!(state.last_processed_watermark, Some(collected()));
}
