use super::*;
use crate::testutil::{person, T1};
use lf_core::{Address, EntityId};
use lf_store::MemoryStore;

#[test]
fn projects_first_role_and_split_address() {
    let store = MemoryStore::new();
    let mut staged = person(T1, 500, Some("Ada"));
    staged.roles = vec!["supplier".into(), "customer".into()];
    staged.address = Some(Address {
        street: Some("Main St".into()),
        city: Some("Springfield".into()),
        state: Some("IL".into()),
        zip: None,
    });
    store.stage_person(staged);

    let stats = load(&store, &TenantFilter::All).unwrap();
    assert_eq!(stats.upserted, 1);

    let row = store.person(T1, EntityId::new(500)).unwrap();
    assert_eq!(row.kind.as_deref(), Some("supplier"));
    assert_eq!(row.city.as_deref(), Some("Springfield"));
    assert_eq!(row.zip, None);
}

#[test]
fn missing_name_skips_the_row() {
    let store = MemoryStore::new();
    store.stage_person(person(T1, 1, None));
    store.stage_person(person(T1, 2, Some("Grace")));

    let stats = load(&store, &TenantFilter::All).unwrap();
    assert_eq!(stats.upserted, 1);
    assert_eq!(stats.skipped, 1);
    assert!(store.person(T1, EntityId::new(1)).is_none());
}

#[test]
fn no_roles_leaves_kind_null() {
    let store = MemoryStore::new();
    let mut staged = person(T1, 3, Some("Lin"));
    staged.roles = Vec::new();
    store.stage_person(staged);

    load(&store, &TenantFilter::All).unwrap();
    assert_eq!(store.person(T1, EntityId::new(3)).unwrap().kind, None);
}
