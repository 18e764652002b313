use super::*;
use crate::testutil::{category, dre_category, T1};
use lf_core::EntityId;
use lf_store::MemoryStore;

#[test]
fn base_row_uses_sentinel_expansion_id() {
    let store = MemoryStore::new();
    store.stage_dre_category(dre_category(T1, 100, "Revenue", "3", vec![]));

    let stats = load(&store, &TenantFilter::All).unwrap();
    assert_eq!(stats.upserted, 1);

    let row = store
        .dre_category(T1, EntityId::new(100), NO_ENTITY)
        .unwrap();
    assert_eq!(row.name, "Revenue");
    assert_eq!(row.position.as_deref(), Some("3"));
    assert_eq!(row.depth, 1);
    assert_eq!(row.levels[0].as_deref(), Some("Revenue"));
}

#[test]
fn financial_links_become_expansion_rows() {
    let store = MemoryStore::new();
    store.stage_dre_category(dre_category(
        T1,
        100,
        "Revenue",
        "3",
        vec![(777, "Sales"), (778, "Services")],
    ));

    let stats = load(&store, &TenantFilter::All).unwrap();
    assert_eq!(stats.upserted, 3);

    let expansion = store
        .dre_category(T1, EntityId::new(100), EntityId::new(777))
        .unwrap();
    assert_eq!(expansion.name, "Sales");
    assert_eq!(expansion.depth, 2);
    assert_eq!(expansion.levels[0].as_deref(), Some("Revenue"));
    assert_eq!(expansion.levels[1].as_deref(), Some("Sales"));
    // Expansion inherits the base row's statement slot.
    assert_eq!(expansion.position.as_deref(), Some("3"));
}

#[test]
fn expansion_stops_at_full_depth() {
    let store = MemoryStore::new();
    // Five-level chain: the leaf has no room left for an expansion.
    let mut parent = None;
    for (id, name) in [(1, "A"), (2, "B"), (3, "C"), (4, "D"), (5, "E")] {
        let mut row = category(T1, id, name, parent);
        row.position = Some(format!("p{id}"));
        store.stage_dre_category(row);
        parent = Some(id);
    }
    {
        // Attach a link to the full-depth leaf.
        let mut leaf = dre_category(T1, 6, "F", "p6", vec![(777, "Blocked")]);
        leaf.parent_id = Some(EntityId::new(5));
        store.stage_dre_category(leaf);
    }

    load(&store, &TenantFilter::All).unwrap();

    // Base row for the leaf exists (depth clamped to 5)...
    let base = store.dre_category(T1, EntityId::new(6), NO_ENTITY).unwrap();
    assert_eq!(base.depth, 5);
    // ...but no expansion row was written.
    assert!(store
        .dre_category(T1, EntityId::new(6), EntityId::new(777))
        .is_none());
    assert_eq!(store.dre_category_count(T1), 6);
}

#[test]
fn rerun_is_idempotent() {
    let store = MemoryStore::new();
    store.stage_dre_category(dre_category(T1, 100, "Revenue", "3", vec![(777, "Sales")]));

    let first = load(&store, &TenantFilter::All).unwrap();
    let second = load(&store, &TenantFilter::All).unwrap();
    assert_eq!(first, second);
    assert_eq!(store.dre_category_count(T1), 2);
}
