use super::*;
use crate::testutil::{sale, T1, T2};
use lf_core::{EntityId, StagingSaleItem};
use lf_store::MemoryStore;

fn item(line_number: u32, quantity: f64, unit_price: f64) -> StagingSaleItem {
    StagingSaleItem {
        line_number,
        product_id: Some(EntityId::new(700)),
        description: Some("widget".into()),
        quantity,
        unit_price,
        line_total: quantity * unit_price,
    }
}

#[test]
fn sale_and_items_are_upserted_together() {
    let store = MemoryStore::new();
    let mut staged = sale(T1, 300);
    staged.items = vec![item(1, 2.0, 30.0), item(2, 1.0, 30.0)];
    store.stage_sale(staged);

    let stats = load(&store, &TenantFilter::All).unwrap();
    // One header row plus two lines.
    assert_eq!(stats.upserted, 3);

    let header = store.sale(T1, EntityId::new(300)).unwrap();
    assert_eq!(header.total, 90.0);
    assert_eq!(header.status.as_deref(), Some("closed"));

    let items = store.sale_items(T1, EntityId::new(300));
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].line_total, 60.0);
}

#[test]
fn rerun_is_idempotent() {
    let store = MemoryStore::new();
    let mut staged = sale(T1, 300);
    staged.items = vec![item(1, 2.0, 30.0)];
    store.stage_sale(staged);

    load(&store, &TenantFilter::All).unwrap();
    load(&store, &TenantFilter::All).unwrap();

    assert_eq!(store.sale_items(T1, EntityId::new(300)).len(), 1);
}

#[test]
fn optional_joins_pass_through_as_null() {
    let store = MemoryStore::new();
    let mut staged = sale(T1, 301);
    staged.person_id = None;
    staged.category_id = None;
    store.stage_sale(staged);

    load(&store, &TenantFilter::All).unwrap();

    let header = store.sale(T1, EntityId::new(301)).unwrap();
    assert_eq!(header.person_id, None);
    assert_eq!(header.category_id, None);
}

#[test]
fn tenant_filter_restricts_the_pass() {
    let store = MemoryStore::new();
    store.stage_sale(sale(T1, 300));
    store.stage_sale(sale(T2, 300));

    load(&store, &TenantFilter::One(T2)).unwrap();

    assert!(store.sale(T1, EntityId::new(300)).is_none());
    assert!(store.sale(T2, EntityId::new(300)).is_some());
}
