use super::*;
use crate::testutil::{category, dre_category, ledger_document, sale, T1, T2};
use lf_core::{EntityId, RunStatus};
use lf_store::MemoryStore;

fn position_of(steps: &[Step], step: Step) -> usize {
    steps.iter().position(|s| *s == step).unwrap()
}

#[test]
fn dag_orders_dependencies_before_dependents() {
    let steps = StepDag::build().ordered_steps();
    assert_eq!(steps.len(), 10);

    let calendar = position_of(&steps, Step::Calendar);
    let dre = position_of(&steps, Step::Dimension(DimensionKind::CategoryDre));
    let totalizer = position_of(&steps, Step::Totalizer);

    for kind in DimensionKind::all() {
        assert!(calendar < position_of(&steps, Step::Dimension(kind)));
    }
    assert!(dre < totalizer);
    for kind in FactKind::all() {
        let fact = position_of(&steps, Step::Fact(kind));
        assert!(totalizer < fact);
        for dim in DimensionKind::all() {
            assert!(position_of(&steps, Step::Dimension(dim)) < fact);
        }
    }
}

#[test]
fn step_names_match_their_loaders() {
    assert_eq!(Step::Calendar.to_string(), "dim:calendar");
    assert_eq!(Step::Dimension(DimensionKind::Category).to_string(), "dim:category");
    assert_eq!(Step::Totalizer.to_string(), "dre:totalizer");
    assert_eq!(Step::Fact(FactKind::Ledger).to_string(), "fact:ledger");
}

#[test]
fn full_run_loads_every_step_and_reports_completed() {
    let store = MemoryStore::new();
    store.add_tenant(T1);
    store.stage_category(category(T1, 1, "Expenses", None));
    store.stage_dre_category(dre_category(T1, 10, "Revenue", "3.1", vec![(90, "Sales")]));
    store.stage_sale(sale(T1, 300));
    store.stage_ledger_document(ledger_document(
        T1,
        100,
        lf_core::LedgerDirection::Payable,
        vec![crate::testutil::installment(1, 50.0, Vec::new())],
    ));

    let report = run_pipeline(&store, None).unwrap();

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(report.steps.len(), 10);
    assert!(report.finished_at.is_some());
    assert_eq!(report.summary().failed, 0);

    assert!(store.category(T1, EntityId::new(1)).is_some());
    assert!(store.sale(T1, EntityId::new(300)).is_some());
    assert_eq!(store.ledger_entries(T1).len(), 1);
    assert!(store.calendar_len() > 0);
}

#[test]
fn tenant_scoped_run_leaves_other_tenants_alone() {
    let store = MemoryStore::new();
    store.add_tenant(T1);
    store.add_tenant(T2);
    store.stage_category(category(T1, 1, "Expenses", None));
    store.stage_category(category(T2, 1, "Expenses", None));

    let report = run_pipeline(&store, Some(T1)).unwrap();

    assert_eq!(report.tenant, Some(T1));
    assert!(store.category(T1, EntityId::new(1)).is_some());
    assert!(store.category(T2, EntityId::new(1)).is_none());
}

#[test]
fn unknown_tenant_fails_before_any_step_runs() {
    let store = MemoryStore::new();
    store.add_tenant(T1);
    store.stage_category(category(T1, 1, "Expenses", None));

    let err = run_pipeline(&store, Some(T2)).unwrap_err();
    assert!(matches!(err, EtlError::UnknownTenant(t) if t == T2));

    // Nothing loaded, not even the calendar.
    assert!(store.category(T1, EntityId::new(1)).is_none());
    assert_eq!(store.calendar_len(), 0);
}

#[test]
fn empty_warehouse_still_completes() {
    let store = MemoryStore::new();
    let report = run_pipeline(&store, None).unwrap();
    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(report.summary().rows_upserted, store.calendar_len());
}
