//! End-to-end pipeline runs against a real DuckDB warehouse.
//!
//! Staging is landed through the collector contract on `WarehouseDb`, then
//! the orchestrator loads the star schema and the integrity checker
//! inspects the result.

use chrono::{TimeZone, Utc};
use lf_core::{
    CredentialId, DimensionKind, EntityId, FinancialLink, LedgerAllocation, LedgerDirection,
    RunStatus, StagingCategory, StagingLedgerDocument, StagingLedgerInstallment, StagingPerson,
    StagingSale, TenantId, NO_ENTITY,
};
use lf_etl::{check_integrity, run_pipeline};
use lf_store::{DimensionReader, FactWriter, WarehouseDb};

const TENANT: TenantId = TenantId::new(1);
const CRED: CredentialId = CredentialId::new(10);

// ── Helpers ────────────────────────────────────────────────────────────

fn collected() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

fn category(id: i64, name: &str, parent: Option<i64>) -> StagingCategory {
    StagingCategory {
        tenant: TENANT,
        credential: CRED,
        category_id: EntityId::new(id),
        name: Some(name.to_string()),
        parent_id: parent.map(EntityId::new),
        external_code: None,
        position: None,
        subitem_count: 0,
        financial_links: Vec::new(),
        collected_at: Some(collected()),
        extra: serde_json::Map::new(),
    }
}

fn seed(db: &WarehouseDb) {
    db.add_tenant(TENANT, "acme").unwrap();
    db.add_credential(TENANT, CRED).unwrap();

    db.stage_category(&category(1, "Expenses", None), "plain").unwrap();
    db.stage_category(&category(2, "Rent", Some(1)), "plain").unwrap();

    let mut dre = category(30, "Revenue", None);
    dre.position = Some("3.1".to_string());
    dre.financial_links = vec![FinancialLink {
        id: EntityId::new(2),
        name: "Rent".to_string(),
    }];
    db.stage_category(&dre, "dre").unwrap();
    let mut totalizer = category(31, "Gross Result", None);
    totalizer.position = Some("3.0".to_string());
    db.stage_category(&totalizer, "dre").unwrap();

    db.stage_person(&StagingPerson {
        tenant: TENANT,
        credential: CRED,
        person_id: EntityId::new(500),
        name: Some("Ada".to_string()),
        document: None,
        email: None,
        roles: vec!["supplier".to_string()],
        address: None,
        collected_at: Some(collected()),
        extra: serde_json::Map::new(),
    })
    .unwrap();

    db.stage_ledger_document(&StagingLedgerDocument {
        tenant: TENANT,
        credential: CRED,
        document_id: EntityId::new(100),
        direction: LedgerDirection::Payable,
        person_id: Some(EntityId::new(500)),
        description: Some("March rent".to_string()),
        status: Some("open".to_string()),
        issue_date: chrono::NaiveDate::from_ymd_opt(2024, 3, 1),
        due_date: chrono::NaiveDate::from_ymd_opt(2024, 4, 1),
        total: 1200.0,
        installments: vec![StagingLedgerInstallment {
            installment_id: EntityId::new(1),
            due_date: chrono::NaiveDate::from_ymd_opt(2024, 4, 1),
            total: 1200.0,
            paid_amount: 200.0,
            status: Some("open".to_string()),
            allocations: vec![LedgerAllocation {
                category_id: Some(EntityId::new(2)),
                cost_center_id: None,
                amount: 1200.0,
            }],
        }],
        collected_at: Some(collected()),
        extra: serde_json::Map::new(),
    })
    .unwrap();

    db.stage_sale(&StagingSale {
        tenant: TENANT,
        credential: CRED,
        sale_id: EntityId::new(300),
        person_id: Some(EntityId::new(999)),
        category_id: None,
        cost_center_id: None,
        payment_account_id: None,
        sale_date: chrono::NaiveDate::from_ymd_opt(2024, 5, 10),
        status: Some("closed".to_string()),
        total: 90.0,
        items: Vec::new(),
        collected_at: Some(collected()),
        extra: serde_json::Map::new(),
    })
    .unwrap();
}

// ── Tests ──────────────────────────────────────────────────────────────

#[test]
fn full_run_builds_the_star_schema() {
    let db = WarehouseDb::open_memory().unwrap();
    seed(&db);

    let report = run_pipeline(&db, Some(TENANT)).unwrap();
    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(report.steps.len(), 10);

    let categories = db.dimension_keys(TENANT, DimensionKind::Category).unwrap();
    assert!(categories.contains(&EntityId::new(1)));
    assert!(categories.contains(&EntityId::new(2)));

    let entry = db
        .get_ledger_entry(
            TENANT,
            EntityId::new(100),
            EntityId::new(1),
            EntityId::new(2),
            NO_ENTITY,
        )
        .unwrap()
        .expect("ledger entry loaded");
    assert_eq!(entry.allocated_amount, 1200.0);
    assert_eq!(entry.unpaid_amount, 1000.0);
    assert!(!entry.detailed);
}

#[test]
fn rerun_over_unchanged_staging_is_idempotent() {
    let db = WarehouseDb::open_memory().unwrap();
    seed(&db);

    let first = run_pipeline(&db, Some(TENANT)).unwrap();
    let second = run_pipeline(&db, Some(TENANT)).unwrap();
    assert_eq!(first.status, RunStatus::Completed);
    assert_eq!(second.status, RunStatus::Completed);

    // The calendar only loads once.
    let calendar_step = |r: &lf_core::RunReport| {
        r.steps
            .iter()
            .find(|s| s.name == "dim:calendar")
            .unwrap()
            .stats
            .upserted
    };
    assert!(calendar_step(&first) > 0);
    assert_eq!(calendar_step(&second), 0);
}

#[test]
fn integrity_checker_sees_the_dangling_sale_person() {
    let db = WarehouseDb::open_memory().unwrap();
    seed(&db);
    run_pipeline(&db, Some(TENANT)).unwrap();

    // The seeded sale references person 999 which no staging row backs.
    let findings = check_integrity(&db, Some(TENANT)).unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].tenant, TENANT);
    assert_eq!(findings[0].table, "dw.fact_sale");
    assert_eq!(findings[0].reason, "person_id has no dim_person row");
    assert_eq!(findings[0].rows, 1);
}
