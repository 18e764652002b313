//! Staging row builders shared by the loader tests.

use chrono::{DateTime, TimeZone, Utc};
use lf_core::{
    CredentialId, EntityId, FinancialLink, LedgerAllocation, LedgerDirection, StagingBalance,
    StagingCategory, StagingContract, StagingCostCenter, StagingLedgerDocument,
    StagingLedgerInstallment, StagingPerson, StagingSale, TenantId,
};

pub(crate) const T1: TenantId = TenantId::new(1);
pub(crate) const T2: TenantId = TenantId::new(2);
pub(crate) const CRED: CredentialId = CredentialId::new(10);

pub(crate) fn collected() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub(crate) fn category(tenant: TenantId, id: i64, name: &str, parent: Option<i64>) -> StagingCategory {
    StagingCategory {
        tenant,
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

pub(crate) fn dre_category(
    tenant: TenantId,
    id: i64,
    name: &str,
    position: &str,
    links: Vec<(i64, &str)>,
) -> StagingCategory {
    let mut row = category(tenant, id, name, None);
    row.position = Some(position.to_string());
    row.financial_links = links
        .into_iter()
        .map(|(link_id, link_name)| FinancialLink {
            id: EntityId::new(link_id),
            name: link_name.to_string(),
        })
        .collect();
    row
}

pub(crate) fn person(tenant: TenantId, id: i64, name: Option<&str>) -> StagingPerson {
    StagingPerson {
        tenant,
        credential: CRED,
        person_id: EntityId::new(id),
        name: name.map(String::from),
        document: None,
        email: None,
        roles: vec!["customer".to_string()],
        address: None,
        collected_at: Some(collected()),
        extra: serde_json::Map::new(),
    }
}

pub(crate) fn cost_center(tenant: TenantId, id: i64, name: Option<&str>) -> StagingCostCenter {
    StagingCostCenter {
        tenant,
        credential: CRED,
        cost_center_id: EntityId::new(id),
        code: Some(format!("CC-{id}")),
        name: name.map(String::from),
        inactive: false,
        collected_at: Some(collected()),
        extra: serde_json::Map::new(),
    }
}

pub(crate) fn installment(id: i64, total: f64, allocations: Vec<LedgerAllocation>) -> StagingLedgerInstallment {
    StagingLedgerInstallment {
        installment_id: EntityId::new(id),
        due_date: chrono::NaiveDate::from_ymd_opt(2024, 4, 1),
        total,
        paid_amount: 0.0,
        status: Some("open".to_string()),
        allocations,
    }
}

pub(crate) fn ledger_document(
    tenant: TenantId,
    id: i64,
    direction: LedgerDirection,
    installments: Vec<StagingLedgerInstallment>,
) -> StagingLedgerDocument {
    StagingLedgerDocument {
        tenant,
        credential: CRED,
        document_id: EntityId::new(id),
        direction,
        person_id: None,
        description: Some("invoice".to_string()),
        status: Some("open".to_string()),
        issue_date: chrono::NaiveDate::from_ymd_opt(2024, 3, 1),
        due_date: chrono::NaiveDate::from_ymd_opt(2024, 4, 1),
        total: installments.iter().map(|i| i.total).sum(),
        installments,
        collected_at: Some(collected()),
        extra: serde_json::Map::new(),
    }
}

pub(crate) fn sale(tenant: TenantId, id: i64) -> StagingSale {
    StagingSale {
        tenant,
        credential: CRED,
        sale_id: EntityId::new(id),
        person_id: Some(EntityId::new(500)),
        category_id: None,
        cost_center_id: None,
        payment_account_id: None,
        sale_date: chrono::NaiveDate::from_ymd_opt(2024, 5, 10),
        status: Some("closed".to_string()),
        total: 90.0,
        items: Vec::new(),
        collected_at: Some(collected()),
        extra: serde_json::Map::new(),
    }
}

pub(crate) fn contract(tenant: TenantId, id: i64) -> StagingContract {
    StagingContract {
        tenant,
        credential: CRED,
        contract_id: EntityId::new(id),
        number: Some(format!("CT-{id}")),
        person_id: None,
        status: Some("active".to_string()),
        starts_on: chrono::NaiveDate::from_ymd_opt(2024, 1, 1),
        ends_on: None,
        monthly_value: 500.0,
        total_value: 6000.0,
        collected_at: Some(collected()),
        extra: serde_json::Map::new(),
    }
}

pub(crate) fn balance(tenant: TenantId, account: i64, amount: f64, at: DateTime<Utc>) -> StagingBalance {
    StagingBalance {
        tenant,
        credential: CRED,
        account_id: EntityId::new(account),
        account_name: Some("Checking".to_string()),
        balance: amount,
        collected_at: at,
        extra: serde_json::Map::new(),
    }
}
