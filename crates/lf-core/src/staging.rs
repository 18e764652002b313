//! Typed staging rows.
//!
//! The external collector lands semi-structured snapshots; the warehouse
//! reads them through these envelopes: the scalar columns every loader
//! needs, promoted and typed, plus one opaque `extra` map for everything
//! the upstream payload carries that no loader reads. Fields a loader
//! requires are validated at load time (skip + warn), never coerced.

use crate::ids::{CredentialId, EntityId, TenantId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Nested address sub-object split out of the person payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

/// A financial category linked to a DRE category node.
///
/// Each link may become one synthetic leaf level in the flattened DRE
/// hierarchy when the output width allows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialLink {
    pub id: EntityId,
    pub name: String,
}

/// One staged category snapshot (plain or DRE family).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingCategory {
    pub tenant: TenantId,
    pub credential: CredentialId,
    pub category_id: EntityId,
    pub name: Option<String>,
    pub parent_id: Option<EntityId>,
    pub external_code: Option<String>,
    /// Structural position code; the stable identity of a DRE slot across periods.
    pub position: Option<String>,
    /// Number of sub-items declared in the upstream payload.
    pub subitem_count: u32,
    pub financial_links: Vec<FinancialLink>,
    pub collected_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub extra: Map<String, Value>,
}

/// One staged person (customer/supplier) snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingPerson {
    pub tenant: TenantId,
    pub credential: CredentialId,
    pub person_id: EntityId,
    pub name: Option<String>,
    pub document: Option<String>,
    pub email: Option<String>,
    /// Upstream role tags ("customer", "supplier", ...); the first one wins.
    pub roles: Vec<String>,
    pub address: Option<Address>,
    pub collected_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub extra: Map<String, Value>,
}

/// One staged cost center snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingCostCenter {
    pub tenant: TenantId,
    pub credential: CredentialId,
    pub cost_center_id: EntityId,
    pub code: Option<String>,
    pub name: Option<String>,
    pub inactive: bool,
    pub collected_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub extra: Map<String, Value>,
}

/// Whether a ledger document is money owed or money expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerDirection {
    Payable,
    Receivable,
}

impl LedgerDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            LedgerDirection::Payable => "payable",
            LedgerDirection::Receivable => "receivable",
        }
    }
}

impl fmt::Display for LedgerDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category/cost-center split of one installment's value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerAllocation {
    pub category_id: Option<EntityId>,
    pub cost_center_id: Option<EntityId>,
    pub amount: f64,
}

/// One installment of a staged payable/receivable document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingLedgerInstallment {
    pub installment_id: EntityId,
    pub due_date: Option<NaiveDate>,
    pub total: f64,
    pub paid_amount: f64,
    pub status: Option<String>,
    /// Empty means the whole installment is unallocated.
    pub allocations: Vec<LedgerAllocation>,
}

/// One staged payable or receivable document with its installments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingLedgerDocument {
    pub tenant: TenantId,
    pub credential: CredentialId,
    pub document_id: EntityId,
    pub direction: LedgerDirection,
    pub person_id: Option<EntityId>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub total: f64,
    pub installments: Vec<StagingLedgerInstallment>,
    pub collected_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub extra: Map<String, Value>,
}

/// One line item of a staged sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingSaleItem {
    pub line_number: u32,
    pub product_id: Option<EntityId>,
    pub description: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
    pub line_total: f64,
}

/// One staged sale snapshot with its line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingSale {
    pub tenant: TenantId,
    pub credential: CredentialId,
    pub sale_id: EntityId,
    pub person_id: Option<EntityId>,
    pub category_id: Option<EntityId>,
    pub cost_center_id: Option<EntityId>,
    pub payment_account_id: Option<EntityId>,
    pub sale_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub total: f64,
    pub items: Vec<StagingSaleItem>,
    pub collected_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub extra: Map<String, Value>,
}

/// One staged service/recurring contract snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingContract {
    pub tenant: TenantId,
    pub credential: CredentialId,
    pub contract_id: EntityId,
    pub number: Option<String>,
    pub person_id: Option<EntityId>,
    pub status: Option<String>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub monthly_value: f64,
    pub total_value: f64,
    pub collected_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub extra: Map<String, Value>,
}

/// One staged account-balance reading.
///
/// Staging retains the full history for this entity; `collected_at` is part
/// of the fact's natural key, making the fact an append-only time series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingBalance {
    pub tenant: TenantId,
    pub credential: CredentialId,
    pub account_id: EntityId,
    pub account_name: Option<String>,
    pub balance: f64,
    pub collected_at: DateTime<Utc>,
    #[serde(default)]
    pub extra: Map<String, Value>,
}
