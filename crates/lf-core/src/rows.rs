//! Warehouse row types.
//!
//! These are the shapes loaders hand to the writer traits and the store
//! hands back to the integrity checker. Every row carries its tenant id;
//! natural keys never use surrogates.

use crate::ids::{EntityId, TenantId};
use crate::staging::LedgerDirection;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel entity id for "not allocated" key components.
///
/// Upsert keys must be non-null, so unallocated category/cost-center slots
/// in the ledger fact and the base (non-expanded) DRE row use id 0, which
/// the upstream API never issues.
pub const NO_ENTITY: EntityId = EntityId::new(0);

/// One row of `dw.dim_category`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub tenant: TenantId,
    pub category_id: EntityId,
    pub name: String,
    pub external_code: Option<String>,
    pub levels: [Option<String>; 5],
    pub depth: u8,
}

/// One row of `dw.dim_category_dre`.
///
/// `expansion_id` is [`NO_ENTITY`] for the base row and the linked
/// financial category's id for a synthetic expansion row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDreRow {
    pub tenant: TenantId,
    pub category_id: EntityId,
    pub expansion_id: EntityId,
    pub name: String,
    pub external_code: Option<String>,
    pub position: Option<String>,
    pub levels: [Option<String>; 5],
    pub depth: u8,
}

/// One row of `dw.dre_totalizer`: a structural position whose row is a
/// subtotal/total, not a leaf category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalizerRow {
    pub tenant: TenantId,
    pub position: String,
}

/// One row of `dw.dre_totalizer_peer`: a non-totalizer category sharing a
/// totalizer's position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalizerPeerRow {
    pub tenant: TenantId,
    pub position: String,
    pub category_id: EntityId,
}

/// One row of `dw.dim_person`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRow {
    pub tenant: TenantId,
    pub person_id: EntityId,
    pub name: String,
    pub document: Option<String>,
    /// First of the upstream role tags, e.g. "customer".
    pub kind: Option<String>,
    pub email: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

/// One row of `dw.dim_cost_center`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostCenterRow {
    pub tenant: TenantId,
    pub cost_center_id: EntityId,
    pub code: Option<String>,
    pub name: String,
    pub inactive: bool,
}

/// One row of `dw.fact_ledger_entry`.
///
/// Unified payable+receivable fact; one row per (document, installment,
/// category, cost center) allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntryRow {
    pub tenant: TenantId,
    pub document_id: EntityId,
    pub installment_id: EntityId,
    pub category_id: EntityId,
    pub cost_center_id: EntityId,
    pub direction: LedgerDirection,
    pub person_id: Option<EntityId>,
    pub description: Option<String>,
    pub allocated_amount: f64,
    pub installment_total: f64,
    pub paid_amount: f64,
    pub unpaid_amount: f64,
    pub status: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    /// Downstream enrichment cache flag; cleared when a core field changes.
    pub detailed: bool,
    pub detailed_at: Option<DateTime<Utc>>,
}

impl LedgerEntryRow {
    /// Whether any core field differs from `stored`.
    ///
    /// Core fields are the ones downstream enrichment derives from; a change
    /// in any of them must flip `detailed` back to false on upsert. Changes
    /// to anything else preserve completed enrichment work.
    pub fn core_fields_differ(&self, stored: &LedgerEntryRow) -> bool {
        self.description != stored.description
            || self.installment_total != stored.installment_total
            || self.due_date != stored.due_date
            || self.status != stored.status
            || self.person_id != stored.person_id
    }
}

/// One row of `dw.fact_sale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRow {
    pub tenant: TenantId,
    pub sale_id: EntityId,
    pub person_id: Option<EntityId>,
    pub category_id: Option<EntityId>,
    pub cost_center_id: Option<EntityId>,
    pub payment_account_id: Option<EntityId>,
    pub sale_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub total: f64,
}

/// One row of `dw.fact_sale_item`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItemRow {
    pub tenant: TenantId,
    pub sale_id: EntityId,
    pub line_number: u32,
    pub product_id: Option<EntityId>,
    pub description: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
    pub line_total: f64,
}

/// One row of `dw.fact_contract`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRow {
    pub tenant: TenantId,
    pub contract_id: EntityId,
    pub number: Option<String>,
    pub person_id: Option<EntityId>,
    pub status: Option<String>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub monthly_value: f64,
    pub total_value: f64,
}

/// One row of `dw.fact_account_balance` (append-only time series).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceRow {
    pub tenant: TenantId,
    pub account_id: EntityId,
    pub account_name: Option<String>,
    pub balance: f64,
    pub collected_at: DateTime<Utc>,
}

#[cfg(test)]
#[path = "rows_test.rs"]
mod tests;
