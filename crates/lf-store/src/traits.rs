//! Gateway traits between loaders and storage.
//!
//! Loaders are written against these seams so they can run over the DuckDB
//! warehouse or the in-memory [`crate::memory::MemoryStore`] fake
//! interchangeably. Every operation is tenant-scoped through
//! [`TenantFilter`] or an explicit tenant id.

use crate::error::StoreResult;
use crate::filter::TenantFilter;
use chrono::{DateTime, Utc};
use lf_core::{
    BalanceRow, CalendarDay, CategoryDreRow, CategoryRow, ContractRow, CostCenterRow,
    CredentialId, DimensionKind, EntityId, LedgerDirection, LedgerEntryRow, LoadControlKey,
    LoadControlState, PersonRow, SaleItemRow, SaleRow, StagingBalance, StagingCategory,
    StagingContract, StagingCostCenter, StagingLedgerDocument, StagingPerson, StagingSale,
    TenantId, TotalizerPeerRow, TotalizerRow,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Valid (tenant, credential) pairs, mirrored from the external registry.
///
/// An unknown tenant is an input error, never silently created.
pub trait TenantRegistry {
    fn tenants(&self) -> StoreResult<Vec<TenantId>>;
    fn tenant_exists(&self, tenant: TenantId) -> StoreResult<bool>;
    fn credentials(&self, tenant: TenantId) -> StoreResult<Vec<CredentialId>>;
}

/// Read access to the collector-owned staging tables.
pub trait StagingReader {
    /// Plain (cash-flow) category snapshots.
    fn categories(&self, filter: &TenantFilter) -> StoreResult<Vec<StagingCategory>>;

    /// DRE category snapshots, financial links attached.
    fn dre_categories(&self, filter: &TenantFilter) -> StoreResult<Vec<StagingCategory>>;

    fn people(&self, filter: &TenantFilter) -> StoreResult<Vec<StagingPerson>>;

    fn cost_centers(&self, filter: &TenantFilter) -> StoreResult<Vec<StagingCostCenter>>;

    /// Documents of one direction, installments and allocations attached.
    fn ledger_documents(
        &self,
        filter: &TenantFilter,
        direction: LedgerDirection,
    ) -> StoreResult<Vec<StagingLedgerDocument>>;

    /// Sales with line items attached.
    fn sales(&self, filter: &TenantFilter) -> StoreResult<Vec<StagingSale>>;

    fn contracts(&self, filter: &TenantFilter) -> StoreResult<Vec<StagingContract>>;

    /// Full retained balance history (the one entity staging never prunes).
    fn balance_history(&self, filter: &TenantFilter) -> StoreResult<Vec<StagingBalance>>;
}

/// Write access to the dimension tables.
///
/// Dimensions carry no cache flag; every derived column is overwritten
/// unconditionally on conflict.
pub trait DimensionWriter {
    fn upsert_category(&self, row: &CategoryRow) -> StoreResult<()>;
    fn upsert_category_dre(&self, row: &CategoryDreRow) -> StoreResult<()>;
    fn upsert_person(&self, row: &PersonRow) -> StoreResult<()>;
    fn upsert_cost_center(&self, row: &CostCenterRow) -> StoreResult<()>;

    /// Replace the totalizer mask and peer relation within `filter`'s scope.
    fn replace_totalizers(
        &self,
        filter: &TenantFilter,
        totalizers: &[TotalizerRow],
        peers: &[TotalizerPeerRow],
    ) -> StoreResult<()>;
}

/// Read access to dimension natural keys, used by fact loaders to flag
/// unresolved joins and by the integrity checker's store queries.
pub trait DimensionReader {
    fn dimension_keys(
        &self,
        tenant: TenantId,
        dimension: DimensionKind,
    ) -> StoreResult<HashSet<EntityId>>;
}

/// What an upsert did to a ledger fact row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerUpsert {
    /// No row existed; inserted with `detailed = false`.
    Inserted,
    /// A core field changed; row rewritten and `detailed` cleared.
    CoreChanged,
    /// Only non-core fields changed (or nothing); enrichment preserved.
    Preserved,
}

/// Write access to the fact tables.
pub trait FactWriter {
    /// Upsert one ledger allocation row, applying the enrichment
    /// invalidation rule (see [`LedgerEntryRow::core_fields_differ`]).
    fn upsert_ledger_entry(&self, row: &LedgerEntryRow) -> StoreResult<LedgerUpsert>;

    /// Read one ledger row back by natural key.
    fn get_ledger_entry(
        &self,
        tenant: TenantId,
        document_id: EntityId,
        installment_id: EntityId,
        category_id: EntityId,
        cost_center_id: EntityId,
    ) -> StoreResult<Option<LedgerEntryRow>>;

    fn upsert_sale(&self, row: &SaleRow) -> StoreResult<()>;
    fn upsert_sale_item(&self, row: &SaleItemRow) -> StoreResult<()>;
    fn upsert_contract(&self, row: &ContractRow) -> StoreResult<()>;

    /// Replace the balance time series within `filter`'s scope with `rows`.
    ///
    /// Returns the number of rows inserted. Staging retains full history for
    /// this entity, so the replace is correctness-preserving.
    fn replace_balances(&self, filter: &TenantFilter, rows: &[BalanceRow]) -> StoreResult<usize>;
}

/// Per-(tenant, credential, entity) load bookkeeping. Pure bookkeeping:
/// callers decide full vs. incremental strategy from `full_load_done`.
pub trait LoadControlStore {
    /// Never errors on absence; synthesizes the never-loaded default.
    fn get(&self, key: &LoadControlKey) -> StoreResult<LoadControlState>;

    /// Set `full_load_done` and refresh the full-load timestamp. Idempotent.
    fn mark_full_done(&self, key: &LoadControlKey) -> StoreResult<()>;

    /// Record an incremental pass; the stored watermark never regresses.
    fn mark_incremental(
        &self,
        key: &LoadControlKey,
        watermark: Option<DateTime<Utc>>,
    ) -> StoreResult<()>;
}

/// Calendar dimension storage (tenant-independent, written once).
pub trait CalendarStore {
    fn calendar_is_populated(&self) -> StoreResult<bool>;
    fn insert_calendar(&self, days: &[CalendarDay]) -> StoreResult<usize>;
}

/// One integrity finding: fact rows whose dimension join does not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub tenant: TenantId,
    /// Fact table the rows live in, e.g. `dw.fact_ledger_entry`.
    pub table: String,
    /// Which join failed, e.g. `category_id has no dim_category row`.
    pub reason: String,
    pub rows: usize,
}

/// Diagnostics and post-load maintenance.
pub trait MaintenanceStore {
    /// Count fact rows with unresolved dimension foreign keys, grouped by
    /// table and reason. Read-only.
    fn unresolved_fk_findings(&self, filter: &TenantFilter) -> StoreResult<Vec<Finding>>;

    /// Ask the engine to refresh optimizer statistics after bulk loads.
    fn refresh_statistics(&self) -> StoreResult<()>;
}

/// Everything the orchestrator needs, as one bound.
pub trait Warehouse:
    TenantRegistry
    + StagingReader
    + DimensionWriter
    + DimensionReader
    + FactWriter
    + LoadControlStore
    + CalendarStore
    + MaintenanceStore
{
}

impl<T> Warehouse for T where
    T: TenantRegistry
        + StagingReader
        + DimensionWriter
        + DimensionReader
        + FactWriter
        + LoadControlStore
        + CalendarStore
        + MaintenanceStore
{
}
