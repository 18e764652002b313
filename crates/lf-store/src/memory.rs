//! In-memory warehouse fake.
//!
//! Implements every gateway trait over plain maps so loader tests run
//! without a DuckDB file. Semantics mirror the real store, including the
//! ledger enrichment-invalidation rule and watermark monotonicity.

use crate::error::StoreResult;
use crate::filter::TenantFilter;
use crate::traits::{
    CalendarStore, DimensionReader, DimensionWriter, FactWriter, Finding, LedgerUpsert,
    LoadControlStore, MaintenanceStore, StagingReader, TenantRegistry,
};
use chrono::{DateTime, Utc};
use lf_core::{
    next_watermark, BalanceRow, CalendarDay, CategoryDreRow, CategoryRow, ContractRow,
    CostCenterRow, CredentialId, DimensionKind, EntityId, LedgerDirection, LedgerEntryRow,
    LoadControlKey, LoadControlState, PersonRow, SaleItemRow, SaleRow, StagingBalance,
    StagingCategory, StagingContract, StagingCostCenter, StagingLedgerDocument, StagingPerson,
    StagingSale, TenantId, TotalizerPeerRow, TotalizerRow, NO_ENTITY,
};
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    tenants: Vec<TenantId>,
    credentials: Vec<(TenantId, CredentialId)>,

    staged_categories: Vec<StagingCategory>,
    staged_dre_categories: Vec<StagingCategory>,
    staged_people: Vec<StagingPerson>,
    staged_cost_centers: Vec<StagingCostCenter>,
    staged_ledger_documents: Vec<StagingLedgerDocument>,
    staged_sales: Vec<StagingSale>,
    staged_contracts: Vec<StagingContract>,
    staged_balances: Vec<StagingBalance>,

    categories: BTreeMap<(i64, i64), CategoryRow>,
    dre_categories: BTreeMap<(i64, i64, i64), CategoryDreRow>,
    people: BTreeMap<(i64, i64), PersonRow>,
    cost_centers: BTreeMap<(i64, i64), CostCenterRow>,
    totalizers: Vec<TotalizerRow>,
    totalizer_peers: Vec<TotalizerPeerRow>,

    ledger_entries: BTreeMap<(i64, i64, i64, i64, i64), LedgerEntryRow>,
    sales: BTreeMap<(i64, i64), SaleRow>,
    sale_items: BTreeMap<(i64, i64, u32), SaleItemRow>,
    contracts: BTreeMap<(i64, i64), ContractRow>,
    balances: Vec<BalanceRow>,

    load_control: BTreeMap<(i64, i64, &'static str), LoadControlState>,
    calendar: Vec<CalendarDay>,
}

/// Thread-safe in-memory warehouse.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned fake means a test already panicked; propagating the
        // data anyway keeps the original failure visible.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn add_tenant(&self, tenant: TenantId) {
        let mut inner = self.lock();
        if !inner.tenants.contains(&tenant) {
            inner.tenants.push(tenant);
        }
    }

    pub fn add_credential(&self, tenant: TenantId, credential: CredentialId) {
        self.add_tenant(tenant);
        let mut inner = self.lock();
        if !inner.credentials.contains(&(tenant, credential)) {
            inner.credentials.push((tenant, credential));
        }
    }

    pub fn stage_category(&self, row: StagingCategory) {
        self.lock().staged_categories.push(row);
    }

    pub fn stage_dre_category(&self, row: StagingCategory) {
        self.lock().staged_dre_categories.push(row);
    }

    pub fn stage_person(&self, row: StagingPerson) {
        self.lock().staged_people.push(row);
    }

    pub fn stage_cost_center(&self, row: StagingCostCenter) {
        self.lock().staged_cost_centers.push(row);
    }

    pub fn stage_ledger_document(&self, row: StagingLedgerDocument) {
        self.lock().staged_ledger_documents.push(row);
    }

    pub fn stage_sale(&self, row: StagingSale) {
        self.lock().staged_sales.push(row);
    }

    pub fn stage_contract(&self, row: StagingContract) {
        self.lock().staged_contracts.push(row);
    }

    pub fn stage_balance(&self, row: StagingBalance) {
        self.lock().staged_balances.push(row);
    }

    // Inspection accessors for assertions.

    pub fn category(&self, tenant: TenantId, id: EntityId) -> Option<CategoryRow> {
        self.lock().categories.get(&(tenant.raw(), id.raw())).cloned()
    }

    pub fn dre_category(
        &self,
        tenant: TenantId,
        id: EntityId,
        expansion: EntityId,
    ) -> Option<CategoryDreRow> {
        self.lock()
            .dre_categories
            .get(&(tenant.raw(), id.raw(), expansion.raw()))
            .cloned()
    }

    pub fn dre_category_count(&self, tenant: TenantId) -> usize {
        self.lock()
            .dre_categories
            .values()
            .filter(|r| r.tenant == tenant)
            .count()
    }

    pub fn person(&self, tenant: TenantId, id: EntityId) -> Option<PersonRow> {
        self.lock().people.get(&(tenant.raw(), id.raw())).cloned()
    }

    pub fn cost_center(&self, tenant: TenantId, id: EntityId) -> Option<CostCenterRow> {
        self.lock()
            .cost_centers
            .get(&(tenant.raw(), id.raw()))
            .cloned()
    }

    pub fn totalizers(&self, tenant: TenantId) -> Vec<TotalizerRow> {
        self.lock()
            .totalizers
            .iter()
            .filter(|r| r.tenant == tenant)
            .cloned()
            .collect()
    }

    pub fn totalizer_peers(&self, tenant: TenantId) -> Vec<TotalizerPeerRow> {
        self.lock()
            .totalizer_peers
            .iter()
            .filter(|r| r.tenant == tenant)
            .cloned()
            .collect()
    }

    pub fn ledger_entries(&self, tenant: TenantId) -> Vec<LedgerEntryRow> {
        self.lock()
            .ledger_entries
            .values()
            .filter(|r| r.tenant == tenant)
            .cloned()
            .collect()
    }

    /// Flag every entry of a document as enriched, as the detailing worker
    /// would after fetching the line breakdown.
    pub fn mark_ledger_detailed(&self, tenant: TenantId, document: EntityId) {
        let mut inner = self.lock();
        for row in inner.ledger_entries.values_mut() {
            if row.tenant == tenant && row.document_id == document {
                row.detailed = true;
                row.detailed_at = Some(Utc::now());
            }
        }
    }

    pub fn sale(&self, tenant: TenantId, id: EntityId) -> Option<SaleRow> {
        self.lock().sales.get(&(tenant.raw(), id.raw())).cloned()
    }

    pub fn sale_items(&self, tenant: TenantId, sale: EntityId) -> Vec<SaleItemRow> {
        self.lock()
            .sale_items
            .values()
            .filter(|r| r.tenant == tenant && r.sale_id == sale)
            .cloned()
            .collect()
    }

    pub fn contract(&self, tenant: TenantId, id: EntityId) -> Option<ContractRow> {
        self.lock().contracts.get(&(tenant.raw(), id.raw())).cloned()
    }

    pub fn balances(&self, tenant: TenantId) -> Vec<BalanceRow> {
        self.lock()
            .balances
            .iter()
            .filter(|r| r.tenant == tenant)
            .cloned()
            .collect()
    }

    pub fn calendar_len(&self) -> usize {
        self.lock().calendar.len()
    }
}

impl TenantRegistry for MemoryStore {
    fn tenants(&self) -> StoreResult<Vec<TenantId>> {
        Ok(self.lock().tenants.clone())
    }

    fn tenant_exists(&self, tenant: TenantId) -> StoreResult<bool> {
        Ok(self.lock().tenants.contains(&tenant))
    }

    fn credentials(&self, tenant: TenantId) -> StoreResult<Vec<CredentialId>> {
        Ok(self
            .lock()
            .credentials
            .iter()
            .filter(|(t, _)| *t == tenant)
            .map(|(_, c)| *c)
            .collect())
    }
}

fn scoped<T: Clone>(rows: &[T], filter: &TenantFilter, tenant_of: impl Fn(&T) -> TenantId) -> Vec<T> {
    rows.iter()
        .filter(|r| filter.matches(tenant_of(r)))
        .cloned()
        .collect()
}

impl StagingReader for MemoryStore {
    fn categories(&self, filter: &TenantFilter) -> StoreResult<Vec<StagingCategory>> {
        Ok(scoped(&self.lock().staged_categories, filter, |r| r.tenant))
    }

    fn dre_categories(&self, filter: &TenantFilter) -> StoreResult<Vec<StagingCategory>> {
        Ok(scoped(&self.lock().staged_dre_categories, filter, |r| {
            r.tenant
        }))
    }

    fn people(&self, filter: &TenantFilter) -> StoreResult<Vec<StagingPerson>> {
        Ok(scoped(&self.lock().staged_people, filter, |r| r.tenant))
    }

    fn cost_centers(&self, filter: &TenantFilter) -> StoreResult<Vec<StagingCostCenter>> {
        Ok(scoped(&self.lock().staged_cost_centers, filter, |r| {
            r.tenant
        }))
    }

    fn ledger_documents(
        &self,
        filter: &TenantFilter,
        direction: LedgerDirection,
    ) -> StoreResult<Vec<StagingLedgerDocument>> {
        Ok(self
            .lock()
            .staged_ledger_documents
            .iter()
            .filter(|r| filter.matches(r.tenant) && r.direction == direction)
            .cloned()
            .collect())
    }

    fn sales(&self, filter: &TenantFilter) -> StoreResult<Vec<StagingSale>> {
        Ok(scoped(&self.lock().staged_sales, filter, |r| r.tenant))
    }

    fn contracts(&self, filter: &TenantFilter) -> StoreResult<Vec<StagingContract>> {
        Ok(scoped(&self.lock().staged_contracts, filter, |r| r.tenant))
    }

    fn balance_history(&self, filter: &TenantFilter) -> StoreResult<Vec<StagingBalance>> {
        Ok(scoped(&self.lock().staged_balances, filter, |r| r.tenant))
    }
}

impl DimensionWriter for MemoryStore {
    fn upsert_category(&self, row: &CategoryRow) -> StoreResult<()> {
        self.lock()
            .categories
            .insert((row.tenant.raw(), row.category_id.raw()), row.clone());
        Ok(())
    }

    fn upsert_category_dre(&self, row: &CategoryDreRow) -> StoreResult<()> {
        self.lock().dre_categories.insert(
            (row.tenant.raw(), row.category_id.raw(), row.expansion_id.raw()),
            row.clone(),
        );
        Ok(())
    }

    fn upsert_person(&self, row: &PersonRow) -> StoreResult<()> {
        self.lock()
            .people
            .insert((row.tenant.raw(), row.person_id.raw()), row.clone());
        Ok(())
    }

    fn upsert_cost_center(&self, row: &CostCenterRow) -> StoreResult<()> {
        self.lock()
            .cost_centers
            .insert((row.tenant.raw(), row.cost_center_id.raw()), row.clone());
        Ok(())
    }

    fn replace_totalizers(
        &self,
        filter: &TenantFilter,
        totalizers: &[TotalizerRow],
        peers: &[TotalizerPeerRow],
    ) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.totalizers.retain(|r| !filter.matches(r.tenant));
        inner.totalizer_peers.retain(|r| !filter.matches(r.tenant));
        inner.totalizers.extend_from_slice(totalizers);
        inner.totalizer_peers.extend_from_slice(peers);
        Ok(())
    }
}

impl DimensionReader for MemoryStore {
    fn dimension_keys(
        &self,
        tenant: TenantId,
        dimension: DimensionKind,
    ) -> StoreResult<HashSet<EntityId>> {
        let inner = self.lock();
        let keys = match dimension {
            DimensionKind::Category => inner
                .categories
                .values()
                .filter(|r| r.tenant == tenant)
                .map(|r| r.category_id)
                .collect(),
            DimensionKind::CategoryDre => inner
                .dre_categories
                .values()
                .filter(|r| r.tenant == tenant)
                .map(|r| r.category_id)
                .collect(),
            DimensionKind::Person => inner
                .people
                .values()
                .filter(|r| r.tenant == tenant)
                .map(|r| r.person_id)
                .collect(),
            DimensionKind::CostCenter => inner
                .cost_centers
                .values()
                .filter(|r| r.tenant == tenant)
                .map(|r| r.cost_center_id)
                .collect(),
        };
        Ok(keys)
    }
}

impl FactWriter for MemoryStore {
    fn upsert_ledger_entry(&self, row: &LedgerEntryRow) -> StoreResult<LedgerUpsert> {
        let key = (
            row.tenant.raw(),
            row.document_id.raw(),
            row.installment_id.raw(),
            row.category_id.raw(),
            row.cost_center_id.raw(),
        );
        let mut inner = self.lock();
        let (outcome, detailed, detailed_at) = match inner.ledger_entries.get(&key) {
            None => (LedgerUpsert::Inserted, false, None),
            Some(stored) if row.core_fields_differ(stored) => {
                (LedgerUpsert::CoreChanged, false, None)
            }
            Some(stored) => (LedgerUpsert::Preserved, stored.detailed, stored.detailed_at),
        };
        let mut stored = row.clone();
        stored.detailed = detailed;
        stored.detailed_at = detailed_at;
        inner.ledger_entries.insert(key, stored);
        Ok(outcome)
    }

    fn get_ledger_entry(
        &self,
        tenant: TenantId,
        document_id: EntityId,
        installment_id: EntityId,
        category_id: EntityId,
        cost_center_id: EntityId,
    ) -> StoreResult<Option<LedgerEntryRow>> {
        Ok(self
            .lock()
            .ledger_entries
            .get(&(
                tenant.raw(),
                document_id.raw(),
                installment_id.raw(),
                category_id.raw(),
                cost_center_id.raw(),
            ))
            .cloned())
    }

    fn upsert_sale(&self, row: &SaleRow) -> StoreResult<()> {
        self.lock()
            .sales
            .insert((row.tenant.raw(), row.sale_id.raw()), row.clone());
        Ok(())
    }

    fn upsert_sale_item(&self, row: &SaleItemRow) -> StoreResult<()> {
        self.lock().sale_items.insert(
            (row.tenant.raw(), row.sale_id.raw(), row.line_number),
            row.clone(),
        );
        Ok(())
    }

    fn upsert_contract(&self, row: &ContractRow) -> StoreResult<()> {
        self.lock()
            .contracts
            .insert((row.tenant.raw(), row.contract_id.raw()), row.clone());
        Ok(())
    }

    fn replace_balances(&self, filter: &TenantFilter, rows: &[BalanceRow]) -> StoreResult<usize> {
        let mut inner = self.lock();
        inner.balances.retain(|r| !filter.matches(r.tenant));
        inner.balances.extend_from_slice(rows);
        Ok(rows.len())
    }
}

impl LoadControlStore for MemoryStore {
    fn get(&self, key: &LoadControlKey) -> StoreResult<LoadControlState> {
        Ok(self
            .lock()
            .load_control
            .get(&(key.tenant.raw(), key.credential.raw(), key.entity.as_str()))
            .cloned()
            .unwrap_or_default())
    }

    fn mark_full_done(&self, key: &LoadControlKey) -> StoreResult<()> {
        let mut inner = self.lock();
        let state = inner
            .load_control
            .entry((key.tenant.raw(), key.credential.raw(), key.entity.as_str()))
            .or_default();
        state.full_load_done = true;
        state.last_full_load_at = Some(Utc::now());
        Ok(())
    }

    fn mark_incremental(
        &self,
        key: &LoadControlKey,
        watermark: Option<DateTime<Utc>>,
    ) -> StoreResult<()> {
        let now = Utc::now();
        let mut inner = self.lock();
        let state = inner
            .load_control
            .entry((key.tenant.raw(), key.credential.raw(), key.entity.as_str()))
            .or_default();
        state.last_incremental_load_at = Some(now);
        state.last_processed_watermark =
            Some(next_watermark(state.last_processed_watermark, watermark, now));
        Ok(())
    }
}

impl CalendarStore for MemoryStore {
    fn calendar_is_populated(&self) -> StoreResult<bool> {
        Ok(!self.lock().calendar.is_empty())
    }

    fn insert_calendar(&self, days: &[CalendarDay]) -> StoreResult<usize> {
        let mut inner = self.lock();
        inner.calendar.extend_from_slice(days);
        Ok(days.len())
    }
}

impl MaintenanceStore for MemoryStore {
    fn unresolved_fk_findings(&self, filter: &TenantFilter) -> StoreResult<Vec<Finding>> {
        let inner = self.lock();
        let mut findings = Vec::new();

        // Count per (tenant, probe), matching the SQL store's grouping.
        let mut push = |table: &str, reason: &str, unresolved: Vec<TenantId>| {
            let mut by_tenant: BTreeMap<i64, usize> = BTreeMap::new();
            for tenant in unresolved {
                *by_tenant.entry(tenant.raw()).or_default() += 1;
            }
            for (tenant, rows) in by_tenant {
                findings.push(Finding {
                    tenant: TenantId::new(tenant),
                    table: table.to_string(),
                    reason: reason.to_string(),
                    rows,
                });
            }
        };

        let has_category = |tenant: TenantId, id: EntityId| {
            inner.categories.contains_key(&(tenant.raw(), id.raw()))
        };
        let has_person =
            |tenant: TenantId, id: EntityId| inner.people.contains_key(&(tenant.raw(), id.raw()));
        let has_cost_center = |tenant: TenantId, id: EntityId| {
            inner.cost_centers.contains_key(&(tenant.raw(), id.raw()))
        };

        let ledger: Vec<&LedgerEntryRow> = inner
            .ledger_entries
            .values()
            .filter(|r| filter.matches(r.tenant))
            .collect();
        push(
            "dw.fact_ledger_entry",
            "category_id has no dim_category row",
            ledger
                .iter()
                .filter(|r| r.category_id != NO_ENTITY && !has_category(r.tenant, r.category_id))
                .map(|r| r.tenant)
                .collect(),
        );
        push(
            "dw.fact_ledger_entry",
            "cost_center_id has no dim_cost_center row",
            ledger
                .iter()
                .filter(|r| {
                    r.cost_center_id != NO_ENTITY && !has_cost_center(r.tenant, r.cost_center_id)
                })
                .map(|r| r.tenant)
                .collect(),
        );
        push(
            "dw.fact_ledger_entry",
            "person_id has no dim_person row",
            ledger
                .iter()
                .filter(|r| matches!(r.person_id, Some(p) if !has_person(r.tenant, p)))
                .map(|r| r.tenant)
                .collect(),
        );

        let sales: Vec<&SaleRow> = inner
            .sales
            .values()
            .filter(|r| filter.matches(r.tenant))
            .collect();
        push(
            "dw.fact_sale",
            "person_id has no dim_person row",
            sales
                .iter()
                .filter(|r| matches!(r.person_id, Some(p) if !has_person(r.tenant, p)))
                .map(|r| r.tenant)
                .collect(),
        );
        push(
            "dw.fact_sale",
            "category_id has no dim_category row",
            sales
                .iter()
                .filter(|r| matches!(r.category_id, Some(c) if !has_category(r.tenant, c)))
                .map(|r| r.tenant)
                .collect(),
        );
        push(
            "dw.fact_sale",
            "cost_center_id has no dim_cost_center row",
            sales
                .iter()
                .filter(|r| matches!(r.cost_center_id, Some(c) if !has_cost_center(r.tenant, c)))
                .map(|r| r.tenant)
                .collect(),
        );

        push(
            "dw.fact_contract",
            "person_id has no dim_person row",
            inner
                .contracts
                .values()
                .filter(|r| filter.matches(r.tenant))
                .filter(|r| matches!(r.person_id, Some(p) if !has_person(r.tenant, p)))
                .map(|r| r.tenant)
                .collect(),
        );

        Ok(findings)
    }

    fn refresh_statistics(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
