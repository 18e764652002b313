//! Staging table reads.
//!
//! Child records (financial links, installments, allocations, sale items)
//! are fetched in one pass per table and attached in memory, keeping each
//! read at a fixed number of queries regardless of row count.

use crate::connection::WarehouseDb;
use crate::error::{StoreResult, StoreResultExt};
use crate::filter::TenantFilter;
use crate::row_helpers::{parse_date, parse_extra, parse_string_array, parse_timestamp};
use crate::traits::StagingReader;
use lf_core::{
    Address, CredentialId, EntityId, FinancialLink, LedgerAllocation, LedgerDirection,
    StagingBalance, StagingCategory, StagingContract, StagingCostCenter, StagingLedgerDocument,
    StagingLedgerInstallment, StagingPerson, StagingSale, StagingSaleItem, TenantId,
};
use std::collections::HashMap;

/// Key of one staged entity: (tenant, credential, id).
type StagedKey = (i64, i64, i64);

fn category_rows(
    db: &WarehouseDb,
    filter: &TenantFilter,
    family: &str,
) -> StoreResult<Vec<StagingCategory>> {
    let links = category_links(db, filter)?;

    let mut stmt = db
        .conn()
        .prepare(
            "SELECT tenant_id, credential_id, category_id, name, parent_id, external_code,
                    position, subitem_count, collected_at, extra
             FROM staging.categories
             WHERE family = ? AND (? IS NULL OR tenant_id = ?)
             ORDER BY tenant_id, credential_id, category_id",
        )
        .query_context("prepare staging categories")?;

    let tenant = filter.as_param();
    let rows = stmt
        .query_map(duckdb::params![family, tenant, tenant], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<i64>>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, Option<String>>(6)?,
                row.get::<_, i32>(7)?,
                row.get::<_, Option<String>>(8)?,
                row.get::<_, Option<String>>(9)?,
            ))
        })
        .query_context("query staging categories")?;

    rows.into_iter()
        .map(|row| {
            let (tenant, credential, id, name, parent, code, position, subitems, collected, extra) =
                row.query_context("row staging categories")?;
            Ok(StagingCategory {
                tenant: TenantId::new(tenant),
                credential: CredentialId::new(credential),
                category_id: EntityId::new(id),
                name,
                parent_id: parent.map(EntityId::new),
                external_code: code,
                position,
                subitem_count: subitems.max(0) as u32,
                financial_links: links
                    .get(&(tenant, credential, id))
                    .cloned()
                    .unwrap_or_default(),
                collected_at: parse_timestamp(collected)?,
                extra: parse_extra(extra),
            })
        })
        .collect()
}

fn category_links(
    db: &WarehouseDb,
    filter: &TenantFilter,
) -> StoreResult<HashMap<StagedKey, Vec<FinancialLink>>> {
    let mut stmt = db
        .conn()
        .prepare(
            "SELECT tenant_id, credential_id, category_id, link_id, link_name
             FROM staging.category_links
             WHERE (? IS NULL OR tenant_id = ?)
             ORDER BY link_id",
        )
        .query_context("prepare staging category_links")?;

    let tenant = filter.as_param();
    let rows = stmt
        .query_map(duckdb::params![tenant, tenant], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, String>(4)?,
            ))
        })
        .query_context("query staging category_links")?;

    let mut map: HashMap<StagedKey, Vec<FinancialLink>> = HashMap::new();
    for row in rows {
        let (tenant, credential, category, link_id, link_name) =
            row.query_context("row staging category_links")?;
        map.entry((tenant, credential, category))
            .or_default()
            .push(FinancialLink {
                id: EntityId::new(link_id),
                name: link_name,
            });
    }
    Ok(map)
}

fn installments(
    db: &WarehouseDb,
    filter: &TenantFilter,
    direction: LedgerDirection,
) -> StoreResult<HashMap<StagedKey, Vec<StagingLedgerInstallment>>> {
    let allocations = allocations(db, filter, direction)?;

    let mut stmt = db
        .conn()
        .prepare(
            "SELECT tenant_id, credential_id, document_id, installment_id, due_date,
                    total, paid_amount, status
             FROM staging.ledger_installments
             WHERE direction = ? AND (? IS NULL OR tenant_id = ?)
             ORDER BY installment_id",
        )
        .query_context("prepare staging ledger_installments")?;

    let tenant = filter.as_param();
    let rows = stmt
        .query_map(duckdb::params![direction.as_str(), tenant, tenant], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, f64>(5)?,
                row.get::<_, f64>(6)?,
                row.get::<_, Option<String>>(7)?,
            ))
        })
        .query_context("query staging ledger_installments")?;

    let mut map: HashMap<StagedKey, Vec<StagingLedgerInstallment>> = HashMap::new();
    for row in rows {
        let (tenant, credential, document, installment, due, total, paid, status) =
            row.query_context("row staging ledger_installments")?;
        map.entry((tenant, credential, document))
            .or_default()
            .push(StagingLedgerInstallment {
                installment_id: EntityId::new(installment),
                due_date: parse_date(due)?,
                total,
                paid_amount: paid,
                status,
                allocations: allocations
                    .get(&(tenant, credential, document))
                    .into_iter()
                    .flatten()
                    .filter(|(inst, _)| *inst == installment)
                    .map(|(_, alloc)| alloc.clone())
                    .collect(),
            });
    }
    Ok(map)
}

#[allow(clippy::type_complexity)]
fn allocations(
    db: &WarehouseDb,
    filter: &TenantFilter,
    direction: LedgerDirection,
) -> StoreResult<HashMap<StagedKey, Vec<(i64, LedgerAllocation)>>> {
    let mut stmt = db
        .conn()
        .prepare(
            "SELECT tenant_id, credential_id, document_id, installment_id,
                    category_id, cost_center_id, amount
             FROM staging.ledger_allocations
             WHERE direction = ? AND (? IS NULL OR tenant_id = ?)",
        )
        .query_context("prepare staging ledger_allocations")?;

    let tenant = filter.as_param();
    let rows = stmt
        .query_map(duckdb::params![direction.as_str(), tenant, tenant], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, Option<i64>>(4)?,
                row.get::<_, Option<i64>>(5)?,
                row.get::<_, f64>(6)?,
            ))
        })
        .query_context("query staging ledger_allocations")?;

    let mut map: HashMap<StagedKey, Vec<(i64, LedgerAllocation)>> = HashMap::new();
    for row in rows {
        let (tenant, credential, document, installment, category, cost_center, amount) =
            row.query_context("row staging ledger_allocations")?;
        map.entry((tenant, credential, document)).or_default().push((
            installment,
            LedgerAllocation {
                category_id: category.map(EntityId::new),
                cost_center_id: cost_center.map(EntityId::new),
                amount,
            },
        ));
    }
    Ok(map)
}

fn sale_items(
    db: &WarehouseDb,
    filter: &TenantFilter,
) -> StoreResult<HashMap<StagedKey, Vec<StagingSaleItem>>> {
    let mut stmt = db
        .conn()
        .prepare(
            "SELECT tenant_id, credential_id, sale_id, line_number, product_id,
                    description, quantity, unit_price, line_total
             FROM staging.sale_items
             WHERE (? IS NULL OR tenant_id = ?)
             ORDER BY line_number",
        )
        .query_context("prepare staging sale_items")?;

    let tenant = filter.as_param();
    let rows = stmt
        .query_map(duckdb::params![tenant, tenant], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i32>(3)?,
                row.get::<_, Option<i64>>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, f64>(6)?,
                row.get::<_, f64>(7)?,
                row.get::<_, f64>(8)?,
            ))
        })
        .query_context("query staging sale_items")?;

    let mut map: HashMap<StagedKey, Vec<StagingSaleItem>> = HashMap::new();
    for row in rows {
        let (tenant, credential, sale, line, product, description, qty, price, total) =
            row.query_context("row staging sale_items")?;
        map.entry((tenant, credential, sale))
            .or_default()
            .push(StagingSaleItem {
                line_number: line.max(0) as u32,
                product_id: product.map(EntityId::new),
                description,
                quantity: qty,
                unit_price: price,
                line_total: total,
            });
    }
    Ok(map)
}

impl StagingReader for WarehouseDb {
    fn categories(&self, filter: &TenantFilter) -> StoreResult<Vec<StagingCategory>> {
        category_rows(self, filter, "plain")
    }

    fn dre_categories(&self, filter: &TenantFilter) -> StoreResult<Vec<StagingCategory>> {
        category_rows(self, filter, "dre")
    }

    fn people(&self, filter: &TenantFilter) -> StoreResult<Vec<StagingPerson>> {
        let mut stmt = self
            .conn()
            .prepare(
                "SELECT tenant_id, credential_id, person_id, name, document, email, roles,
                        street, city, state, zip, collected_at, extra
                 FROM staging.people
                 WHERE (? IS NULL OR tenant_id = ?)
                 ORDER BY tenant_id, credential_id, person_id",
            )
            .query_context("prepare staging people")?;

        let tenant = filter.as_param();
        let rows = stmt
            .query_map(duckdb::params![tenant, tenant], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, Option<String>>(5)?,
                    row.get::<_, Option<String>>(6)?,
                    row.get::<_, Option<String>>(7)?,
                    row.get::<_, Option<String>>(8)?,
                    row.get::<_, Option<String>>(9)?,
                    row.get::<_, Option<String>>(10)?,
                    row.get::<_, Option<String>>(11)?,
                    row.get::<_, Option<String>>(12)?,
                ))
            })
            .query_context("query staging people")?;

        rows.into_iter()
            .map(|row| {
                let (
                    tenant,
                    credential,
                    id,
                    name,
                    document,
                    email,
                    roles,
                    street,
                    city,
                    state,
                    zip,
                    collected,
                    extra,
                ) = row.query_context("row staging people")?;
                let address = if street.is_some() || city.is_some() || state.is_some() || zip.is_some()
                {
                    Some(Address {
                        street,
                        city,
                        state,
                        zip,
                    })
                } else {
                    None
                };
                Ok(StagingPerson {
                    tenant: TenantId::new(tenant),
                    credential: CredentialId::new(credential),
                    person_id: EntityId::new(id),
                    name,
                    document,
                    email,
                    roles: parse_string_array(roles),
                    address,
                    collected_at: parse_timestamp(collected)?,
                    extra: parse_extra(extra),
                })
            })
            .collect()
    }

    fn cost_centers(&self, filter: &TenantFilter) -> StoreResult<Vec<StagingCostCenter>> {
        let mut stmt = self
            .conn()
            .prepare(
                "SELECT tenant_id, credential_id, cost_center_id, code, name, inactive,
                        collected_at, extra
                 FROM staging.cost_centers
                 WHERE (? IS NULL OR tenant_id = ?)
                 ORDER BY tenant_id, credential_id, cost_center_id",
            )
            .query_context("prepare staging cost_centers")?;

        let tenant = filter.as_param();
        let rows = stmt
            .query_map(duckdb::params![tenant, tenant], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, bool>(5)?,
                    row.get::<_, Option<String>>(6)?,
                    row.get::<_, Option<String>>(7)?,
                ))
            })
            .query_context("query staging cost_centers")?;

        rows.into_iter()
            .map(|row| {
                let (tenant, credential, id, code, name, inactive, collected, extra) =
                    row.query_context("row staging cost_centers")?;
                Ok(StagingCostCenter {
                    tenant: TenantId::new(tenant),
                    credential: CredentialId::new(credential),
                    cost_center_id: EntityId::new(id),
                    code,
                    name,
                    inactive,
                    collected_at: parse_timestamp(collected)?,
                    extra: parse_extra(extra),
                })
            })
            .collect()
    }

    fn ledger_documents(
        &self,
        filter: &TenantFilter,
        direction: LedgerDirection,
    ) -> StoreResult<Vec<StagingLedgerDocument>> {
        let mut installments = installments(self, filter, direction)?;

        let mut stmt = self
            .conn()
            .prepare(
                "SELECT tenant_id, credential_id, document_id, person_id, description, status,
                        issue_date, due_date, total, collected_at, extra
                 FROM staging.ledger_documents
                 WHERE direction = ? AND (? IS NULL OR tenant_id = ?)
                 ORDER BY tenant_id, credential_id, document_id",
            )
            .query_context("prepare staging ledger_documents")?;

        let tenant = filter.as_param();
        let rows = stmt
            .query_map(duckdb::params![direction.as_str(), tenant, tenant], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, Option<i64>>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, Option<String>>(5)?,
                    row.get::<_, Option<String>>(6)?,
                    row.get::<_, Option<String>>(7)?,
                    row.get::<_, f64>(8)?,
                    row.get::<_, Option<String>>(9)?,
                    row.get::<_, Option<String>>(10)?,
                ))
            })
            .query_context("query staging ledger_documents")?;

        rows.into_iter()
            .map(|row| {
                let (
                    tenant,
                    credential,
                    id,
                    person,
                    description,
                    status,
                    issue,
                    due,
                    total,
                    collected,
                    extra,
                ) = row.query_context("row staging ledger_documents")?;
                Ok(StagingLedgerDocument {
                    tenant: TenantId::new(tenant),
                    credential: CredentialId::new(credential),
                    document_id: EntityId::new(id),
                    direction,
                    person_id: person.map(EntityId::new),
                    description,
                    status,
                    issue_date: parse_date(issue)?,
                    due_date: parse_date(due)?,
                    total,
                    installments: installments
                        .remove(&(tenant, credential, id))
                        .unwrap_or_default(),
                    collected_at: parse_timestamp(collected)?,
                    extra: parse_extra(extra),
                })
            })
            .collect()
    }

    fn sales(&self, filter: &TenantFilter) -> StoreResult<Vec<StagingSale>> {
        let mut items = sale_items(self, filter)?;

        let mut stmt = self
            .conn()
            .prepare(
                "SELECT tenant_id, credential_id, sale_id, person_id, category_id,
                        cost_center_id, payment_account_id, sale_date, status, total,
                        collected_at, extra
                 FROM staging.sales
                 WHERE (? IS NULL OR tenant_id = ?)
                 ORDER BY tenant_id, credential_id, sale_id",
            )
            .query_context("prepare staging sales")?;

        let tenant = filter.as_param();
        let rows = stmt
            .query_map(duckdb::params![tenant, tenant], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, Option<i64>>(3)?,
                    row.get::<_, Option<i64>>(4)?,
                    row.get::<_, Option<i64>>(5)?,
                    row.get::<_, Option<i64>>(6)?,
                    row.get::<_, Option<String>>(7)?,
                    row.get::<_, Option<String>>(8)?,
                    row.get::<_, f64>(9)?,
                    row.get::<_, Option<String>>(10)?,
                    row.get::<_, Option<String>>(11)?,
                ))
            })
            .query_context("query staging sales")?;

        rows.into_iter()
            .map(|row| {
                let (
                    tenant,
                    credential,
                    id,
                    person,
                    category,
                    cost_center,
                    payment_account,
                    sale_date,
                    status,
                    total,
                    collected,
                    extra,
                ) = row.query_context("row staging sales")?;
                Ok(StagingSale {
                    tenant: TenantId::new(tenant),
                    credential: CredentialId::new(credential),
                    sale_id: EntityId::new(id),
                    person_id: person.map(EntityId::new),
                    category_id: category.map(EntityId::new),
                    cost_center_id: cost_center.map(EntityId::new),
                    payment_account_id: payment_account.map(EntityId::new),
                    sale_date: parse_date(sale_date)?,
                    status,
                    total,
                    items: items.remove(&(tenant, credential, id)).unwrap_or_default(),
                    collected_at: parse_timestamp(collected)?,
                    extra: parse_extra(extra),
                })
            })
            .collect()
    }

    fn contracts(&self, filter: &TenantFilter) -> StoreResult<Vec<StagingContract>> {
        let mut stmt = self
            .conn()
            .prepare(
                "SELECT tenant_id, credential_id, contract_id, number, person_id, status,
                        starts_on, ends_on, monthly_value, total_value, collected_at, extra
                 FROM staging.contracts
                 WHERE (? IS NULL OR tenant_id = ?)
                 ORDER BY tenant_id, credential_id, contract_id",
            )
            .query_context("prepare staging contracts")?;

        let tenant = filter.as_param();
        let rows = stmt
            .query_map(duckdb::params![tenant, tenant], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, Option<i64>>(4)?,
                    row.get::<_, Option<String>>(5)?,
                    row.get::<_, Option<String>>(6)?,
                    row.get::<_, Option<String>>(7)?,
                    row.get::<_, f64>(8)?,
                    row.get::<_, f64>(9)?,
                    row.get::<_, Option<String>>(10)?,
                    row.get::<_, Option<String>>(11)?,
                ))
            })
            .query_context("query staging contracts")?;

        rows.into_iter()
            .map(|row| {
                let (
                    tenant,
                    credential,
                    id,
                    number,
                    person,
                    status,
                    starts,
                    ends,
                    monthly,
                    total,
                    collected,
                    extra,
                ) = row.query_context("row staging contracts")?;
                Ok(StagingContract {
                    tenant: TenantId::new(tenant),
                    credential: CredentialId::new(credential),
                    contract_id: EntityId::new(id),
                    number,
                    person_id: person.map(EntityId::new),
                    status,
                    starts_on: parse_date(starts)?,
                    ends_on: parse_date(ends)?,
                    monthly_value: monthly,
                    total_value: total,
                    collected_at: parse_timestamp(collected)?,
                    extra: parse_extra(extra),
                })
            })
            .collect()
    }

    fn balance_history(&self, filter: &TenantFilter) -> StoreResult<Vec<StagingBalance>> {
        let mut stmt = self
            .conn()
            .prepare(
                "SELECT tenant_id, credential_id, account_id, account_name, balance,
                        collected_at, extra
                 FROM staging.account_balances
                 WHERE (? IS NULL OR tenant_id = ?)
                 ORDER BY tenant_id, account_id, collected_at",
            )
            .query_context("prepare staging account_balances")?;

        let tenant = filter.as_param();
        let rows = stmt
            .query_map(duckdb::params![tenant, tenant], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, f64>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, Option<String>>(6)?,
                ))
            })
            .query_context("query staging account_balances")?;

        rows.into_iter()
            .map(|row| {
                let (tenant, credential, id, name, balance, collected, extra) =
                    row.query_context("row staging account_balances")?;
                let collected_at = parse_timestamp(Some(collected))?.ok_or_else(|| {
                    crate::error::StoreError::DecodeError(
                        "balance row missing collected_at".to_string(),
                    )
                })?;
                Ok(StagingBalance {
                    tenant: TenantId::new(tenant),
                    credential: CredentialId::new(credential),
                    account_id: EntityId::new(id),
                    account_name: name,
                    balance,
                    collected_at,
                    extra: parse_extra(extra),
                })
            })
            .collect()
    }
}
