//! Staging and registry seeding.
//!
//! In production the external collector owns these tables; the warehouse
//! only reads them. The inserts live here so integration tests (and local
//! tooling) can land snapshots through the same collector contract:
//! unique on (tenant, credential, entity id), ISO-8601 strings for dates,
//! JSON for the extra map.

use crate::connection::WarehouseDb;
use crate::error::{StoreResult, StoreResultExt};
use crate::row_helpers::{date_param, timestamp_param};
use lf_core::{
    CredentialId, EntityId, StagingBalance, StagingCategory, StagingContract, StagingCostCenter,
    StagingLedgerDocument, StagingPerson, StagingSale, TenantId,
};

fn extra_param(extra: &serde_json::Map<String, serde_json::Value>) -> Option<String> {
    if extra.is_empty() {
        None
    } else {
        Some(serde_json::Value::Object(extra.clone()).to_string())
    }
}

impl WarehouseDb {
    /// Register a tenant in the registry mirror.
    pub fn add_tenant(&self, tenant: TenantId, name: &str) -> StoreResult<()> {
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO dw.tenants (tenant_id, name) VALUES (?, ?)",
                duckdb::params![tenant.raw(), name],
            )
            .query_context("insert tenants")?;
        Ok(())
    }

    /// Register a credential for a tenant.
    pub fn add_credential(&self, tenant: TenantId, credential: CredentialId) -> StoreResult<()> {
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO dw.tenant_credentials (tenant_id, credential_id)
                 VALUES (?, ?)",
                duckdb::params![tenant.raw(), credential.raw()],
            )
            .query_context("insert tenant_credentials")?;
        Ok(())
    }

    /// Land one category snapshot into `staging.categories`.
    ///
    /// `family` is `"plain"` or `"dre"`; financial links land in
    /// `staging.category_links`.
    pub fn stage_category(&self, row: &StagingCategory, family: &str) -> StoreResult<()> {
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO staging.categories
                     (tenant_id, credential_id, category_id, family, name, parent_id,
                      external_code, position, subitem_count, collected_at, extra)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                duckdb::params![
                    row.tenant.raw(),
                    row.credential.raw(),
                    row.category_id.raw(),
                    family,
                    row.name,
                    row.parent_id.map(EntityId::raw),
                    row.external_code,
                    row.position,
                    row.subitem_count as i32,
                    timestamp_param(row.collected_at),
                    extra_param(&row.extra),
                ],
            )
            .query_context("insert staging.categories")?;

        for link in &row.financial_links {
            self.conn()
                .execute(
                    "INSERT OR REPLACE INTO staging.category_links
                         (tenant_id, credential_id, category_id, link_id, link_name)
                     VALUES (?, ?, ?, ?, ?)",
                    duckdb::params![
                        row.tenant.raw(),
                        row.credential.raw(),
                        row.category_id.raw(),
                        link.id.raw(),
                        link.name,
                    ],
                )
                .query_context("insert staging.category_links")?;
        }
        Ok(())
    }

    /// Land one person snapshot into `staging.people`.
    pub fn stage_person(&self, row: &StagingPerson) -> StoreResult<()> {
        let address = row.address.clone().unwrap_or_default();
        let roles = if row.roles.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&row.roles).unwrap_or_default())
        };
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO staging.people
                     (tenant_id, credential_id, person_id, name, document, email, roles,
                      street, city, state, zip, collected_at, extra)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                duckdb::params![
                    row.tenant.raw(),
                    row.credential.raw(),
                    row.person_id.raw(),
                    row.name,
                    row.document,
                    row.email,
                    roles,
                    address.street,
                    address.city,
                    address.state,
                    address.zip,
                    timestamp_param(row.collected_at),
                    extra_param(&row.extra),
                ],
            )
            .query_context("insert staging.people")?;
        Ok(())
    }

    /// Land one cost-center snapshot into `staging.cost_centers`.
    pub fn stage_cost_center(&self, row: &StagingCostCenter) -> StoreResult<()> {
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO staging.cost_centers
                     (tenant_id, credential_id, cost_center_id, code, name, inactive,
                      collected_at, extra)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                duckdb::params![
                    row.tenant.raw(),
                    row.credential.raw(),
                    row.cost_center_id.raw(),
                    row.code,
                    row.name,
                    row.inactive,
                    timestamp_param(row.collected_at),
                    extra_param(&row.extra),
                ],
            )
            .query_context("insert staging.cost_centers")?;
        Ok(())
    }

    /// Land one ledger document with installments and allocations.
    pub fn stage_ledger_document(&self, row: &StagingLedgerDocument) -> StoreResult<()> {
        let direction = row.direction.as_str();
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO staging.ledger_documents
                     (tenant_id, credential_id, document_id, direction, person_id,
                      description, status, issue_date, due_date, total, collected_at, extra)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                duckdb::params![
                    row.tenant.raw(),
                    row.credential.raw(),
                    row.document_id.raw(),
                    direction,
                    row.person_id.map(EntityId::raw),
                    row.description,
                    row.status,
                    date_param(row.issue_date),
                    date_param(row.due_date),
                    row.total,
                    timestamp_param(row.collected_at),
                    extra_param(&row.extra),
                ],
            )
            .query_context("insert staging.ledger_documents")?;

        // Replace child rows wholesale; collector upserts are document-level.
        self.conn()
            .execute(
                "DELETE FROM staging.ledger_installments
                 WHERE tenant_id = ? AND credential_id = ? AND document_id = ? AND direction = ?",
                duckdb::params![
                    row.tenant.raw(),
                    row.credential.raw(),
                    row.document_id.raw(),
                    direction,
                ],
            )
            .query_context("clear staging.ledger_installments")?;
        self.conn()
            .execute(
                "DELETE FROM staging.ledger_allocations
                 WHERE tenant_id = ? AND credential_id = ? AND document_id = ? AND direction = ?",
                duckdb::params![
                    row.tenant.raw(),
                    row.credential.raw(),
                    row.document_id.raw(),
                    direction,
                ],
            )
            .query_context("clear staging.ledger_allocations")?;

        for installment in &row.installments {
            self.conn()
                .execute(
                    "INSERT INTO staging.ledger_installments
                         (tenant_id, credential_id, document_id, direction, installment_id,
                          due_date, total, paid_amount, status)
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                    duckdb::params![
                        row.tenant.raw(),
                        row.credential.raw(),
                        row.document_id.raw(),
                        direction,
                        installment.installment_id.raw(),
                        date_param(installment.due_date),
                        installment.total,
                        installment.paid_amount,
                        installment.status,
                    ],
                )
                .query_context("insert staging.ledger_installments")?;

            for alloc in &installment.allocations {
                self.conn()
                    .execute(
                        "INSERT INTO staging.ledger_allocations
                             (tenant_id, credential_id, document_id, direction, installment_id,
                              category_id, cost_center_id, amount)
                         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                        duckdb::params![
                            row.tenant.raw(),
                            row.credential.raw(),
                            row.document_id.raw(),
                            direction,
                            installment.installment_id.raw(),
                            alloc.category_id.map(EntityId::raw),
                            alloc.cost_center_id.map(EntityId::raw),
                            alloc.amount,
                        ],
                    )
                    .query_context("insert staging.ledger_allocations")?;
            }
        }
        Ok(())
    }

    /// Land one sale with line items.
    pub fn stage_sale(&self, row: &StagingSale) -> StoreResult<()> {
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO staging.sales
                     (tenant_id, credential_id, sale_id, person_id, category_id,
                      cost_center_id, payment_account_id, sale_date, status, total,
                      collected_at, extra)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                duckdb::params![
                    row.tenant.raw(),
                    row.credential.raw(),
                    row.sale_id.raw(),
                    row.person_id.map(EntityId::raw),
                    row.category_id.map(EntityId::raw),
                    row.cost_center_id.map(EntityId::raw),
                    row.payment_account_id.map(EntityId::raw),
                    date_param(row.sale_date),
                    row.status,
                    row.total,
                    timestamp_param(row.collected_at),
                    extra_param(&row.extra),
                ],
            )
            .query_context("insert staging.sales")?;

        for item in &row.items {
            self.conn()
                .execute(
                    "INSERT OR REPLACE INTO staging.sale_items
                         (tenant_id, credential_id, sale_id, line_number, product_id,
                          description, quantity, unit_price, line_total)
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                    duckdb::params![
                        row.tenant.raw(),
                        row.credential.raw(),
                        row.sale_id.raw(),
                        item.line_number as i32,
                        item.product_id.map(EntityId::raw),
                        item.description,
                        item.quantity,
                        item.unit_price,
                        item.line_total,
                    ],
                )
                .query_context("insert staging.sale_items")?;
        }
        Ok(())
    }

    /// Land one contract snapshot.
    pub fn stage_contract(&self, row: &StagingContract) -> StoreResult<()> {
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO staging.contracts
                     (tenant_id, credential_id, contract_id, number, person_id, status,
                      starts_on, ends_on, monthly_value, total_value, collected_at, extra)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                duckdb::params![
                    row.tenant.raw(),
                    row.credential.raw(),
                    row.contract_id.raw(),
                    row.number,
                    row.person_id.map(EntityId::raw),
                    row.status,
                    date_param(row.starts_on),
                    date_param(row.ends_on),
                    row.monthly_value,
                    row.total_value,
                    timestamp_param(row.collected_at),
                    extra_param(&row.extra),
                ],
            )
            .query_context("insert staging.contracts")?;
        Ok(())
    }

    /// Land one balance reading (history accumulates, nothing overwritten).
    pub fn stage_balance(&self, row: &StagingBalance) -> StoreResult<()> {
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO staging.account_balances
                     (tenant_id, credential_id, account_id, account_name, balance,
                      collected_at, extra)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                duckdb::params![
                    row.tenant.raw(),
                    row.credential.raw(),
                    row.account_id.raw(),
                    row.account_name,
                    row.balance,
                    timestamp_param(Some(row.collected_at)),
                    extra_param(&row.extra),
                ],
            )
            .query_context("insert staging.account_balances")?;
        Ok(())
    }
}
