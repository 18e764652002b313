//! Fact table writes.
//!
//! The ledger upsert reads the stored row first so the enrichment
//! invalidation rule runs in Rust ([`LedgerEntryRow::core_fields_differ`]),
//! identically to the in-memory store. Sales/contracts are plain
//! `INSERT OR REPLACE`; balances are a tenant-predicated replace-set.

use crate::connection::WarehouseDb;
use crate::error::{StoreResult, StoreResultExt};
use crate::filter::TenantFilter;
use crate::row_helpers::{date_param, parse_date, parse_timestamp, timestamp_param};
use crate::traits::{FactWriter, LedgerUpsert};
use lf_core::{
    BalanceRow, ContractRow, EntityId, LedgerDirection, LedgerEntryRow, SaleItemRow, SaleRow,
    TenantId,
};

fn ledger_direction(raw: &str) -> StoreResult<LedgerDirection> {
    match raw {
        "payable" => Ok(LedgerDirection::Payable),
        "receivable" => Ok(LedgerDirection::Receivable),
        other => Err(crate::error::StoreError::DecodeError(format!(
            "bad ledger direction '{other}'"
        ))),
    }
}

impl FactWriter for WarehouseDb {
    fn upsert_ledger_entry(&self, row: &LedgerEntryRow) -> StoreResult<LedgerUpsert> {
        let stored = self.get_ledger_entry(
            row.tenant,
            row.document_id,
            row.installment_id,
            row.category_id,
            row.cost_center_id,
        )?;

        let (outcome, detailed, detailed_at) = match &stored {
            None => (LedgerUpsert::Inserted, false, None),
            Some(existing) if row.core_fields_differ(existing) => {
                (LedgerUpsert::CoreChanged, false, None)
            }
            Some(existing) => (
                LedgerUpsert::Preserved,
                existing.detailed,
                existing.detailed_at,
            ),
        };

        self.conn()
            .execute(
                "INSERT OR REPLACE INTO dw.fact_ledger_entry
                     (tenant_id, document_id, installment_id, category_id, cost_center_id,
                      direction, person_id, description, allocated_amount, installment_total,
                      paid_amount, unpaid_amount, status, issue_date, due_date,
                      detailed, detailed_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                         CAST(? AS DATE), CAST(? AS DATE), ?, CAST(? AS TIMESTAMP))",
                duckdb::params![
                    row.tenant.raw(),
                    row.document_id.raw(),
                    row.installment_id.raw(),
                    row.category_id.raw(),
                    row.cost_center_id.raw(),
                    row.direction.as_str(),
                    row.person_id.map(EntityId::raw),
                    row.description,
                    row.allocated_amount,
                    row.installment_total,
                    row.paid_amount,
                    row.unpaid_amount,
                    row.status,
                    date_param(row.issue_date),
                    date_param(row.due_date),
                    detailed,
                    timestamp_param(detailed_at),
                ],
            )
            .query_context("upsert fact_ledger_entry")?;

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
        let mut stmt = self
            .conn()
            .prepare(
                "SELECT direction, person_id, description, allocated_amount, installment_total,
                        paid_amount, unpaid_amount, status,
                        CAST(issue_date AS VARCHAR), CAST(due_date AS VARCHAR),
                        detailed, CAST(detailed_at AS VARCHAR)
                 FROM dw.fact_ledger_entry
                 WHERE tenant_id = ? AND document_id = ? AND installment_id = ?
                   AND category_id = ? AND cost_center_id = ?",
            )
            .query_context("prepare get_ledger_entry")?;

        let mut rows = stmt
            .query_map(
                duckdb::params![
                    tenant.raw(),
                    document_id.raw(),
                    installment_id.raw(),
                    category_id.raw(),
                    cost_center_id.raw(),
                ],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<i64>>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, f64>(3)?,
                        row.get::<_, f64>(4)?,
                        row.get::<_, f64>(5)?,
                        row.get::<_, f64>(6)?,
                        row.get::<_, Option<String>>(7)?,
                        row.get::<_, Option<String>>(8)?,
                        row.get::<_, Option<String>>(9)?,
                        row.get::<_, bool>(10)?,
                        row.get::<_, Option<String>>(11)?,
                    ))
                },
            )
            .query_context("query get_ledger_entry")?;

        let Some(row) = rows.next() else {
            return Ok(None);
        };
        let (
            direction,
            person,
            description,
            allocated,
            total,
            paid,
            unpaid,
            status,
            issue,
            due,
            detailed,
            detailed_at,
        ) = row.query_context("row get_ledger_entry")?;

        Ok(Some(LedgerEntryRow {
            tenant,
            document_id,
            installment_id,
            category_id,
            cost_center_id,
            direction: ledger_direction(&direction)?,
            person_id: person.map(EntityId::new),
            description,
            allocated_amount: allocated,
            installment_total: total,
            paid_amount: paid,
            unpaid_amount: unpaid,
            status,
            issue_date: parse_date(issue)?,
            due_date: parse_date(due)?,
            detailed,
            detailed_at: parse_timestamp(detailed_at)?,
        }))
    }

    fn upsert_sale(&self, row: &SaleRow) -> StoreResult<()> {
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO dw.fact_sale
                     (tenant_id, sale_id, person_id, category_id, cost_center_id,
                      payment_account_id, sale_date, status, total)
                 VALUES (?, ?, ?, ?, ?, ?, CAST(? AS DATE), ?, ?)",
                duckdb::params![
                    row.tenant.raw(),
                    row.sale_id.raw(),
                    row.person_id.map(EntityId::raw),
                    row.category_id.map(EntityId::raw),
                    row.cost_center_id.map(EntityId::raw),
                    row.payment_account_id.map(EntityId::raw),
                    date_param(row.sale_date),
                    row.status,
                    row.total,
                ],
            )
            .query_context("upsert fact_sale")?;
        Ok(())
    }

    fn upsert_sale_item(&self, row: &SaleItemRow) -> StoreResult<()> {
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO dw.fact_sale_item
                     (tenant_id, sale_id, line_number, product_id, description,
                      quantity, unit_price, line_total)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                duckdb::params![
                    row.tenant.raw(),
                    row.sale_id.raw(),
                    row.line_number as i32,
                    row.product_id.map(EntityId::raw),
                    row.description,
                    row.quantity,
                    row.unit_price,
                    row.line_total,
                ],
            )
            .query_context("upsert fact_sale_item")?;
        Ok(())
    }

    fn upsert_contract(&self, row: &ContractRow) -> StoreResult<()> {
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO dw.fact_contract
                     (tenant_id, contract_id, number, person_id, status,
                      starts_on, ends_on, monthly_value, total_value)
                 VALUES (?, ?, ?, ?, ?, CAST(? AS DATE), CAST(? AS DATE), ?, ?)",
                duckdb::params![
                    row.tenant.raw(),
                    row.contract_id.raw(),
                    row.number,
                    row.person_id.map(EntityId::raw),
                    row.status,
                    date_param(row.starts_on),
                    date_param(row.ends_on),
                    row.monthly_value,
                    row.total_value,
                ],
            )
            .query_context("upsert fact_contract")?;
        Ok(())
    }

    fn replace_balances(&self, filter: &TenantFilter, rows: &[BalanceRow]) -> StoreResult<usize> {
        self.transaction(|conn| {
            let tenant = filter.as_param();
            conn.execute(
                "DELETE FROM dw.fact_account_balance WHERE (? IS NULL OR tenant_id = ?)",
                duckdb::params![tenant, tenant],
            )
            .query_context("clear fact_account_balance")?;

            let mut stmt = conn
                .prepare(
                    "INSERT INTO dw.fact_account_balance
                         (tenant_id, account_id, account_name, balance, collected_at)
                     VALUES (?, ?, ?, ?, CAST(? AS TIMESTAMP))",
                )
                .query_context("prepare insert fact_account_balance")?;

            for row in rows {
                stmt.execute(duckdb::params![
                    row.tenant.raw(),
                    row.account_id.raw(),
                    row.account_name,
                    row.balance,
                    timestamp_param(Some(row.collected_at)),
                ])
                .query_context("insert fact_account_balance")?;
            }
            Ok(rows.len())
        })
    }
}
