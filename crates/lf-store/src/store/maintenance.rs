//! Integrity queries and optimizer-statistics refresh.

use crate::connection::WarehouseDb;
use crate::error::{StoreResult, StoreResultExt};
use crate::filter::TenantFilter;
use crate::traits::{Finding, MaintenanceStore};
use lf_core::TenantId;

/// One unresolved-FK probe: fact table, FK column, dimension it must hit.
///
/// A fact row counts when its FK is set (non-null and, for the ledger's
/// sentinel keys, non-zero) but no dimension row with that natural key
/// exists for the same tenant.
struct FkProbe {
    table: &'static str,
    reason: &'static str,
    sql: &'static str,
}

const FK_PROBES: &[FkProbe] = &[
    FkProbe {
        table: "dw.fact_ledger_entry",
        reason: "category_id has no dim_category row",
        sql: "SELECT f.tenant_id, COUNT(*) FROM dw.fact_ledger_entry f
              LEFT JOIN dw.dim_category d
                ON d.tenant_id = f.tenant_id AND d.category_id = f.category_id
              WHERE f.category_id <> 0 AND d.category_id IS NULL
                AND (? IS NULL OR f.tenant_id = ?)
              GROUP BY f.tenant_id",
    },
    FkProbe {
        table: "dw.fact_ledger_entry",
        reason: "cost_center_id has no dim_cost_center row",
        sql: "SELECT f.tenant_id, COUNT(*) FROM dw.fact_ledger_entry f
              LEFT JOIN dw.dim_cost_center d
                ON d.tenant_id = f.tenant_id AND d.cost_center_id = f.cost_center_id
              WHERE f.cost_center_id <> 0 AND d.cost_center_id IS NULL
                AND (? IS NULL OR f.tenant_id = ?)
              GROUP BY f.tenant_id",
    },
    FkProbe {
        table: "dw.fact_ledger_entry",
        reason: "person_id has no dim_person row",
        sql: "SELECT f.tenant_id, COUNT(*) FROM dw.fact_ledger_entry f
              LEFT JOIN dw.dim_person d
                ON d.tenant_id = f.tenant_id AND d.person_id = f.person_id
              WHERE f.person_id IS NOT NULL AND d.person_id IS NULL
                AND (? IS NULL OR f.tenant_id = ?)
              GROUP BY f.tenant_id",
    },
    FkProbe {
        table: "dw.fact_sale",
        reason: "person_id has no dim_person row",
        sql: "SELECT f.tenant_id, COUNT(*) FROM dw.fact_sale f
              LEFT JOIN dw.dim_person d
                ON d.tenant_id = f.tenant_id AND d.person_id = f.person_id
              WHERE f.person_id IS NOT NULL AND d.person_id IS NULL
                AND (? IS NULL OR f.tenant_id = ?)
              GROUP BY f.tenant_id",
    },
    FkProbe {
        table: "dw.fact_sale",
        reason: "category_id has no dim_category row",
        sql: "SELECT f.tenant_id, COUNT(*) FROM dw.fact_sale f
              LEFT JOIN dw.dim_category d
                ON d.tenant_id = f.tenant_id AND d.category_id = f.category_id
              WHERE f.category_id IS NOT NULL AND d.category_id IS NULL
                AND (? IS NULL OR f.tenant_id = ?)
              GROUP BY f.tenant_id",
    },
    FkProbe {
        table: "dw.fact_sale",
        reason: "cost_center_id has no dim_cost_center row",
        sql: "SELECT f.tenant_id, COUNT(*) FROM dw.fact_sale f
              LEFT JOIN dw.dim_cost_center d
                ON d.tenant_id = f.tenant_id AND d.cost_center_id = f.cost_center_id
              WHERE f.cost_center_id IS NOT NULL AND d.cost_center_id IS NULL
                AND (? IS NULL OR f.tenant_id = ?)
              GROUP BY f.tenant_id",
    },
    FkProbe {
        table: "dw.fact_contract",
        reason: "person_id has no dim_person row",
        sql: "SELECT f.tenant_id, COUNT(*) FROM dw.fact_contract f
              LEFT JOIN dw.dim_person d
                ON d.tenant_id = f.tenant_id AND d.person_id = f.person_id
              WHERE f.person_id IS NOT NULL AND d.person_id IS NULL
                AND (? IS NULL OR f.tenant_id = ?)
              GROUP BY f.tenant_id",
    },
];

impl MaintenanceStore for WarehouseDb {
    fn unresolved_fk_findings(&self, filter: &TenantFilter) -> StoreResult<Vec<Finding>> {
        let tenant = filter.as_param();
        let mut findings = Vec::new();

        for probe in FK_PROBES {
            let mut stmt = self
                .conn()
                .prepare(probe.sql)
                .query_context("prepare fk probe")?;
            let rows = stmt
                .query_map(duckdb::params![tenant, tenant], |row| {
                    Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
                })
                .query_context("query fk probe")?;

            for row in rows {
                let (tenant_id, count) = row.query_context("row fk probe")?;
                findings.push(Finding {
                    tenant: TenantId::new(tenant_id),
                    table: probe.table.to_string(),
                    reason: probe.reason.to_string(),
                    rows: count.max(0) as usize,
                });
            }
        }

        Ok(findings)
    }

    fn refresh_statistics(&self) -> StoreResult<()> {
        // Large upsert batches leave the planner on stale estimates.
        self.conn()
            .execute_batch("ANALYZE")
            .query_context("analyze")?;
        Ok(())
    }
}
