//! Dimension table writes and key reads.
//!
//! Dimension upserts are `INSERT OR REPLACE`: dimensions are cheap to fully
//! recompute and carry no cache state, so every derived column is
//! overwritten unconditionally.

use crate::connection::WarehouseDb;
use crate::error::{StoreResult, StoreResultExt};
use crate::filter::TenantFilter;
use crate::traits::{DimensionReader, DimensionWriter};
use lf_core::{
    CategoryDreRow, CategoryRow, CostCenterRow, DimensionKind, EntityId, PersonRow, TenantId,
    TotalizerPeerRow, TotalizerRow,
};
use std::collections::HashSet;

impl DimensionWriter for WarehouseDb {
    fn upsert_category(&self, row: &CategoryRow) -> StoreResult<()> {
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO dw.dim_category
                     (tenant_id, category_id, name, external_code,
                      level_1, level_2, level_3, level_4, level_5, level_depth)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                duckdb::params![
                    row.tenant.raw(),
                    row.category_id.raw(),
                    row.name,
                    row.external_code,
                    row.levels[0],
                    row.levels[1],
                    row.levels[2],
                    row.levels[3],
                    row.levels[4],
                    row.depth as i32,
                ],
            )
            .query_context("upsert dim_category")?;
        Ok(())
    }

    fn upsert_category_dre(&self, row: &CategoryDreRow) -> StoreResult<()> {
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO dw.dim_category_dre
                     (tenant_id, category_id, expansion_id, name, external_code, position,
                      level_1, level_2, level_3, level_4, level_5, level_depth)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                duckdb::params![
                    row.tenant.raw(),
                    row.category_id.raw(),
                    row.expansion_id.raw(),
                    row.name,
                    row.external_code,
                    row.position,
                    row.levels[0],
                    row.levels[1],
                    row.levels[2],
                    row.levels[3],
                    row.levels[4],
                    row.depth as i32,
                ],
            )
            .query_context("upsert dim_category_dre")?;
        Ok(())
    }

    fn upsert_person(&self, row: &PersonRow) -> StoreResult<()> {
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO dw.dim_person
                     (tenant_id, person_id, name, document, kind, email,
                      street, city, state, zip)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                duckdb::params![
                    row.tenant.raw(),
                    row.person_id.raw(),
                    row.name,
                    row.document,
                    row.kind,
                    row.email,
                    row.street,
                    row.city,
                    row.state,
                    row.zip,
                ],
            )
            .query_context("upsert dim_person")?;
        Ok(())
    }

    fn upsert_cost_center(&self, row: &CostCenterRow) -> StoreResult<()> {
        self.conn()
            .execute(
                "INSERT OR REPLACE INTO dw.dim_cost_center
                     (tenant_id, cost_center_id, code, name, inactive)
                 VALUES (?, ?, ?, ?, ?)",
                duckdb::params![
                    row.tenant.raw(),
                    row.cost_center_id.raw(),
                    row.code,
                    row.name,
                    row.inactive,
                ],
            )
            .query_context("upsert dim_cost_center")?;
        Ok(())
    }

    fn replace_totalizers(
        &self,
        filter: &TenantFilter,
        totalizers: &[TotalizerRow],
        peers: &[TotalizerPeerRow],
    ) -> StoreResult<()> {
        self.transaction(|conn| {
            let tenant = filter.as_param();
            conn.execute(
                "DELETE FROM dw.dre_totalizer WHERE (? IS NULL OR tenant_id = ?)",
                duckdb::params![tenant, tenant],
            )
            .query_context("clear dre_totalizer")?;
            conn.execute(
                "DELETE FROM dw.dre_totalizer_peer WHERE (? IS NULL OR tenant_id = ?)",
                duckdb::params![tenant, tenant],
            )
            .query_context("clear dre_totalizer_peer")?;

            for row in totalizers {
                conn.execute(
                    "INSERT INTO dw.dre_totalizer (tenant_id, position) VALUES (?, ?)",
                    duckdb::params![row.tenant.raw(), row.position],
                )
                .query_context("insert dre_totalizer")?;
            }
            for row in peers {
                conn.execute(
                    "INSERT INTO dw.dre_totalizer_peer (tenant_id, position, category_id)
                     VALUES (?, ?, ?)",
                    duckdb::params![row.tenant.raw(), row.position, row.category_id.raw()],
                )
                .query_context("insert dre_totalizer_peer")?;
            }
            Ok(())
        })
    }
}

impl DimensionReader for WarehouseDb {
    fn dimension_keys(
        &self,
        tenant: TenantId,
        dimension: DimensionKind,
    ) -> StoreResult<HashSet<EntityId>> {
        let sql = match dimension {
            DimensionKind::Category => {
                "SELECT category_id FROM dw.dim_category WHERE tenant_id = ?"
            }
            DimensionKind::CategoryDre => {
                "SELECT DISTINCT category_id FROM dw.dim_category_dre WHERE tenant_id = ?"
            }
            DimensionKind::Person => "SELECT person_id FROM dw.dim_person WHERE tenant_id = ?",
            DimensionKind::CostCenter => {
                "SELECT cost_center_id FROM dw.dim_cost_center WHERE tenant_id = ?"
            }
        };

        let mut stmt = self.conn().prepare(sql).query_context("prepare dimension_keys")?;
        let rows = stmt
            .query_map(duckdb::params![tenant.raw()], |row| row.get::<_, i64>(0))
            .query_context("query dimension_keys")?;

        rows.into_iter()
            .map(|row| Ok(EntityId::new(row.query_context("row dimension_keys")?)))
            .collect()
    }
}
