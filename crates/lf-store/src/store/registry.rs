//! Registry mirror queries.

use crate::connection::WarehouseDb;
use crate::error::{StoreResult, StoreResultExt};
use crate::traits::TenantRegistry;
use lf_core::{CredentialId, TenantId};

impl TenantRegistry for WarehouseDb {
    fn tenants(&self) -> StoreResult<Vec<TenantId>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT tenant_id FROM dw.tenants ORDER BY tenant_id")
            .query_context("prepare tenants")?;

        let rows = stmt
            .query_map([], |row| row.get::<_, i64>(0))
            .query_context("query tenants")?;

        rows.into_iter()
            .map(|row| Ok(TenantId::new(row.query_context("row tenants")?)))
            .collect()
    }

    fn tenant_exists(&self, tenant: TenantId) -> StoreResult<bool> {
        let count: i64 = self
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM dw.tenants WHERE tenant_id = ?",
                duckdb::params![tenant.raw()],
                |row| row.get(0),
            )
            .query_context("tenant_exists")?;
        Ok(count > 0)
    }

    fn credentials(&self, tenant: TenantId) -> StoreResult<Vec<CredentialId>> {
        let mut stmt = self
            .conn()
            .prepare(
                "SELECT credential_id FROM dw.tenant_credentials
                 WHERE tenant_id = ? ORDER BY credential_id",
            )
            .query_context("prepare credentials")?;

        let rows = stmt
            .query_map(duckdb::params![tenant.raw()], |row| row.get::<_, i64>(0))
            .query_context("query credentials")?;

        rows.into_iter()
            .map(|row| Ok(CredentialId::new(row.query_context("row credentials")?)))
            .collect()
    }
}
