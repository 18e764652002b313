//! Integrity diagnostics and post-load maintenance.

use crate::error::EtlResult;
use crate::pipeline::validate_tenant;
use lf_core::TenantId;
use lf_store::{Finding, Warehouse};

/// Count fact rows with unresolved dimension foreign keys.
///
/// Read-only; findings are grouped by tenant, fact table, and failed join.
pub fn check_integrity<S: Warehouse>(
    store: &S,
    tenant: Option<TenantId>,
) -> EtlResult<Vec<Finding>> {
    let filter = validate_tenant(store, tenant)?;
    let findings = store.unresolved_fk_findings(&filter)?;
    for finding in &findings {
        log::warn!(
            "integrity: tenant {} {} has {} rows where {}",
            finding.tenant,
            finding.table,
            finding.rows,
            finding.reason
        );
    }
    Ok(findings)
}

/// Ask the store to refresh optimizer statistics after bulk loads.
pub fn refresh_statistics<S: Warehouse>(store: &S) -> EtlResult<()> {
    store.refresh_statistics()?;
    Ok(())
}

#[cfg(test)]
#[path = "integrity_test.rs"]
mod tests;
