//! Sale and sale line-item fact loader.
//!
//! The category, cost-center, and payment-account joins are legitimately
//! optional; nulls pass through untouched and unresolved ids are left for
//! the integrity checker.

use crate::control::PassTracker;
use crate::error::EtlResult;
use lf_core::{EntityKind, SaleItemRow, SaleRow, StepStats};
use lf_store::{FactWriter, LoadControlStore, StagingReader, TenantFilter};

pub(crate) fn load<S>(store: &S, filter: &TenantFilter) -> EtlResult<StepStats>
where
    S: StagingReader + FactWriter + LoadControlStore,
{
    let mut stats = StepStats::default();
    let mut tracker = PassTracker::new();

    for sale in store.sales(filter)? {
        tracker.observe(sale.tenant, sale.credential, sale.collected_at);

        store.upsert_sale(&SaleRow {
            tenant: sale.tenant,
            sale_id: sale.sale_id,
            person_id: sale.person_id,
            category_id: sale.category_id,
            cost_center_id: sale.cost_center_id,
            payment_account_id: sale.payment_account_id,
            sale_date: sale.sale_date,
            status: sale.status.clone(),
            total: sale.total,
        })?;
        stats.upserted += 1;

        for item in &sale.items {
            store.upsert_sale_item(&SaleItemRow {
                tenant: sale.tenant,
                sale_id: sale.sale_id,
                line_number: item.line_number,
                product_id: item.product_id,
                description: item.description.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                line_total: item.line_total,
            })?;
            stats.upserted += 1;
        }
    }

    tracker.commit(store, EntityKind::Sale)?;
    Ok(stats)
}

#[cfg(test)]
#[path = "sale_test.rs"]
mod tests;
