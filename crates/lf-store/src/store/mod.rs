//! DuckDB implementations of the gateway traits for [`WarehouseDb`].
//!
//! Each submodule implements one trait. All SQL is tenant-scoped through
//! the `(? IS NULL OR tenant_id = ?)` predicate so all-tenant and
//! single-tenant execution share one code path.
//!
//! [`WarehouseDb`]: crate::connection::WarehouseDb

mod calendar;
mod dimensions;
mod facts;
mod load_control;
mod maintenance;
mod registry;
mod staging;

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
