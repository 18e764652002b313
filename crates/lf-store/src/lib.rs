//! DuckDB-backed warehouse storage for LedgerFlow.
//!
//! One embedded database holds the collector-owned `staging` schema and the
//! warehouse-owned `dw` schema. Loaders talk to storage exclusively through
//! the gateway traits in [`traits`], so the [`memory::MemoryStore`] fake can
//! stand in for [`connection::WarehouseDb`] in tests.

pub mod connection;
pub mod ddl;
pub mod error;
pub mod filter;
pub mod memory;
pub mod migration;
pub(crate) mod row_helpers;
pub mod seed;
mod store;
pub mod traits;

pub use connection::WarehouseDb;
pub use error::{StoreError, StoreResult};
pub use filter::TenantFilter;
pub use memory::MemoryStore;
pub use traits::{
    CalendarStore, DimensionReader, DimensionWriter, FactWriter, Finding, LedgerUpsert,
    LoadControlStore, MaintenanceStore, StagingReader, TenantRegistry, Warehouse,
};
