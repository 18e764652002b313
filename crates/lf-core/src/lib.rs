//! lf-core - Core library for LedgerFlow
//!
//! This crate provides the shared types used across the warehouse layer:
//! tenant/credential ids, entity kinds, typed staging rows, warehouse row
//! types, the hierarchy flattening engine, calendar-dimension generation,
//! load-control bookkeeping, and run reporting.

pub mod calendar;
pub mod entity;
pub mod error;
pub mod hierarchy;
pub mod ids;
pub mod load_control;
pub mod report;
pub mod rows;
pub mod staging;

pub use calendar::{calendar_days, CalendarDay, CALENDAR_END, CALENDAR_START};
pub use entity::{DimensionKind, EntityKind, FactKind};
pub use error::{CoreError, CoreResult};
pub use hierarchy::{FlattenOutcome, FlattenedPath, HierarchyMap, LEVEL_WIDTH, WALK_DEPTH_CAP};
pub use ids::{CredentialId, EntityId, TenantId};
pub use load_control::{next_watermark, LoadControlKey, LoadControlState};
pub use report::{RunReport, RunReportSummary, RunStatus, StepReport, StepStats, StepStatus};
pub use rows::{
    BalanceRow, CategoryDreRow, CategoryRow, ContractRow, CostCenterRow, LedgerEntryRow,
    PersonRow, SaleItemRow, SaleRow, TotalizerPeerRow, TotalizerRow, NO_ENTITY,
};
pub use staging::{
    Address, FinancialLink, LedgerAllocation, LedgerDirection, StagingBalance, StagingCategory,
    StagingContract, StagingCostCenter, StagingLedgerDocument, StagingLedgerInstallment,
    StagingPerson, StagingSale, StagingSaleItem,
};
