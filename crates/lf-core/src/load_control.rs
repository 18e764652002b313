//! Load-control bookkeeping types.
//!
//! One state row per (tenant, credential, entity kind) records whether a
//! full historical load completed and how far incremental loading has
//! reached. The tracker holds no strategy: callers read `full_load_done`
//! and decide full vs. incremental themselves.

use crate::entity::EntityKind;
use crate::ids::{CredentialId, TenantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Key of one load-control row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoadControlKey {
    pub tenant: TenantId,
    pub credential: CredentialId,
    pub entity: EntityKind,
}

/// State machine per key: `NEVER_LOADED -> FULL_DONE -> (INCREMENTAL*)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadControlState {
    pub full_load_done: bool,
    pub last_full_load_at: Option<DateTime<Utc>>,
    pub last_incremental_load_at: Option<DateTime<Utc>>,
    pub last_processed_watermark: Option<DateTime<Utc>>,
}

impl LoadControlState {
    /// The synthesized default for a key that has never been loaded.
    pub fn never_loaded() -> Self {
        Self {
            full_load_done: false,
            last_full_load_at: None,
            last_incremental_load_at: None,
            last_processed_watermark: None,
        }
    }
}

impl Default for LoadControlState {
    fn default() -> Self {
        Self::never_loaded()
    }
}

/// Next watermark value after a `mark_incremental(key, supplied)` call.
///
/// `now` substitutes for a missing supplied watermark; the stored value
/// never goes backwards regardless of what the caller passes.
pub fn next_watermark(
    existing: Option<DateTime<Utc>>,
    supplied: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let candidate = supplied.unwrap_or(now);
    match existing {
        Some(current) if current > candidate => current,
        _ => candidate,
    }
}

#[cfg(test)]
#[path = "load_control_test.rs"]
mod tests;
