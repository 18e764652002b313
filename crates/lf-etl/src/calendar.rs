//! Calendar dimension build step.

use crate::error::EtlResult;
use lf_core::{calendar_days, StepStats};
use lf_store::CalendarStore;

/// Generate the calendar dimension if it is not already populated.
///
/// Tenant-independent and idempotent: a populated table makes this a no-op.
pub(crate) fn ensure_calendar<S: CalendarStore>(store: &S) -> EtlResult<StepStats> {
    if store.calendar_is_populated()? {
        log::debug!("dim:calendar already populated, skipping");
        return Ok(StepStats::default());
    }

    let days = calendar_days();
    let upserted = store.insert_calendar(&days)?;
    Ok(StepStats {
        upserted,
        skipped: 0,
    })
}

#[cfg(test)]
#[path = "calendar_test.rs"]
mod tests;
