//! Load-control bookkeeping shared by all loaders.
//!
//! Each loader observes every (tenant, credential) pair it processed and the
//! staging watermarks it saw, then commits one load-control update per pair
//! after the pass succeeds. The first successful pass for a key also marks
//! the full load done, so callers can pick full vs. incremental next time.

use crate::error::EtlResult;
use chrono::{DateTime, Utc};
use lf_core::{CredentialId, EntityKind, LoadControlKey, TenantId};
use lf_store::LoadControlStore;
use std::collections::HashMap;

/// Accumulates per-(tenant, credential) watermarks during one loader pass.
#[derive(Debug, Default)]
pub(crate) struct PassTracker {
    seen: HashMap<(TenantId, CredentialId), Option<DateTime<Utc>>>,
}

impl PassTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record that a staging row for this pair was processed.
    ///
    /// The tracked watermark is the maximum `collected_at` seen; pairs whose
    /// rows carry none fall back to `now` at commit time.
    pub(crate) fn observe(
        &mut self,
        tenant: TenantId,
        credential: CredentialId,
        collected_at: Option<DateTime<Utc>>,
    ) {
        let entry = self.seen.entry((tenant, credential)).or_default();
        if let Some(at) = collected_at {
            if entry.map_or(true, |current| at > current) {
                *entry = Some(at);
            }
        }
    }

    /// Commit one load-control update per observed pair.
    pub(crate) fn commit<S: LoadControlStore>(
        self,
        store: &S,
        entity: EntityKind,
    ) -> EtlResult<()> {
        for ((tenant, credential), watermark) in self.seen {
            let key = LoadControlKey {
                tenant,
                credential,
                entity,
            };
            if !store.get(&key)?.full_load_done {
                store.mark_full_done(&key)?;
            }
            store.mark_incremental(&key, watermark)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "control_test.rs"]
mod tests;
