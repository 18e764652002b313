//! Load-control table access.

use crate::connection::WarehouseDb;
use crate::error::{StoreResult, StoreResultExt};
use crate::row_helpers::{parse_timestamp, timestamp_param};
use crate::traits::LoadControlStore;
use chrono::{DateTime, Utc};
use lf_core::{next_watermark, LoadControlKey, LoadControlState};

fn get_state(db: &WarehouseDb, key: &LoadControlKey) -> StoreResult<Option<LoadControlState>> {
    let mut stmt = db
        .conn()
        .prepare(
            "SELECT full_load_done,
                    CAST(last_full_load_at AS VARCHAR),
                    CAST(last_incremental_load_at AS VARCHAR),
                    CAST(last_processed_watermark AS VARCHAR)
             FROM dw.load_control
             WHERE tenant_id = ? AND credential_id = ? AND entity_kind = ?",
        )
        .query_context("prepare load_control get")?;

    let mut rows = stmt
        .query_map(
            duckdb::params![
                key.tenant.raw(),
                key.credential.raw(),
                key.entity.as_str()
            ],
            |row| {
                Ok((
                    row.get::<_, bool>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            },
        )
        .query_context("query load_control get")?;

    let Some(row) = rows.next() else {
        return Ok(None);
    };
    let (full_load_done, full_at, incr_at, watermark) =
        row.query_context("row load_control get")?;

    Ok(Some(LoadControlState {
        full_load_done,
        last_full_load_at: parse_timestamp(full_at)?,
        last_incremental_load_at: parse_timestamp(incr_at)?,
        last_processed_watermark: parse_timestamp(watermark)?,
    }))
}

fn upsert_state(db: &WarehouseDb, key: &LoadControlKey, state: &LoadControlState) -> StoreResult<()> {
    db.conn()
        .execute(
            "INSERT OR REPLACE INTO dw.load_control
                 (tenant_id, credential_id, entity_kind, full_load_done,
                  last_full_load_at, last_incremental_load_at, last_processed_watermark)
             VALUES (?, ?, ?, ?, CAST(? AS TIMESTAMP), CAST(? AS TIMESTAMP),
                     CAST(? AS TIMESTAMP))",
            duckdb::params![
                key.tenant.raw(),
                key.credential.raw(),
                key.entity.as_str(),
                state.full_load_done,
                timestamp_param(state.last_full_load_at),
                timestamp_param(state.last_incremental_load_at),
                timestamp_param(state.last_processed_watermark),
            ],
        )
        .query_context("upsert load_control")?;
    Ok(())
}

impl LoadControlStore for WarehouseDb {
    fn get(&self, key: &LoadControlKey) -> StoreResult<LoadControlState> {
        Ok(get_state(self, key)?.unwrap_or_else(LoadControlState::never_loaded))
    }

    fn mark_full_done(&self, key: &LoadControlKey) -> StoreResult<()> {
        let mut state = self.get(key)?;
        state.full_load_done = true;
        state.last_full_load_at = Some(Utc::now());
        upsert_state(self, key, &state)
    }

    fn mark_incremental(
        &self,
        key: &LoadControlKey,
        watermark: Option<DateTime<Utc>>,
    ) -> StoreResult<()> {
        let now = Utc::now();
        let mut state = self.get(key)?;
        state.last_incremental_load_at = Some(now);
        state.last_processed_watermark =
            Some(next_watermark(state.last_processed_watermark, watermark, now));
        upsert_state(self, key, &state)
    }
}
