//! Calendar dimension storage.

use crate::connection::WarehouseDb;
use crate::error::{StoreResult, StoreResultExt};
use crate::traits::CalendarStore;
use lf_core::CalendarDay;

impl CalendarStore for WarehouseDb {
    fn calendar_is_populated(&self) -> StoreResult<bool> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM dw.dim_calendar", [], |row| row.get(0))
            .query_context("count dim_calendar")?;
        Ok(count > 0)
    }

    fn insert_calendar(&self, days: &[CalendarDay]) -> StoreResult<usize> {
        self.transaction(|conn| {
            let mut stmt = conn
                .prepare(
                    "INSERT OR REPLACE INTO dw.dim_calendar
                         (date_key, year, quarter, month, month_name, day,
                          iso_week, weekday, is_weekend)
                     VALUES (CAST(? AS DATE), ?, ?, ?, ?, ?, ?, ?, ?)",
                )
                .query_context("prepare insert dim_calendar")?;

            for day in days {
                stmt.execute(duckdb::params![
                    day.date.format("%Y-%m-%d").to_string(),
                    day.year,
                    day.quarter as i32,
                    day.month as i32,
                    day.month_name,
                    day.day as i32,
                    day.iso_week as i32,
                    day.weekday,
                    day.is_weekend,
                ])
                .query_context("insert dim_calendar")?;
            }
            Ok(days.len())
        })
    }
}
