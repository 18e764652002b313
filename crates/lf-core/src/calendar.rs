//! Calendar dimension generation.
//!
//! Tenant-independent; generated once over a fixed multi-year range and
//! shared by every tenant's facts.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// First date in the calendar dimension.
pub const CALENDAR_START: NaiveDate = match NaiveDate::from_ymd_opt(2015, 1, 1) {
    Some(d) => d,
    None => unreachable!(),
};

/// Last date in the calendar dimension (inclusive).
pub const CALENDAR_END: NaiveDate = match NaiveDate::from_ymd_opt(2035, 12, 31) {
    Some(d) => d,
    None => unreachable!(),
};

/// One row of the calendar dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub year: i32,
    pub quarter: u32,
    pub month: u32,
    pub month_name: &'static str,
    pub day: u32,
    pub iso_week: u32,
    pub weekday: &'static str,
    pub is_weekend: bool,
}

impl CalendarDay {
    pub fn from_date(date: NaiveDate) -> Self {
        let weekday = date.weekday();
        Self {
            date,
            year: date.year(),
            quarter: (date.month() - 1) / 3 + 1,
            month: date.month(),
            month_name: month_name(date.month()),
            day: date.day(),
            iso_week: date.iso_week().week(),
            weekday: weekday_name(weekday),
            is_weekend: matches!(weekday, Weekday::Sat | Weekday::Sun),
        }
    }
}

/// All calendar rows over [`CALENDAR_START`] ..= [`CALENDAR_END`].
pub fn calendar_days() -> Vec<CalendarDay> {
    CALENDAR_START
        .iter_days()
        .take_while(|d| *d <= CALENDAR_END)
        .map(CalendarDay::from_date)
        .collect()
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        _ => "December",
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
#[path = "calendar_test.rs"]
mod tests;
