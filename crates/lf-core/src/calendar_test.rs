use super::*;

#[test]
fn test_range_endpoints() {
    let days = calendar_days();

    assert_eq!(days.first().unwrap().date, CALENDAR_START);
    assert_eq!(days.last().unwrap().date, CALENDAR_END);
}

#[test]
fn test_row_count_matches_range() {
    let days = calendar_days();
    let expected = (CALENDAR_END - CALENDAR_START).num_days() + 1;

    assert_eq!(days.len() as i64, expected);
}

#[test]
fn test_day_attributes() {
    // 2024-02-29: leap day, a Thursday, Q1, ISO week 9.
    let day = CalendarDay::from_date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

    assert_eq!(day.year, 2024);
    assert_eq!(day.quarter, 1);
    assert_eq!(day.month, 2);
    assert_eq!(day.month_name, "February");
    assert_eq!(day.day, 29);
    assert_eq!(day.iso_week, 9);
    assert_eq!(day.weekday, "Thursday");
    assert!(!day.is_weekend);
}

#[test]
fn test_weekend_flag() {
    let saturday = CalendarDay::from_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    let sunday = CalendarDay::from_date(NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
    let monday = CalendarDay::from_date(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());

    assert!(saturday.is_weekend);
    assert!(sunday.is_weekend);
    assert!(!monday.is_weekend);
}

#[test]
fn test_quarters() {
    for (month, quarter) in [(1, 1), (3, 1), (4, 2), (6, 2), (7, 3), (9, 3), (10, 4), (12, 4)] {
        let day = CalendarDay::from_date(NaiveDate::from_ymd_opt(2024, month, 15).unwrap());
        assert_eq!(day.quarter, quarter, "month {month}");
    }
}
