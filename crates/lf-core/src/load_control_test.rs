use super::*;
use chrono::TimeZone;

fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

#[test]
fn test_never_loaded_default() {
    let state = LoadControlState::never_loaded();

    assert!(!state.full_load_done);
    assert!(state.last_full_load_at.is_none());
    assert!(state.last_incremental_load_at.is_none());
    assert!(state.last_processed_watermark.is_none());
}

#[test]
fn test_next_watermark_takes_supplied_when_ahead() {
    assert_eq!(next_watermark(Some(ts(100)), Some(ts(200)), ts(300)), ts(200));
}

#[test]
fn test_next_watermark_never_goes_backwards() {
    // Stale supplied cursor: keep the existing value.
    assert_eq!(next_watermark(Some(ts(200)), Some(ts(100)), ts(300)), ts(200));
}

#[test]
fn test_next_watermark_falls_back_to_now() {
    assert_eq!(next_watermark(None, None, ts(300)), ts(300));
    assert_eq!(next_watermark(Some(ts(400)), None, ts(300)), ts(400));
}

#[test]
fn test_next_watermark_monotone_over_sequences() {
    let supplies = [Some(ts(50)), None, Some(ts(500)), Some(ts(10)), None];
    let mut existing = None;
    let mut previous = ts(0);

    for (i, supplied) in supplies.into_iter().enumerate() {
        let now = ts(100 * (i as i64 + 1));
        let next = next_watermark(existing, supplied, now);
        assert!(next >= previous, "watermark regressed at step {i}");
        previous = next;
        existing = Some(next);
    }
}
