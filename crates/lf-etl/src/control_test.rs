use super::*;
use chrono::TimeZone;
use lf_store::MemoryStore;

const T1: TenantId = TenantId::new(1);
const CRED: CredentialId = CredentialId::new(10);

#[test]
fn first_commit_marks_full_done_and_watermark() {
    let store = MemoryStore::new();
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();

    let mut tracker = PassTracker::new();
    tracker.observe(T1, CRED, Some(at));
    tracker.observe(T1, CRED, None);
    tracker.commit(&store, EntityKind::Person).unwrap();

    let state = store
        .get(&LoadControlKey {
            tenant: T1,
            credential: CRED,
            entity: EntityKind::Person,
        })
        .unwrap();
    assert!(state.full_load_done);
    assert_eq!(state.last_processed_watermark, Some(at));
}

#[test]
fn tracker_keeps_the_maximum_watermark() {
    let early = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    let late = Utc.with_ymd_and_hms(2024, 5, 9, 0, 0, 0).unwrap();

    let mut tracker = PassTracker::new();
    tracker.observe(T1, CRED, Some(late));
    tracker.observe(T1, CRED, Some(early));
    assert_eq!(tracker.seen[&(T1, CRED)], Some(late));
}

#[test]
fn pairs_without_collected_at_fall_back_to_now() {
    let store = MemoryStore::new();
    let before = Utc::now();

    let mut tracker = PassTracker::new();
    tracker.observe(T1, CRED, None);
    tracker.commit(&store, EntityKind::Sale).unwrap();

    let state = store
        .get(&LoadControlKey {
            tenant: T1,
            credential: CRED,
            entity: EntityKind::Sale,
        })
        .unwrap();
    let watermark = state.last_processed_watermark.unwrap();
    assert!(watermark >= before);
}
