use super::*;

#[test]
fn test_new_report_is_running() {
    let report = RunReport::new(Some(TenantId::new(7)));

    assert_eq!(report.status, RunStatus::Running);
    assert_eq!(report.run_id.len(), 8);
    assert!(report.steps.is_empty());
    assert!(report.finished_at.is_none());
}

#[test]
fn test_finish_with_all_successes() {
    let mut report = RunReport::new(None);
    report.record_success(
        "dim:category",
        StepStats {
            upserted: 10,
            skipped: 1,
        },
        Utc::now(),
    );
    report.record_success("fact:ledger", StepStats::default(), Utc::now());
    report.finish();

    assert_eq!(report.status, RunStatus::Completed);
    assert!(report.finished_at.is_some());
}

#[test]
fn test_finish_with_a_failure() {
    let mut report = RunReport::new(None);
    report.record_success("dim:category", StepStats::default(), Utc::now());
    report.record_failure("fact:ledger", "dimension missing", Utc::now());
    report.finish();

    assert_eq!(report.status, RunStatus::Failed);
    let failed = report.failed_steps();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].name, "fact:ledger");
    assert_eq!(failed[0].error.as_deref(), Some("dimension missing"));
}

#[test]
fn test_summary() {
    let mut report = RunReport::new(None);
    report.record_success(
        "dim:category",
        StepStats {
            upserted: 5,
            skipped: 2,
        },
        Utc::now(),
    );
    report.record_success(
        "dim:person",
        StepStats {
            upserted: 3,
            skipped: 0,
        },
        Utc::now(),
    );
    report.record_failure("fact:sale", "boom", Utc::now());

    let summary = report.summary();
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.rows_upserted, 8);
    assert_eq!(summary.rows_skipped, 2);
}

#[test]
fn test_report_serializes_to_json() {
    let mut report = RunReport::new(Some(TenantId::new(1)));
    report.record_success("calendar", StepStats::default(), Utc::now());
    report.finish();

    let json = serde_json::to_string(&report).unwrap();
    let parsed: RunReport = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.run_id, report.run_id);
    assert_eq!(parsed.steps.len(), 1);
    assert_eq!(parsed.status, RunStatus::Completed);
}

#[test]
fn test_step_stats_merge() {
    let a = StepStats {
        upserted: 2,
        skipped: 1,
    };
    let b = StepStats {
        upserted: 3,
        skipped: 0,
    };

    assert_eq!(
        a.merge(b),
        StepStats {
            upserted: 5,
            skipped: 1
        }
    );
}
