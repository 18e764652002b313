//! Pipeline run reporting
//!
//! The orchestrator records one entry per step so callers (schedulers,
//! consoles) can see what ran, what it touched, and what failed, without
//! the core retrying anything itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ids::TenantId;

/// Row counters produced by one loader pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepStats {
    /// Rows inserted or updated in the warehouse.
    pub upserted: usize,
    /// Malformed staging rows skipped with a warning.
    pub skipped: usize,
}

impl StepStats {
    pub fn merge(self, other: StepStats) -> StepStats {
        StepStats {
            upserted: self.upserted + other.upserted,
            skipped: self.skipped + other.skipped,
        }
    }
}

/// Outcome of one pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Succeeded,
    Failed,
}

/// Status of a whole pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Run is currently in progress
    Running,
    /// Every step succeeded
    Completed,
    /// At least one step failed (independent steps still ran)
    Failed,
}

/// Report entry for one executed step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    /// Step name, e.g. `dim:category` or `fact:ledger`
    pub name: String,

    pub status: StepStatus,

    /// Rows touched; zero on failure
    pub stats: StepStats,

    /// Error message when the step failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
}

/// Structured report for one orchestrator invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Short unique identifier for this run
    pub run_id: String,

    /// Tenant filter the run was invoked with; `None` means all tenants
    pub tenant: Option<TenantId>,

    pub status: RunStatus,

    pub steps: Vec<StepReport>,

    pub started_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunReport {
    pub fn new(tenant: Option<TenantId>) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string()[..8].to_string(),
            tenant,
            status: RunStatus::Running,
            steps: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Record a step that completed successfully.
    pub fn record_success(&mut self, name: &str, stats: StepStats, started_at: DateTime<Utc>) {
        let finished_at = Utc::now();
        self.steps.push(StepReport {
            name: name.to_string(),
            status: StepStatus::Succeeded,
            stats,
            error: None,
            started_at,
            finished_at,
            duration_ms: duration_ms(started_at, finished_at),
        });
    }

    /// Record a step that failed; independent steps keep running.
    pub fn record_failure(&mut self, name: &str, error: &str, started_at: DateTime<Utc>) {
        let finished_at = Utc::now();
        self.steps.push(StepReport {
            name: name.to_string(),
            status: StepStatus::Failed,
            stats: StepStats::default(),
            error: Some(error.to_string()),
            started_at,
            finished_at,
            duration_ms: duration_ms(started_at, finished_at),
        });
    }

    /// Close the report, deriving the final status from the steps.
    pub fn finish(&mut self) {
        self.status = if self.steps.iter().any(|s| s.status == StepStatus::Failed) {
            RunStatus::Failed
        } else {
            RunStatus::Completed
        };
        self.finished_at = Some(Utc::now());
    }

    pub fn failed_steps(&self) -> Vec<&StepReport> {
        self.steps
            .iter()
            .filter(|s| s.status == StepStatus::Failed)
            .collect()
    }

    /// Get summary statistics
    pub fn summary(&self) -> RunReportSummary {
        RunReportSummary {
            succeeded: self
                .steps
                .iter()
                .filter(|s| s.status == StepStatus::Succeeded)
                .count(),
            failed: self.failed_steps().len(),
            rows_upserted: self.steps.iter().map(|s| s.stats.upserted).sum(),
            rows_skipped: self.steps.iter().map(|s| s.stats.skipped).sum(),
            total_duration_ms: self.steps.iter().map(|s| s.duration_ms).sum(),
        }
    }
}

/// Summary statistics for a run report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReportSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub rows_upserted: usize,
    pub rows_skipped: usize,
    pub total_duration_ms: u64,
}

fn duration_ms(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    (end - start).num_milliseconds().max(0) as u64
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
