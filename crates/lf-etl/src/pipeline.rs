//! Pipeline orchestration.
//!
//! One invocation runs calendar → dimensions → totalizer → facts in
//! dependency order from a step DAG. Steps are isolated: a failure is
//! recorded in the run report and independent steps keep running. A fact
//! step downstream of a failed dimension still runs and simply observes
//! incomplete dimension data; re-running after the fix heals it.

use crate::error::{EtlError, EtlResult};
use crate::{calendar, dimensions, facts};
use chrono::Utc;
use lf_core::{DimensionKind, FactKind, RunReport, StepStats, TenantId};
use lf_store::{TenantFilter, Warehouse};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::fmt;

/// One orchestrated pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Step {
    Calendar,
    Dimension(DimensionKind),
    Totalizer,
    Fact(FactKind),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Calendar => write!(f, "dim:calendar"),
            Step::Dimension(kind) => write!(f, "dim:{kind}"),
            Step::Totalizer => write!(f, "dre:totalizer"),
            Step::Fact(kind) => write!(f, "fact:{kind}"),
        }
    }
}

/// The fixed step dependency graph.
///
/// Dimensions are mutually independent; the totalizer follows the DRE
/// dimension; facts follow every dimension and the totalizer. Edges point
/// from dependency to dependent so a topological sort runs dependencies
/// first.
struct StepDag {
    graph: DiGraph<Step, ()>,
    nodes: HashMap<Step, NodeIndex>,
}

impl StepDag {
    fn build() -> Self {
        let mut dag = StepDag {
            graph: DiGraph::new(),
            nodes: HashMap::new(),
        };

        let calendar = dag.add(Step::Calendar);
        let dims: Vec<NodeIndex> = DimensionKind::all()
            .into_iter()
            .map(|kind| dag.add(Step::Dimension(kind)))
            .collect();
        let totalizer = dag.add(Step::Totalizer);
        let facts: Vec<NodeIndex> = FactKind::all()
            .into_iter()
            .map(|kind| dag.add(Step::Fact(kind)))
            .collect();

        for &dim in &dims {
            dag.graph.add_edge(calendar, dim, ());
        }
        dag.graph
            .add_edge(dag.nodes[&Step::Dimension(DimensionKind::CategoryDre)], totalizer, ());
        for &fact in &facts {
            for &dim in &dims {
                dag.graph.add_edge(dim, fact, ());
            }
            dag.graph.add_edge(totalizer, fact, ());
        }

        dag
    }

    fn add(&mut self, step: Step) -> NodeIndex {
        let idx = self.graph.add_node(step);
        self.nodes.insert(step, idx);
        idx
    }

    fn ordered_steps(&self) -> Vec<Step> {
        // The graph is fixed and acyclic by construction.
        toposort(&self.graph, None)
            .map(|indices| indices.into_iter().map(|idx| self.graph[idx]).collect())
            .unwrap_or_default()
    }
}

fn run_step<S: Warehouse>(store: &S, step: Step, filter: &TenantFilter) -> EtlResult<StepStats> {
    match step {
        Step::Calendar => calendar::ensure_calendar(store),
        Step::Dimension(kind) => dimensions::load(store, kind, filter),
        Step::Totalizer => dimensions::classify_totalizers(store, filter),
        Step::Fact(kind) => facts::load(store, kind, filter),
    }
}

/// Validate the tenant filter against the registry.
///
/// An unknown tenant fails the whole invocation before any step runs.
pub(crate) fn validate_tenant<S: Warehouse>(
    store: &S,
    tenant: Option<TenantId>,
) -> EtlResult<TenantFilter> {
    if let Some(t) = tenant {
        if !store.tenant_exists(t)? {
            return Err(EtlError::UnknownTenant(t));
        }
    }
    Ok(TenantFilter::from_option(tenant))
}

/// Run the whole pipeline within the tenant filter, returning the report.
pub fn run_pipeline<S: Warehouse>(store: &S, tenant: Option<TenantId>) -> EtlResult<RunReport> {
    let filter = validate_tenant(store, tenant)?;
    let mut report = RunReport::new(tenant);
    log::info!("pipeline run {} starting (tenant: {tenant:?})", report.run_id);

    for step in StepDag::build().ordered_steps() {
        let name = step.to_string();
        let started_at = Utc::now();
        match run_step(store, step, &filter) {
            Ok(stats) => {
                log::debug!(
                    "step {name}: {} upserted, {} skipped",
                    stats.upserted,
                    stats.skipped
                );
                report.record_success(&name, stats, started_at);
            }
            Err(err) => {
                log::warn!("step {name} failed: {err}");
                report.record_failure(&name, &err.to_string(), started_at);
            }
        }
    }

    report.finish();
    let summary = report.summary();
    log::info!(
        "pipeline run {} finished: {} succeeded, {} failed, {} rows",
        report.run_id,
        summary.succeeded,
        summary.failed,
        summary.rows_upserted
    );
    Ok(report)
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
