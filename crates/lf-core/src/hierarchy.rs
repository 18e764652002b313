//! Hierarchy flattening engine.
//!
//! Reporting wants drill-down over category hierarchies of arbitrary depth,
//! so every node is flattened into a fixed-width leveled path: `level_1` is
//! the root's label, each descendant fills the next level, and anything past
//! five real levels is walked but dropped. The walk keeps a visited set so a
//! cyclic parent chain degrades to an empty path instead of looping, and a
//! separate depth cap bounds the walk independently of the output width so
//! "cyclic" and "too deep" stay distinguishable.

use crate::ids::EntityId;
use crate::staging::StagingCategory;
use std::collections::{HashMap, HashSet};

/// Fixed output width of a flattened path.
pub const LEVEL_WIDTH: usize = 5;

/// Maximum ancestors followed before the walk gives up.
///
/// Bounds the walk independently of [`LEVEL_WIDTH`]; a chain between 5 and
/// 10 levels is still resolved (excess labels dropped), one past 10 is not.
pub const WALK_DEPTH_CAP: usize = 10;

/// How a flatten walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlattenOutcome {
    /// Reached the root within the depth cap.
    Resolved,
    /// The node id is not in the map.
    Unknown,
    /// The parent chain revisited a node.
    Cycle,
    /// The walk hit [`WALK_DEPTH_CAP`] before reaching the root.
    TooDeep,
}

/// A node's labels from root (level 1) down, plus the actual depth.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenedPath {
    pub levels: [Option<String>; LEVEL_WIDTH],
    pub depth: u8,
    pub outcome: FlattenOutcome,
}

impl FlattenedPath {
    fn empty(outcome: FlattenOutcome) -> Self {
        Self {
            levels: Default::default(),
            depth: 0,
            outcome,
        }
    }

    /// Build a path from root-first labels, clamping to [`LEVEL_WIDTH`].
    fn from_labels<I: IntoIterator<Item = String>>(labels: I, outcome: FlattenOutcome) -> Self {
        let mut levels: [Option<String>; LEVEL_WIDTH] = Default::default();
        let mut depth = 0u8;
        for label in labels.into_iter().take(LEVEL_WIDTH) {
            levels[depth as usize] = Some(label);
            depth += 1;
        }
        Self {
            levels,
            depth,
            outcome,
        }
    }

    /// Append one synthetic leaf level, if the output width allows.
    ///
    /// Used by the DRE variant to expand linked financial categories.
    pub fn with_appended(&self, label: &str) -> Option<Self> {
        if (self.depth as usize) >= LEVEL_WIDTH {
            return None;
        }
        let mut expanded = self.clone();
        expanded.levels[expanded.depth as usize] = Some(label.to_string());
        expanded.depth += 1;
        Some(expanded)
    }
}

struct Node {
    label: String,
    parent: Option<EntityId>,
}

/// In-memory adjacency map over one tenant's category snapshot.
///
/// Built once per loader pass from the staging rows, then queried per row.
pub struct HierarchyMap {
    nodes: HashMap<EntityId, Node>,
}

impl HierarchyMap {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    pub fn insert(&mut self, id: EntityId, label: impl Into<String>, parent: Option<EntityId>) {
        self.nodes.insert(
            id,
            Node {
                label: label.into(),
                parent,
            },
        );
    }

    /// Build the map from staging categories; rows without a name are left
    /// out (their loader skips them anyway) so labels are always present.
    pub fn from_categories(rows: &[StagingCategory]) -> Self {
        let mut map = Self::new();
        for row in rows {
            if let Some(name) = &row.name {
                map.insert(row.category_id, name.clone(), row.parent_id);
            }
        }
        map
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Flatten `node_id` into its leveled path.
    ///
    /// Walks the parent pointer toward the root with a visited set. A cycle
    /// or an over-deep chain never fails the caller; both return a degraded
    /// path with the outcome recorded and a warning logged. A parent pointer
    /// to an id missing from the map ends the walk there, treating the last
    /// reachable ancestor as the root.
    pub fn flatten(&self, node_id: EntityId) -> FlattenedPath {
        if !self.nodes.contains_key(&node_id) {
            log::warn!("hierarchy: node {node_id} not found, returning empty path");
            return FlattenedPath::empty(FlattenOutcome::Unknown);
        }

        // Chain is collected leaf-first, then reversed so the root lands in
        // level 1.
        let mut chain: Vec<&str> = Vec::new();
        let mut visited: HashSet<EntityId> = HashSet::new();
        let mut current = Some(node_id);

        while let Some(id) = current {
            let Some(node) = self.nodes.get(&id) else {
                log::debug!("hierarchy: dangling parent {id}, treating previous node as root");
                break;
            };
            if !visited.insert(id) {
                log::warn!("hierarchy: cycle detected at node {id} while flattening {node_id}");
                return FlattenedPath::empty(FlattenOutcome::Cycle);
            }
            if chain.len() >= WALK_DEPTH_CAP {
                log::warn!(
                    "hierarchy: chain for node {node_id} exceeds depth cap {WALK_DEPTH_CAP}, truncating"
                );
                chain.reverse();
                return FlattenedPath::from_labels(
                    chain.into_iter().map(String::from),
                    FlattenOutcome::TooDeep,
                );
            }
            chain.push(&node.label);
            current = node.parent;
        }

        chain.reverse();
        FlattenedPath::from_labels(chain.into_iter().map(String::from), FlattenOutcome::Resolved)
    }
}

impl Default for HierarchyMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "hierarchy_test.rs"]
mod tests;
