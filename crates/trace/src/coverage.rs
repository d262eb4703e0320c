#![forbid(unsafe_code)]

use crate::filter::{CoverageFilter, filter_rows};
use lineage_core::{LineageGraph, Node, NodeType, Relationship};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Coverage {
    Full,
    Partial,
    None,
}

impl Coverage {
    pub fn classify(stories: usize, tasks: usize) -> Self {
        match (stories > 0, tasks > 0) {
            (true, true) => Self::Full,
            (true, false) | (false, true) => Self::Partial,
            (false, false) => Self::None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Partial => "partial",
            Self::None => "none",
        }
    }
}

/// One requirement with the stories and tasks it traces to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceabilityRow {
    pub requirement: Node,
    pub linked_stories: Vec<Node>,
    pub tasks: Vec<Node>,
    pub coverage: Coverage,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageStats {
    pub total: usize,
    pub fully_covered: usize,
    pub partially_covered: usize,
    pub uncovered: usize,
    /// Percentage of requirements with any coverage; partial counts as covered.
    pub coverage_rate: u32,
    /// Distinct stories across all rows.
    pub total_stories: usize,
    /// Distinct tasks across all rows.
    pub total_tasks: usize,
}

impl CoverageStats {
    pub fn from_rows(rows: &[TraceabilityRow]) -> Self {
        let mut stats = Self {
            total: rows.len(),
            ..Self::default()
        };
        let mut stories = HashSet::new();
        let mut tasks = HashSet::new();
        for row in rows {
            match row.coverage {
                Coverage::Full => stats.fully_covered += 1,
                Coverage::Partial => stats.partially_covered += 1,
                Coverage::None => stats.uncovered += 1,
            }
            stories.extend(row.linked_stories.iter().map(|s| s.id.as_str()));
            tasks.extend(row.tasks.iter().map(|t| t.id.as_str()));
        }
        stats.total_stories = stories.len();
        stats.total_tasks = tasks.len();
        stats.coverage_rate = percent(stats.fully_covered + stats.partially_covered, stats.total);
        stats
    }
}

/// round(100 * part / total), halves rounded up, 0 for an empty total.
fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rounded = (part * 200 + total) / (total * 2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CoverageMatrix {
    pub rows: Vec<TraceabilityRow>,
}

impl CoverageMatrix {
    /// Builds one row per requirement, in snapshot order.
    pub fn compute(graph: &LineageGraph) -> Self {
        let layers = &graph.vocabulary().coverage;
        let rows = graph
            .nodes_of_type(&layers.requirement)
            .map(|requirement| trace_requirement(graph, requirement))
            .collect::<Vec<_>>();
        tracing::debug!(
            project = graph.project_id().unwrap_or("-"),
            requirements = rows.len(),
            "coverage matrix computed"
        );
        Self { rows }
    }

    pub fn stats(&self) -> CoverageStats {
        CoverageStats::from_rows(&self.rows)
    }

    pub fn filter(&self, filter: CoverageFilter, query: &str) -> Vec<&TraceabilityRow> {
        filter_rows(&self.rows, filter, query)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn trace_requirement(graph: &LineageGraph, requirement: &Node) -> TraceabilityRow {
    let layers = &graph.vocabulary().coverage;

    let mut seen_stories = HashSet::new();
    let linked_stories = linked_nodes(
        graph,
        &requirement.id,
        &layers.derives,
        &layers.story,
        &mut seen_stories,
    );

    let mut seen_tasks = HashSet::new();
    let mut tasks = Vec::new();
    for story in &linked_stories {
        tasks.extend(linked_nodes(
            graph,
            &story.id,
            &layers.breaks_down_to,
            &layers.task,
            &mut seen_tasks,
        ));
    }
    // Direct requirement -> task links that skip the story layer.
    tasks.extend(linked_nodes(
        graph,
        &requirement.id,
        &layers.implemented_by,
        &layers.task,
        &mut seen_tasks,
    ));

    TraceabilityRow {
        requirement: requirement.clone(),
        coverage: Coverage::classify(linked_stories.len(), tasks.len()),
        linked_stories: linked_stories.into_iter().cloned().collect(),
        tasks: tasks.into_iter().cloned().collect(),
    }
}

/// Targets of `relationship` edges leaving `from` that exist and have
/// `node_type`, skipping ids already in `seen`.
fn linked_nodes<'a>(
    graph: &'a LineageGraph,
    from: &str,
    relationship: &'a Relationship,
    node_type: &NodeType,
    seen: &mut HashSet<&'a str>,
) -> Vec<&'a Node> {
    graph
        .outgoing(from)
        .filter(|edge| &edge.relationship == relationship)
        .filter_map(|edge| graph.node(&edge.target))
        .filter(|node| &node.node_type == node_type)
        .filter(|node| seen.insert(node.id.as_str()))
        .collect()
}
