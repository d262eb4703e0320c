#![forbid(unsafe_code)]

use lineage_core::{LineageGraph, Node, NodeType, Relationship};
use serde::Serialize;

/// Stories and tasks with no upstream link in the coverage chain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OrphanReport {
    pub stories: Vec<Node>,
    pub tasks: Vec<Node>,
}

impl OrphanReport {
    pub fn is_empty(&self) -> bool {
        self.stories.is_empty() && self.tasks.is_empty()
    }
}

/// A story is orphaned when no existing requirement derives it. A task is
/// orphaned when no existing story breaks down to it and no existing
/// requirement is implemented by it.
pub fn find_orphans(graph: &LineageGraph) -> OrphanReport {
    let layers = &graph.vocabulary().coverage;

    let stories = graph
        .nodes_of_type(&layers.story)
        .filter(|story| !has_parent(graph, story, &layers.derives, &layers.requirement))
        .cloned()
        .collect::<Vec<_>>();

    let tasks = graph
        .nodes_of_type(&layers.task)
        .filter(|task| {
            !has_parent(graph, task, &layers.breaks_down_to, &layers.story)
                && !has_parent(graph, task, &layers.implemented_by, &layers.requirement)
        })
        .cloned()
        .collect::<Vec<_>>();

    tracing::debug!(
        stories = stories.len(),
        tasks = tasks.len(),
        "orphan scan complete"
    );
    OrphanReport { stories, tasks }
}

fn has_parent(
    graph: &LineageGraph,
    node: &Node,
    relationship: &Relationship,
    parent_type: &NodeType,
) -> bool {
    graph
        .incoming(&node.id)
        .filter(|edge| &edge.relationship == relationship)
        .filter_map(|edge| graph.node(&edge.source))
        .any(|parent| &parent.node_type == parent_type)
}
