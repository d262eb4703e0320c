#![forbid(unsafe_code)]
#![allow(dead_code)]

use lineage_core::{Edge, LineageGraph, Node, NodeType, Relationship, Snapshot, Vocabulary};

#[derive(Default)]
pub(crate) struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn node(mut self, id: &str, node_type: &str) -> Self {
        self.nodes
            .push(Node::new(id, NodeType::parse(node_type), format!("{id} title")));
        self
    }

    pub(crate) fn requirement(self, id: &str) -> Self {
        self.node(id, "REQUIREMENT")
    }

    pub(crate) fn coded_requirement(mut self, id: &str, code: &str, title: &str) -> Self {
        self.nodes
            .push(Node::new(id, NodeType::Requirement, title).with_code(code));
        self
    }

    pub(crate) fn story(self, id: &str) -> Self {
        self.node(id, "USER_STORY")
    }

    pub(crate) fn task(self, id: &str) -> Self {
        self.node(id, "TASK")
    }

    pub(crate) fn edge(mut self, source: &str, relationship: &str, target: &str) -> Self {
        self.edges
            .push(Edge::new(source, Relationship::parse(relationship), target));
        self
    }

    pub(crate) fn snapshot(self) -> Snapshot {
        Snapshot {
            project_id: Some("PRJ-TEST".to_string()),
            nodes: self.nodes,
            edges: self.edges,
        }
    }

    pub(crate) fn build(self) -> LineageGraph {
        LineageGraph::from_snapshot(self.snapshot())
    }

    pub(crate) fn build_with(self, vocabulary: Vocabulary) -> LineageGraph {
        LineageGraph::from_snapshot_with(vocabulary, self.snapshot())
    }
}

pub(crate) fn ids(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(|n| n.id.as_str()).collect()
}
