#![forbid(unsafe_code)]

use crate::LineageError;
use crate::model::{Edge, Node, NodeType, Relationship, Snapshot};
use crate::vocabulary::Vocabulary;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Read-only index over one lineage snapshot.
///
/// Node lookup and per-node edge lists are O(1). Edges are indexed by both
/// endpoints whether or not the endpoints exist, so dangling references show
/// up as failed `node` lookups during traversal rather than load errors.
#[derive(Clone, Debug)]
pub struct LineageGraph {
    vocabulary: Vocabulary,
    project_id: Option<String>,
    nodes: Vec<Node>,
    shadowed: Vec<Node>,
    edges: Vec<Edge>,
    by_id: HashMap<String, usize>,
    outgoing: HashMap<String, Vec<usize>>,
    incoming: HashMap<String, Vec<usize>>,
}

impl LineageGraph {
    pub fn load(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self::load_with(Vocabulary::default(), nodes, edges)
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self::from_snapshot_with(Vocabulary::default(), snapshot)
    }

    pub fn from_snapshot_with(vocabulary: Vocabulary, snapshot: Snapshot) -> Self {
        let mut graph = Self::load_with(vocabulary, snapshot.nodes, snapshot.edges);
        graph.project_id = snapshot.project_id;
        graph
    }

    /// Later nodes reusing an id are set aside and only surface in the
    /// integrity report.
    pub fn load_with(vocabulary: Vocabulary, nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let mut kept = Vec::with_capacity(nodes.len());
        let mut shadowed = Vec::new();
        let mut by_id = HashMap::with_capacity(nodes.len());
        for node in nodes {
            match by_id.entry(node.id.clone()) {
                Entry::Occupied(_) => {
                    tracing::warn!(id = %node.id, "duplicate node id in snapshot; keeping first");
                    shadowed.push(node);
                }
                Entry::Vacant(slot) => {
                    slot.insert(kept.len());
                    kept.push(node);
                }
            }
        }

        let mut outgoing: HashMap<String, Vec<usize>> = HashMap::new();
        let mut incoming: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, edge) in edges.iter().enumerate() {
            outgoing.entry(edge.source.clone()).or_default().push(index);
            incoming.entry(edge.target.clone()).or_default().push(index);
        }

        tracing::debug!(
            nodes = kept.len(),
            edges = edges.len(),
            duplicates = shadowed.len(),
            "lineage graph loaded"
        );

        Self {
            vocabulary,
            project_id: None,
            nodes: kept,
            shadowed,
            edges,
            by_id,
            outgoing,
            incoming,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.by_id.get(id).map(|&index| &self.nodes[index])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Nodes dropped at load because their id was already taken.
    pub fn shadowed_nodes(&self) -> &[Node] {
        &self.shadowed
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Edges leaving `id` in snapshot order, optionally limited to one relationship.
    ///
    /// A relationship the graph's vocabulary does not list is rejected rather
    /// than yielding an empty iterator.
    pub fn edges_from<'a>(
        &'a self,
        id: &str,
        relationship: Option<&'a Relationship>,
    ) -> Result<impl Iterator<Item = &'a Edge> + use<'a>, LineageError> {
        self.check_filter(relationship)?;
        Ok(filter_by(self.outgoing(id), relationship))
    }

    /// Edges arriving at `id` in snapshot order, optionally limited to one relationship.
    pub fn edges_to<'a>(
        &'a self,
        id: &str,
        relationship: Option<&'a Relationship>,
    ) -> Result<impl Iterator<Item = &'a Edge> + use<'a>, LineageError> {
        self.check_filter(relationship)?;
        Ok(filter_by(self.incoming(id), relationship))
    }

    /// Every edge leaving `id`, snapshot order.
    pub fn outgoing<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a Edge> + use<'a> {
        self.indexed_edges(self.outgoing.get(id))
    }

    /// Every edge arriving at `id`, snapshot order.
    pub fn incoming<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a Edge> + use<'a> {
        self.indexed_edges(self.incoming.get(id))
    }

    pub fn nodes_of_type<'a>(
        &'a self,
        node_type: &'a NodeType,
    ) -> impl Iterator<Item = &'a Node> + use<'a> {
        self.nodes
            .iter()
            .filter(move |node| &node.node_type == node_type)
    }

    fn check_filter(&self, relationship: Option<&Relationship>) -> Result<(), LineageError> {
        match relationship {
            Some(rel) if !self.vocabulary.knows_relationship(rel) => {
                Err(LineageError::UnknownRelationship(rel.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn indexed_edges<'a>(
        &'a self,
        indices: Option<&'a Vec<usize>>,
    ) -> impl Iterator<Item = &'a Edge> + use<'a> {
        indices
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |&index| &self.edges[index])
    }
}

fn filter_by<'a>(
    edges: impl Iterator<Item = &'a Edge>,
    relationship: Option<&'a Relationship>,
) -> impl Iterator<Item = &'a Edge> {
    edges.filter(move |edge| relationship.is_none_or(|rel| &edge.relationship == rel))
}
