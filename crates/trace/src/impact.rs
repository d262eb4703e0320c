#![forbid(unsafe_code)]

use crate::TraceError;
use lineage_core::{LineageError, LineageGraph, Node, Relationship, Vocabulary};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::str::FromStr;

pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Non-negative traversal depth limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MaxDepth(u32);

impl MaxDepth {
    pub fn try_new(value: i64) -> Result<Self, TraceError> {
        if value < 0 {
            return Err(TraceError::InvalidDepth(value));
        }
        Ok(Self(u32::try_from(value).unwrap_or(u32::MAX)))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for MaxDepth {
    fn default() -> Self {
        Self(DEFAULT_MAX_DEPTH)
    }
}

impl From<u32> for MaxDepth {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Follow edges backward, toward what the start node derives from.
    Upstream,
    /// Follow edges forward, toward what the start node affects.
    Downstream,
}

impl Direction {
    pub fn parse(value: &str) -> Result<Self, TraceError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "upstream" => Ok(Self::Upstream),
            "downstream" => Ok(Self::Downstream),
            _ => Err(TraceError::UnknownDirection(value.trim().to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upstream => "upstream",
            Self::Downstream => "downstream",
        }
    }
}

impl FromStr for Direction {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImpactQuery {
    pub start: String,
    pub direction: Direction,
    pub max_depth: MaxDepth,
    /// Only edges with one of these relationships are followed; `None` follows all.
    pub relationships: Option<Vec<Relationship>>,
}

impl ImpactQuery {
    pub fn new(start: impl Into<String>, direction: Direction) -> Self {
        Self {
            start: start.into(),
            direction,
            max_depth: MaxDepth::default(),
            relationships: None,
        }
    }

    pub fn upstream(start: impl Into<String>) -> Self {
        Self::new(start, Direction::Upstream)
    }

    pub fn downstream(start: impl Into<String>) -> Self {
        Self::new(start, Direction::Downstream)
    }

    pub fn with_max_depth(mut self, max_depth: MaxDepth) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_relationships(mut self, relationships: Vec<Relationship>) -> Self {
        self.relationships = Some(relationships);
        self
    }

    /// Resolves relationship names through `vocabulary`; no names keeps every
    /// relationship.
    pub fn with_relationship_names<I, S>(
        self,
        vocabulary: &Vocabulary,
        names: I,
    ) -> Result<Self, TraceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let relationships = names
            .into_iter()
            .map(|name| vocabulary.relationship(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        if relationships.is_empty() {
            return Ok(self);
        }
        Ok(self.with_relationships(relationships))
    }

    fn follows(&self, relationship: &Relationship) -> bool {
        self.relationships
            .as_ref()
            .is_none_or(|allowed| allowed.contains(relationship))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactNode {
    pub node: Node,
    pub depth: u32,
    /// Relationship of the edge the node was first reached through.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<Relationship>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactResult {
    /// The start node at depth 0, absent when its id is not in the snapshot.
    pub start: Option<ImpactNode>,
    pub direction: Direction,
    pub requested_depth: u32,
    /// Reachable nodes in breadth-first order, each at its shallowest depth.
    pub nodes: Vec<ImpactNode>,
    pub total: usize,
    pub max_depth_reached: u32,
}

impl ImpactResult {
    fn empty(query: &ImpactQuery) -> Self {
        Self {
            start: None,
            direction: query.direction,
            requested_depth: query.max_depth.get(),
            nodes: Vec::new(),
            total: 0,
            max_depth_reached: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn depth_of(&self, id: &str) -> Option<u32> {
        self.nodes
            .iter()
            .find(|entry| entry.node.id == id)
            .map(|entry| entry.depth)
    }

    /// Reachable node count per node type name.
    pub fn count_by_type(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.nodes {
            *counts
                .entry(entry.node.node_type.as_str().to_string())
                .or_insert(0) += 1;
        }
        counts
    }
}

/// Breadth-first impact traversal from `query.start`.
///
/// Every node is reported once, at the depth it was first discovered, so
/// cycles terminate. Nodes at the depth limit are not expanded. Edges whose
/// far end is not in the snapshot are skipped.
pub fn analyze_impact(graph: &LineageGraph, query: &ImpactQuery) -> Result<ImpactResult, TraceError> {
    if let Some(relationships) = &query.relationships {
        if let Some(unknown) = relationships
            .iter()
            .find(|rel| !graph.vocabulary().knows_relationship(rel))
        {
            return Err(LineageError::UnknownRelationship(unknown.to_string()).into());
        }
    }

    let Some(start) = graph.node(&query.start) else {
        tracing::debug!(start = %query.start, "impact start node not in snapshot");
        return Ok(ImpactResult::empty(query));
    };

    let limit = query.max_depth.get();
    let downstream = query.direction == Direction::Downstream;
    let mut visited = HashSet::from([start.id.as_str()]);
    let mut queue = VecDeque::from([(start, 0u32)]);
    let mut nodes = Vec::new();

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= limit {
            continue;
        }
        let forward = downstream.then(|| graph.outgoing(&current.id));
        let backward = (!downstream).then(|| graph.incoming(&current.id));
        for edge in forward.into_iter().flatten().chain(backward.into_iter().flatten()) {
            if !query.follows(&edge.relationship) {
                continue;
            }
            let next_id = if downstream { &edge.target } else { &edge.source };
            let Some(next) = graph.node(next_id) else {
                continue;
            };
            if !visited.insert(next.id.as_str()) {
                continue;
            }
            nodes.push(ImpactNode {
                node: next.clone(),
                depth: depth + 1,
                via: Some(edge.relationship.clone()),
            });
            queue.push_back((next, depth + 1));
        }
    }

    let max_depth_reached = nodes.iter().map(|entry| entry.depth).max().unwrap_or(0);
    tracing::debug!(
        start = %start.id,
        direction = query.direction.as_str(),
        reached = nodes.len(),
        depth = max_depth_reached,
        "impact analysis complete"
    );

    Ok(ImpactResult {
        start: Some(ImpactNode {
            node: start.clone(),
            depth: 0,
            via: None,
        }),
        direction: query.direction,
        requested_depth: limit,
        total: nodes.len(),
        nodes,
        max_depth_reached,
    })
}
