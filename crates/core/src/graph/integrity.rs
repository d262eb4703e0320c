#![forbid(unsafe_code)]

use super::LineageGraph;
use crate::model::Edge;
use serde::Serialize;

pub const EDGE_ENDPOINT_MISSING: &str = "EDGE_ENDPOINT_MISSING";
pub const DUPLICATE_NODE_ID: &str = "DUPLICATE_NODE_ID";
pub const UNKNOWN_NODE_TYPE: &str = "UNKNOWN_NODE_TYPE";
pub const UNKNOWN_RELATIONSHIP: &str = "UNKNOWN_RELATIONSHIP";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IntegrityIssue {
    pub code: &'static str,
    pub message: String,
    pub kind: &'static str,
    pub key: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub ok: bool,
    pub nodes: usize,
    pub edges: usize,
    pub issues: Vec<IntegrityIssue>,
}

impl LineageGraph {
    /// Lists data-integrity gaps in the snapshot. Informational only:
    /// analysis tolerates every gap reported here.
    pub fn validate(&self, max_issues: usize) -> IntegrityReport {
        let max_issues = max_issues.clamp(1, 500);

        let duplicates = self.shadowed_nodes().iter().map(|node| IntegrityIssue {
            code: DUPLICATE_NODE_ID,
            message: "node id already used by an earlier node".to_string(),
            kind: "node",
            key: node.id.clone(),
        });
        let unknown_types = self
            .nodes()
            .iter()
            .filter(|node| !self.vocabulary().knows_node_type(&node.node_type))
            .map(|node| IntegrityIssue {
                code: UNKNOWN_NODE_TYPE,
                message: format!("node type {} is not in the vocabulary", node.node_type),
                kind: "node",
                key: node.id.clone(),
            });
        let edge_issues = self
            .edges()
            .iter()
            .flat_map(|edge| self.edge_issues(edge));

        let issues = duplicates
            .chain(unknown_types)
            .chain(edge_issues)
            .take(max_issues)
            .collect::<Vec<_>>();

        if !issues.is_empty() {
            tracing::debug!(issues = issues.len(), "lineage snapshot has integrity gaps");
        }

        IntegrityReport {
            ok: issues.is_empty(),
            nodes: self.node_count(),
            edges: self.edge_count(),
            issues,
        }
    }

    fn edge_issues(&self, edge: &Edge) -> Vec<IntegrityIssue> {
        let mut out = Vec::new();
        if !self.contains(&edge.source) || !self.contains(&edge.target) {
            out.push(IntegrityIssue {
                code: EDGE_ENDPOINT_MISSING,
                message: "edge endpoint is missing".to_string(),
                kind: "edge",
                key: edge.key(),
            });
        }
        if !self.vocabulary().knows_relationship(&edge.relationship) {
            out.push(IntegrityIssue {
                code: UNKNOWN_RELATIONSHIP,
                message: format!(
                    "relationship {} is not in the vocabulary",
                    edge.relationship
                ),
                kind: "edge",
                key: edge.key(),
            });
        }
        out
    }
}
