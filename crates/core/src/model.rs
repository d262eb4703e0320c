#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Artifact kind of a lineage node.
///
/// Known kinds get their own variant; anything else a project's taxonomy
/// defines is carried as `Other` with the name it arrived with. Names match
/// exactly after trimming, so `task` is `Other("task")`, not `Task`. Equality
/// and hashing go through the wire name, so `Other("TASK")` equals `Task`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeType {
    Requirement,
    UserStory,
    Task,
    Sprint,
    Other(String),
}

impl NodeType {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed {
            "REQUIREMENT" => Self::Requirement,
            "USER_STORY" => Self::UserStory,
            "TASK" => Self::Task,
            "SPRINT" => Self::Sprint,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Requirement => "REQUIREMENT",
            Self::UserStory => "USER_STORY",
            Self::Task => "TASK",
            Self::Sprint => "SPRINT",
            Self::Other(name) => name.as_str(),
        }
    }
}

impl PartialEq for NodeType {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for NodeType {}

impl Hash for NodeType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for NodeType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for NodeType {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<NodeType> for String {
    fn from(value: NodeType) -> Self {
        match value {
            NodeType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// Typed, directed relationship carried by an edge.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Relationship {
    /// requirement -> user story
    Derives,
    /// user story -> task
    BreaksDownTo,
    /// requirement -> task, bypassing the story layer
    ImplementedBy,
    Other(String),
}

impl Relationship {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed {
            "DERIVES" => Self::Derives,
            "BREAKS_DOWN_TO" => Self::BreaksDownTo,
            "IMPLEMENTED_BY" => Self::ImplementedBy,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Derives => "DERIVES",
            Self::BreaksDownTo => "BREAKS_DOWN_TO",
            Self::ImplementedBy => "IMPLEMENTED_BY",
            Self::Other(name) => name.as_str(),
        }
    }
}

impl PartialEq for Relationship {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Relationship {}

impl Hash for Relationship {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Relationship {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for Relationship {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<Relationship> for String {
    fn from(value: Relationship) -> Self {
        match value {
            Relationship::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: NodeType, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type,
            code: None,
            title: title.into(),
            status: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub relationship: Relationship,
}

impl Edge {
    pub fn new(
        source: impl Into<String>,
        relationship: Relationship,
        target: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relationship,
        }
    }

    /// `source|relationship|target`, the key integrity issues are reported under.
    pub fn key(&self) -> String {
        format!("{}|{}|{}", self.source, self.relationship, self.target)
    }
}

/// Point-in-time copy of one project's lineage graph, as handed over by the
/// snapshot supplier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Snapshot {
    pub fn from_json_str(raw: &str) -> Result<Self, crate::LineageError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json_reader(reader: impl std::io::Read) -> Result<Self, crate::LineageError> {
        Ok(serde_json::from_reader(reader)?)
    }
}
