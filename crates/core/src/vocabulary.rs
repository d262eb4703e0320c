#![forbid(unsafe_code)]

use crate::LineageError;
use crate::model::{NodeType, Relationship};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const MAX_NAME_LEN: usize = 128;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VocabularyNameError {
    Empty,
    TooLong,
    ContainsPipe,
    ContainsControl,
}

impl VocabularyNameError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "name must not be empty",
            Self::TooLong => "name is too long",
            Self::ContainsPipe => "name must not contain '|'",
            Self::ContainsControl => "name contains control characters",
        }
    }
}

pub fn validate_vocabulary_name(value: &str) -> Result<(), VocabularyNameError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(VocabularyNameError::Empty);
    }
    if trimmed.len() > MAX_NAME_LEN {
        return Err(VocabularyNameError::TooLong);
    }
    if trimmed.contains('|') {
        return Err(VocabularyNameError::ContainsPipe);
    }
    if trimmed.chars().any(|c| c.is_control()) {
        return Err(VocabularyNameError::ContainsControl);
    }
    Ok(())
}

/// Which node types and relationships play each role in the
/// requirement -> story -> task coverage chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageLayers {
    pub requirement: NodeType,
    pub story: NodeType,
    pub task: NodeType,
    pub derives: Relationship,
    pub breaks_down_to: Relationship,
    pub implemented_by: Relationship,
}

impl Default for CoverageLayers {
    fn default() -> Self {
        Self {
            requirement: NodeType::Requirement,
            story: NodeType::UserStory,
            task: NodeType::Task,
            derives: Relationship::Derives,
            breaks_down_to: Relationship::BreaksDownTo,
            implemented_by: Relationship::ImplementedBy,
        }
    }
}

/// Node-type and relationship vocabulary of one artifact taxonomy.
///
/// The default is the requirements-management vocabulary. Other taxonomies
/// load theirs from YAML or JSON:
///
/// ```yaml
/// node_types: [EPIC, FEATURE, STORY, TASK]
/// relationships: [REFINES, SPLITS_INTO, IMPLEMENTED_BY]
/// coverage:
///   requirement: FEATURE
///   story: STORY
///   task: TASK
///   derives: REFINES
///   breaks_down_to: SPLITS_INTO
///   implemented_by: IMPLEMENTED_BY
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub node_types: Vec<NodeType>,
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub coverage: CoverageLayers,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            node_types: vec![
                NodeType::Requirement,
                NodeType::UserStory,
                NodeType::Task,
                NodeType::Sprint,
            ],
            relationships: vec![
                Relationship::Derives,
                Relationship::BreaksDownTo,
                Relationship::ImplementedBy,
            ],
            coverage: CoverageLayers::default(),
        }
    }
}

impl Vocabulary {
    pub fn from_yaml_str(raw: &str) -> Result<Self, LineageError> {
        let vocabulary: Self = serde_yaml::from_str(raw)?;
        vocabulary.validate()?;
        Ok(vocabulary)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, LineageError> {
        let vocabulary: Self = serde_json::from_str(raw)?;
        vocabulary.validate()?;
        Ok(vocabulary)
    }

    /// Reads a vocabulary file; the extension picks the format.
    pub fn load(path: &Path) -> Result<Self, LineageError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        let raw = std::fs::read_to_string(path)?;
        let vocabulary = match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&raw)?,
            "json" => Self::from_json_str(&raw)?,
            _ => return Err(LineageError::UnsupportedFormat(path.display().to_string())),
        };
        tracing::debug!(
            path = %path.display(),
            node_types = vocabulary.node_types.len(),
            relationships = vocabulary.relationships.len(),
            "vocabulary loaded"
        );
        Ok(vocabulary)
    }

    pub fn validate(&self) -> Result<(), LineageError> {
        check_names(self.node_types.iter().map(NodeType::as_str))?;
        check_names(self.relationships.iter().map(Relationship::as_str))?;

        let layers = &self.coverage;
        for node_type in [&layers.requirement, &layers.story, &layers.task] {
            if !self.knows_node_type(node_type) {
                return Err(LineageError::Vocabulary {
                    name: node_type.to_string(),
                    reason: "coverage role is not listed in node_types",
                });
            }
        }
        for rel in [
            &layers.derives,
            &layers.breaks_down_to,
            &layers.implemented_by,
        ] {
            if !self.knows_relationship(rel) {
                return Err(LineageError::Vocabulary {
                    name: rel.to_string(),
                    reason: "coverage role is not listed in relationships",
                });
            }
        }
        Ok(())
    }

    pub fn knows_node_type(&self, node_type: &NodeType) -> bool {
        self.node_types.contains(node_type)
    }

    pub fn knows_relationship(&self, relationship: &Relationship) -> bool {
        self.relationships.contains(relationship)
    }

    /// Resolves a caller-supplied relationship name against this vocabulary.
    pub fn relationship(&self, name: &str) -> Result<Relationship, LineageError> {
        let relationship = Relationship::parse(name);
        if validate_vocabulary_name(name).is_err() || !self.knows_relationship(&relationship) {
            return Err(LineageError::UnknownRelationship(name.trim().to_string()));
        }
        Ok(relationship)
    }
}

fn check_names<'a>(names: impl Iterator<Item = &'a str>) -> Result<(), LineageError> {
    let mut seen = HashSet::new();
    for name in names {
        validate_vocabulary_name(name).map_err(|err| LineageError::Vocabulary {
            name: name.to_string(),
            reason: err.message(),
        })?;
        if !seen.insert(name) {
            return Err(LineageError::Vocabulary {
                name: name.to_string(),
                reason: "duplicate entry",
            });
        }
    }
    Ok(())
}
