#![forbid(unsafe_code)]

use crate::TraceError;
use crate::coverage::{Coverage, TraceabilityRow};
use serde::Serialize;
use std::str::FromStr;

/// Coverage selector offered to the presentation layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageFilter {
    #[default]
    All,
    Covered,
    Partial,
    Uncovered,
}

impl CoverageFilter {
    pub fn parse(value: &str) -> Result<Self, TraceError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "covered" => Ok(Self::Covered),
            "partial" => Ok(Self::Partial),
            "uncovered" => Ok(Self::Uncovered),
            _ => Err(TraceError::UnknownFilter(value.trim().to_string())),
        }
    }

    pub fn matches(self, coverage: Coverage) -> bool {
        match self {
            Self::All => true,
            Self::Covered => coverage == Coverage::Full,
            Self::Partial => coverage == Coverage::Partial,
            Self::Uncovered => coverage == Coverage::None,
        }
    }
}

impl FromStr for CoverageFilter {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Rows passing `filter` whose requirement code or title contains `query`,
/// ignoring case. A blank query matches every row. Order is preserved.
pub fn filter_rows<'a>(
    rows: &'a [TraceabilityRow],
    filter: CoverageFilter,
    query: &str,
) -> Vec<&'a TraceabilityRow> {
    let needle = query.trim().to_lowercase();
    rows.iter()
        .filter(|row| filter.matches(row.coverage))
        .filter(|row| needle.is_empty() || matches_query(row, &needle))
        .collect()
}

fn matches_query(row: &TraceabilityRow, needle: &str) -> bool {
    let requirement = &row.requirement;
    requirement.title.to_lowercase().contains(needle)
        || requirement
            .code
            .as_deref()
            .is_some_and(|code| code.to_lowercase().contains(needle))
}
