#![forbid(unsafe_code)]

use crate::error::CliError;
use crate::{Command, Source};
use lineage_core::{LineageGraph, Snapshot, Vocabulary};
use lineage_trace::{CoverageMatrix, ImpactQuery, MaxDepth, analyze_impact, find_orphans};
use serde_json::{Value, json};
use std::fs::File;
use std::io::{BufReader, Write};

pub(crate) fn run(command: Command, out: &mut impl Write) -> Result<(), CliError> {
    let output = match command {
        Command::Coverage {
            source,
            filter,
            query,
        } => {
            let graph = load_graph(&source)?;
            let matrix = CoverageMatrix::compute(&graph);
            let rows = matrix.filter(filter, &query);
            json!({
                "projectId": graph.project_id(),
                "filter": filter,
                "query": query,
                "stats": matrix.stats(),
                "matched": rows.len(),
                "rows": rows,
            })
        }
        Command::Impact {
            source,
            node,
            direction,
            depth,
            relationships,
        } => {
            let max_depth = MaxDepth::try_new(depth)?;
            let graph = load_graph(&source)?;
            let query = ImpactQuery::new(node, direction)
                .with_max_depth(max_depth)
                .with_relationship_names(graph.vocabulary(), &relationships)?;
            let result = analyze_impact(&graph, &query)?;
            let by_type = result.count_by_type();
            let mut value = serde_json::to_value(result)?;
            if let Value::Object(map) = &mut value {
                map.insert("byType".to_string(), json!(by_type));
            }
            value
        }
        Command::Orphans { source } => {
            let graph = load_graph(&source)?;
            serde_json::to_value(find_orphans(&graph))?
        }
        Command::Validate { source, max_issues } => {
            let graph = load_graph(&source)?;
            serde_json::to_value(graph.validate(max_issues))?
        }
    };

    serde_json::to_writer_pretty(&mut *out, &output)?;
    writeln!(out)?;
    Ok(())
}

fn load_graph(source: &Source) -> Result<LineageGraph, CliError> {
    let vocabulary = match &source.vocabulary {
        Some(path) => Vocabulary::load(path)?,
        None => Vocabulary::default(),
    };

    let snapshot = if source.snapshot.trim() == "-" {
        Snapshot::from_json_reader(std::io::stdin().lock())?
    } else {
        let file = File::open(&source.snapshot).map_err(|err| CliError::Snapshot {
            path: source.snapshot.clone(),
            source: err,
        })?;
        Snapshot::from_json_reader(BufReader::new(file))?
    };

    tracing::debug!(
        snapshot = %source.snapshot,
        nodes = snapshot.nodes.len(),
        edges = snapshot.edges.len(),
        "snapshot read"
    );
    Ok(LineageGraph::from_snapshot_with(vocabulary, snapshot))
}
