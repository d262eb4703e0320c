#![forbid(unsafe_code)]

//! Property tests over arbitrary, possibly cyclic and dangling, lineage graphs.

use lineage_core::{Edge, LineageGraph, Node, NodeType, Relationship};
use lineage_trace::*;
use proptest::prelude::*;
use std::collections::HashSet;

fn arb_node_type() -> impl Strategy<Value = NodeType> {
    prop_oneof![
        Just(NodeType::Requirement),
        Just(NodeType::UserStory),
        Just(NodeType::Task),
        Just(NodeType::Sprint),
    ]
}

fn arb_relationship() -> impl Strategy<Value = Relationship> {
    prop_oneof![
        Just(Relationship::Derives),
        Just(Relationship::BreaksDownTo),
        Just(Relationship::ImplementedBy),
    ]
}

/// Node ids are `N0..N{n}`; edge endpoints may go one past the end to
/// produce dangling references.
fn arb_graph() -> impl Strategy<Value = (Vec<Node>, Vec<Edge>)> {
    prop::collection::vec(arb_node_type(), 0..24).prop_flat_map(|types| {
        let count = types.len();
        let nodes = types
            .into_iter()
            .enumerate()
            .map(|(i, node_type)| Node::new(format!("N{i}"), node_type, format!("node {i}")))
            .collect::<Vec<_>>();
        let edge = (0..=count, arb_relationship(), 0..=count).prop_map(|(s, rel, t)| {
            Edge::new(format!("N{s}"), rel, format!("N{t}"))
        });
        (Just(nodes), prop::collection::vec(edge, 0..64))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn coverage_rate_is_a_percentage((nodes, edges) in arb_graph()) {
        let graph = LineageGraph::load(nodes, edges);
        let stats = CoverageMatrix::compute(&graph).stats();
        prop_assert!(stats.coverage_rate <= 100);
        if stats.total == 0 {
            prop_assert_eq!(stats.coverage_rate, 0);
        }
        prop_assert_eq!(
            stats.fully_covered + stats.partially_covered + stats.uncovered,
            stats.total
        );
    }

    #[test]
    fn classification_matches_counts((nodes, edges) in arb_graph()) {
        let graph = LineageGraph::load(nodes, edges);
        for row in CoverageMatrix::compute(&graph).rows {
            let stories = !row.linked_stories.is_empty();
            let tasks = !row.tasks.is_empty();
            prop_assert_eq!(row.coverage == Coverage::Full, stories && tasks);
            prop_assert_eq!(row.coverage == Coverage::None, !stories && !tasks);
            prop_assert_eq!(row.coverage == Coverage::Partial, stories != tasks);
        }
    }

    #[test]
    fn distinct_totals_are_bounded_by_row_counts((nodes, edges) in arb_graph()) {
        let graph = LineageGraph::load(nodes, edges);
        let matrix = CoverageMatrix::compute(&graph);
        let stats = matrix.stats();
        let story_sum: usize = matrix.rows.iter().map(|r| r.linked_stories.len()).sum();
        let story_max = matrix.rows.iter().map(|r| r.linked_stories.len()).max().unwrap_or(0);
        let task_sum: usize = matrix.rows.iter().map(|r| r.tasks.len()).sum();
        let task_max = matrix.rows.iter().map(|r| r.tasks.len()).max().unwrap_or(0);
        prop_assert!(stats.total_stories <= story_sum);
        prop_assert!(stats.total_stories >= story_max);
        prop_assert!(stats.total_tasks <= task_sum);
        prop_assert!(stats.total_tasks >= task_max);
    }

    #[test]
    fn traversal_is_unique_and_bounded(
        (nodes, edges) in arb_graph(),
        start in 0usize..24,
        depth in 0i64..6,
        upstream in any::<bool>(),
    ) {
        let graph = LineageGraph::load(nodes, edges);
        let direction = if upstream { Direction::Upstream } else { Direction::Downstream };
        let query = ImpactQuery::new(format!("N{start}"), direction)
            .with_max_depth(MaxDepth::try_new(depth).unwrap());
        let result = analyze_impact(&graph, &query).unwrap();

        let mut seen = HashSet::new();
        if let Some(start) = &result.start {
            seen.insert(start.node.id.clone());
        }
        let mut previous = 0;
        for entry in &result.nodes {
            prop_assert!(seen.insert(entry.node.id.clone()), "visited twice: {}", entry.node.id);
            prop_assert!(entry.depth >= 1);
            prop_assert!(i64::from(entry.depth) <= depth);
            prop_assert!(entry.depth >= previous);
            previous = entry.depth;
        }
        prop_assert_eq!(result.total, result.nodes.len());
        prop_assert!(i64::from(result.max_depth_reached) <= depth);
        if result.start.is_none() {
            prop_assert_eq!(result.total, 0);
        }
    }

    #[test]
    fn missing_start_never_errors((nodes, edges) in arb_graph(), upstream in any::<bool>()) {
        let graph = LineageGraph::load(nodes, edges);
        let query = if upstream {
            ImpactQuery::upstream("ABSENT")
        } else {
            ImpactQuery::downstream("ABSENT")
        };
        let result = analyze_impact(&graph, &query).unwrap();
        prop_assert!(result.start.is_none());
        prop_assert_eq!(result.total, 0);
        prop_assert_eq!(result.max_depth_reached, 0);
    }

    #[test]
    fn nodes_of_type_round_trips((nodes, edges) in arb_graph(), node_type in arb_node_type()) {
        let expected = nodes
            .iter()
            .filter(|n| n.node_type == node_type)
            .cloned()
            .collect::<Vec<_>>();
        let graph = LineageGraph::load(nodes, edges);
        let got = graph.nodes_of_type(&node_type).cloned().collect::<Vec<_>>();
        prop_assert_eq!(got, expected);
    }
}
