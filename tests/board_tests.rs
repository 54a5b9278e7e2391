//! Board loading tests: feeds, graph invariants, side sets.

use trilink::board::{Board, BoardGraph, SideSets};
use trilink::core::NodeId;
use trilink::error::BoardError;

/// 24-node ring as text feeds, padded with `0` filler like the stock files.
fn ring_feeds(n: u32) -> (String, String) {
    let mut coords = String::new();
    let mut adjacency = String::new();
    for id in 1..=n {
        let angle = f64::from(id) / f64::from(n) * std::f64::consts::TAU;
        coords.push_str(&format!("{:.4} {:.4}\n", 0.5 + 0.4 * angle.cos(), 0.5 + 0.4 * angle.sin()));

        let prev = if id == 1 { n } else { id - 1 };
        let next = if id == n { 1 } else { id + 1 };
        adjacency.push_str(&format!("{prev} {next} 0 0 0 0\n"));
    }
    (coords, adjacency)
}

// =============================================================================
// Feed Loading
// =============================================================================

#[test]
fn test_load_ring_board() {
    let (coords, adjacency) = ring_feeds(24);
    let board = Board::from_feeds(&coords, &adjacency, SideSets::triangle_24()).unwrap();

    let graph = board.graph();
    assert_eq!(graph.node_count(), 24);
    assert_eq!(graph.edge_count(), 48);
    assert_eq!(
        graph.neighbors(NodeId::new(1)).unwrap(),
        &[NodeId::new(24), NodeId::new(2)]
    );
    assert_eq!(
        graph.neighbors(NodeId::new(24)).unwrap(),
        &[NodeId::new(23), NodeId::new(1)]
    );
}

#[test]
fn test_positions_follow_feed_order() {
    let graph = BoardGraph::from_feeds("0.1 0.2\n0.3 0.4\n", "2\n1\n").unwrap();

    let first = graph.position(NodeId::new(1)).unwrap();
    assert!((first.x - 0.1).abs() < 1e-9);
    assert!((first.y - 0.8).abs() < 1e-9);
    assert!(graph.position(NodeId::new(3)).is_none());
}

#[test]
fn test_isolated_node_row() {
    let graph = BoardGraph::from_feeds("0 0\n1 0\n0.5 1\n", "2 0\n1 0\n0 0\n").unwrap();

    assert!(graph.neighbors(NodeId::new(3)).unwrap().is_empty());
    assert_eq!(graph.node_count(), 3);
}

// =============================================================================
// Malformed Input
// =============================================================================

#[test]
fn test_count_mismatch_rejected() {
    let err = BoardGraph::from_feeds("0 0\n1 1\n", "2\n1\n1\n").unwrap_err();
    assert_eq!(
        err,
        BoardError::NodeCountMismatch {
            positions: 2,
            adjacency: 3
        }
    );
}

#[test]
fn test_dangling_neighbor_rejected() {
    let err = BoardGraph::from_feeds("0 0\n1 1\n", "2\n7\n").unwrap_err();
    assert_eq!(err, BoardError::DanglingNeighbor { node: 2, neighbor: 7 });
}

#[test]
fn test_empty_feeds_rejected() {
    assert_eq!(BoardGraph::from_feeds("", "").unwrap_err(), BoardError::EmptyBoard);
}

#[test]
fn test_side_outside_board_rejected() {
    let (coords, adjacency) = ring_feeds(12);
    let err = Board::from_feeds(&coords, &adjacency, SideSets::triangle_24()).unwrap_err();

    assert!(matches!(err, BoardError::SideReferencesUnknownNode { node, .. } if node > 12));
}

// =============================================================================
// Side Sets
// =============================================================================

#[test]
fn test_triangle_corners() {
    let sides = SideSets::triangle_24();

    assert_eq!(sides.mask_of(NodeId::new(1)).count(), 2);
    assert_eq!(sides.mask_of(NodeId::new(9)).count(), 2);
    assert_eq!(sides.mask_of(NodeId::new(17)).count(), 2);
    assert_eq!(sides.mask_of(NodeId::new(5)).count(), 1);
    assert!(sides.mask_of(NodeId::new(5)).touches(0));
    assert!(sides.mask_of(NodeId::new(20)).touches(2));
}

#[test]
fn test_side_sets_json() {
    let sides = SideSets::new(
        [NodeId::new(1)],
        [NodeId::new(2)],
        [NodeId::new(3), NodeId::new(1)],
    );
    let json = serde_json::to_string(&sides).unwrap();
    let parsed: SideSets = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed, sides);
}
