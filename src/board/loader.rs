//! Text feeds for board geometry.
//!
//! Two feeds describe a board, one line per node in the same order:
//!
//! - Coordinates: `x y` as floats in `[0, 1]`. The y axis is flipped on
//!   load so that `y = 0` is the top edge.
//! - Adjacency: whitespace-separated neighbor ids. `0` pads short rows and
//!   is dropped.
//!
//! ```
//! use trilink::board::BoardGraph;
//! use trilink::core::NodeId;
//!
//! let coords = "0.0 0.0\n1.0 0.0\n0.5 1.0\n";
//! let adjacency = "2 3 0\n1 3 0\n1 2 0\n";
//!
//! let graph = BoardGraph::from_feeds(coords, adjacency).unwrap();
//! assert_eq!(graph.node_count(), 3);
//! assert_eq!(graph.neighbors(NodeId::new(3)).unwrap().len(), 2);
//! ```

use tracing::{debug, instrument};

use super::graph::{BoardGraph, Position};
use crate::error::BoardError;

/// Parse the coordinates feed.
pub fn parse_coordinates(content: &str) -> Result<Vec<Position>, BoardError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(BoardError::EmptyBoard);
    }

    content
        .lines()
        .enumerate()
        .map(|(index, line)| {
            let invalid = || BoardError::InvalidCoordinate {
                line: index + 1,
                content: line.to_string(),
            };

            let mut fields = line.split_whitespace().map(str::parse::<f64>);
            match (fields.next(), fields.next()) {
                (Some(Ok(x)), Some(Ok(y))) if x.is_finite() && y.is_finite() => {
                    Ok(Position::new(x, 1.0 - y))
                }
                _ => Err(invalid()),
            }
        })
        .collect()
}

/// Parse the adjacency feed into raw neighbor ids, filler removed.
///
/// A blank row is a node with no neighbors.
pub fn parse_adjacency(content: &str) -> Result<Vec<Vec<u32>>, BoardError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(BoardError::EmptyBoard);
    }

    content
        .lines()
        .enumerate()
        .map(|(index, line)| {
            line.split_whitespace()
                .map(|token| {
                    token.parse::<u32>().map_err(|_| BoardError::InvalidNeighborId {
                        line: index + 1,
                        token: token.to_string(),
                    })
                })
                .filter(|id| !matches!(id, Ok(0)))
                .collect::<Result<Vec<u32>, _>>()
        })
        .collect()
}

impl BoardGraph {
    /// Build a graph from the coordinates and adjacency feeds.
    #[instrument(skip_all)]
    pub fn from_feeds(coordinates: &str, adjacency: &str) -> Result<Self, BoardError> {
        let positions = parse_coordinates(coordinates)?;
        let neighbors = parse_adjacency(adjacency)?;
        let graph = Self::new(positions, &neighbors)?;

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "loaded board geometry"
        );
        Ok(graph)
    }
}
