//! Board topology: node graph, geometry feeds, and target sides.
//!
//! A `Board` bundles the immutable `BoardGraph` with its `SideSets`.
//! It is built once per session and shared read-only.

pub mod graph;
pub mod loader;
pub mod sides;

pub use graph::{BoardGraph, NeighborList, Position};
pub use loader::{parse_adjacency, parse_coordinates};
pub use sides::{SideMask, SideSets};

use crate::error::BoardError;

/// Graph plus side sets, validated against each other.
#[derive(Clone, Debug)]
pub struct Board {
    graph: BoardGraph,
    sides: SideSets,
}

impl Board {
    /// Combine a graph with its sides. Fails if a side names a missing node.
    pub fn new(graph: BoardGraph, sides: SideSets) -> Result<Self, BoardError> {
        sides.validate(&graph)?;
        Ok(Self { graph, sides })
    }

    /// Load the feeds and attach `sides`.
    pub fn from_feeds(coordinates: &str, adjacency: &str, sides: SideSets) -> Result<Self, BoardError> {
        Self::new(BoardGraph::from_feeds(coordinates, adjacency)?, sides)
    }

    /// Node graph.
    #[must_use]
    pub fn graph(&self) -> &BoardGraph {
        &self.graph
    }

    /// Target sides.
    #[must_use]
    pub fn sides(&self) -> &SideSets {
        &self.sides
    }
}
