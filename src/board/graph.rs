//! Immutable board topology.
//!
//! A `BoardGraph` is built once per session from the loaded geometry and
//! never changes afterwards. Node ids are dense (`1..=node_count`), so
//! neighbor lists live in a `Vec` indexed by `NodeId::index()`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::NodeId;
use crate::error::{BoardError, GameError};

/// Most boards have at most six neighbors per node (hex tiling).
pub type NeighborList = SmallVec<[NodeId; 6]>;

/// Normalized drawing position of a node, owned by the rendering side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Create a position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Node set plus adjacency relation.
///
/// Adjacency is stored as given. It is usually symmetric, but nothing
/// here requires it to be.
#[derive(Clone, Debug)]
pub struct BoardGraph {
    neighbors: Vec<NeighborList>,
    positions: Vec<Position>,
}

impl BoardGraph {
    /// Build a graph from node positions and per-node neighbor ids.
    ///
    /// `adjacency[i]` lists the neighbors of node `i + 1`. Every listed id
    /// must be a node of the board.
    pub fn new(positions: Vec<Position>, adjacency: &[Vec<u32>]) -> Result<Self, BoardError> {
        if positions.len() != adjacency.len() {
            return Err(BoardError::NodeCountMismatch {
                positions: positions.len(),
                adjacency: adjacency.len(),
            });
        }
        if positions.is_empty() {
            return Err(BoardError::EmptyBoard);
        }

        let node_count = positions.len() as u32;
        let neighbors = adjacency
            .iter()
            .enumerate()
            .map(|(index, ids)| {
                ids.iter()
                    .map(|&raw| {
                        if raw == 0 || raw > node_count {
                            Err(BoardError::DanglingNeighbor {
                                node: NodeId::from_index(index).raw(),
                                neighbor: raw,
                            })
                        } else {
                            Ok(NodeId(raw))
                        }
                    })
                    .collect::<Result<NeighborList, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            neighbors,
            positions,
        })
    }

    /// Build a graph with adjacency only. Positions default to the origin.
    pub fn from_adjacency(adjacency: &[Vec<u32>]) -> Result<Self, BoardError> {
        Self::new(vec![Position::default(); adjacency.len()], adjacency)
    }

    /// Neighbors of `node`, in input order.
    pub fn neighbors(&self, node: NodeId) -> Result<&[NodeId], GameError> {
        self.slot(node)
            .map(|index| self.neighbors[index].as_slice())
            .ok_or(GameError::UnknownNode(node.raw()))
    }

    /// All node ids in ascending order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.neighbors.len()).map(NodeId::from_index)
    }

    /// Whether `node` is on the board.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.slot(node).is_some()
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Number of directed adjacency entries.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(SmallVec::len).sum()
    }

    /// Drawing position of `node`.
    #[must_use]
    pub fn position(&self, node: NodeId) -> Option<Position> {
        self.slot(node).map(|index| self.positions[index])
    }

    fn slot(&self, node: NodeId) -> Option<usize> {
        if node.raw() == 0 {
            return None;
        }
        let index = node.index();
        (index < self.neighbors.len()).then_some(index)
    }
}
