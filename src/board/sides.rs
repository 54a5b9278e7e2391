//! The three target sides of the board.
//!
//! A winning chain must touch every side. Sides are fixed sets of node
//! ids, disjoint except at the corners where two sides meet.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::graph::BoardGraph;
use crate::core::NodeId;
use crate::error::BoardError;

/// Which sides a node (or a chain) touches. One bit per side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SideMask(u8);

impl SideMask {
    pub const NONE: SideMask = SideMask(0);
    pub const ALL: SideMask = SideMask(0b111);

    /// Mask with only side `side` (0, 1 or 2) set.
    #[must_use]
    pub const fn side(side: usize) -> Self {
        Self(1 << side)
    }

    /// Sides in either mask.
    #[must_use]
    pub const fn union(self, other: SideMask) -> Self {
        Self(self.0 | other.0)
    }

    /// Whether side `side` is set.
    #[must_use]
    pub const fn touches(self, side: usize) -> bool {
        self.0 & (1 << side) != 0
    }

    /// All three sides touched.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        self.0 == Self::ALL.0
    }

    /// Number of sides set.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }
}

impl std::ops::BitOr for SideMask {
    type Output = SideMask;

    fn bitor(self, rhs: SideMask) -> SideMask {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for SideMask {
    fn bitor_assign(&mut self, rhs: SideMask) {
        *self = self.union(rhs);
    }
}

/// Three side sets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideSets {
    sides: [FxHashSet<NodeId>; 3],
}

impl SideSets {
    pub const COUNT: usize = 3;

    /// Create side sets from node id lists.
    pub fn new(
        first: impl IntoIterator<Item = NodeId>,
        second: impl IntoIterator<Item = NodeId>,
        third: impl IntoIterator<Item = NodeId>,
    ) -> Self {
        Self {
            sides: [
                first.into_iter().collect(),
                second.into_iter().collect(),
                third.into_iter().collect(),
            ],
        }
    }

    /// Sides of the stock triangular board with a 24-node perimeter.
    ///
    /// Corners are nodes 1, 9 and 17.
    #[must_use]
    pub fn triangle_24() -> Self {
        Self::new(
            (1..=9).map(NodeId),
            (9..=17).map(NodeId),
            (17..=24).chain(std::iter::once(1)).map(NodeId),
        )
    }

    /// Sides that `node` lies on.
    #[must_use]
    pub fn mask_of(&self, node: NodeId) -> SideMask {
        self.sides
            .iter()
            .enumerate()
            .filter(|(_, members)| members.contains(&node))
            .fold(SideMask::NONE, |mask, (side, _)| mask | SideMask::side(side))
    }

    /// Members of side `side` (0, 1 or 2).
    #[must_use]
    pub fn side(&self, side: usize) -> &FxHashSet<NodeId> {
        &self.sides[side]
    }

    /// Check that every side member is a node of `graph`.
    pub fn validate(&self, graph: &BoardGraph) -> Result<(), BoardError> {
        for (side, members) in self.sides.iter().enumerate() {
            if let Some(node) = members.iter().find(|node| !graph.contains(**node)) {
                return Err(BoardError::SideReferencesUnknownNode {
                    side: side + 1,
                    node: node.raw(),
                });
            }
        }
        Ok(())
    }
}
