//! Win detection.
//!
//! A player wins when one connected group of their nodes touches all three
//! sides. Only the group containing the node just claimed can have changed,
//! so the search is seeded there and expands through same-color neighbors.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::board::{Board, SideMask};
use crate::core::{GameState, NodeId, Occupancy, Player};
use crate::error::GameError;

/// Connectivity search over a board and a game state.
#[derive(Clone, Copy, Debug)]
pub struct WinDetector<'a> {
    board: &'a Board,
    state: &'a GameState,
}

/// Result of one search from a seed node.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Search {
    sides: SideMask,
    /// Nodes visited, in visit order.
    visited: Vec<NodeId>,
}

impl<'a> WinDetector<'a> {
    /// Detector over `board` in position `state`.
    #[must_use]
    pub fn new(board: &'a Board, state: &'a GameState) -> Self {
        Self { board, state }
    }

    /// Whether `player` has won through the group containing `last_moved`.
    ///
    /// Stops as soon as all three sides are touched. A seed not owned by
    /// `player` is never a win.
    pub fn has_won(&self, player: Player, last_moved: NodeId) -> Result<bool, GameError> {
        Ok(self.search(player, last_moved)?.sides.is_complete())
    }

    /// The group explored up to the moment the win was found, if any.
    ///
    /// Every returned node belongs to `player` and is connected to
    /// `last_moved`.
    pub fn winning_chain(
        &self,
        player: Player,
        last_moved: NodeId,
    ) -> Result<Option<Vec<NodeId>>, GameError> {
        let search = self.search(player, last_moved)?;
        Ok(search.sides.is_complete().then_some(search.visited))
    }

    /// Sides touched by the whole group containing `node`.
    pub fn sides_touched(&self, player: Player, node: NodeId) -> Result<SideMask, GameError> {
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::new();
        let mut sides = SideMask::NONE;

        if self.owner(node)? != Some(player) {
            return Ok(sides);
        }
        visited.insert(node);
        queue.push_back(node);

        while let Some(current) = queue.pop_front() {
            sides |= self.board.sides().mask_of(current);
            self.expand(player, current, &mut visited, &mut queue)?;
        }
        Ok(sides)
    }

    fn search(&self, player: Player, seed: NodeId) -> Result<Search, GameError> {
        let mut search = Search {
            sides: SideMask::NONE,
            visited: Vec::new(),
        };
        if self.owner(seed)? != Some(player) {
            return Ok(search);
        }

        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::new();
        seen.insert(seed);
        queue.push_back(seed);

        while let Some(current) = queue.pop_front() {
            search.visited.push(current);
            // Checked per node so a corner seed can win before any expansion.
            search.sides |= self.board.sides().mask_of(current);
            if search.sides.is_complete() {
                break;
            }
            self.expand(player, current, &mut seen, &mut queue)?;
        }

        Ok(search)
    }

    fn expand(
        &self,
        player: Player,
        node: NodeId,
        seen: &mut FxHashSet<NodeId>,
        queue: &mut VecDeque<NodeId>,
    ) -> Result<(), GameError> {
        let target = Occupancy::claimed_by(player);
        for &neighbor in self.board.graph().neighbors(node)? {
            if self.state.occupancy_of(neighbor)? == target && seen.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
        Ok(())
    }

    fn owner(&self, node: NodeId) -> Result<Option<Player>, GameError> {
        Ok(self.state.occupancy_of(node)?.owner())
    }
}
