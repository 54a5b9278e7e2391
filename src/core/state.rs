//! Game state: node occupancy and move history.
//!
//! ## GameState
//!
//! The single source of truth for claims in one session:
//! - Occupancy of every node on the board (all start unclaimed)
//! - Ordered history of applied moves
//! - Per-player claim counts
//!
//! Claims are permanent. A node that leaves `Unclaimed` never returns
//! to it, and a second claim on the same node is reported, not applied.
//!
//! ## BoardSnapshot
//!
//! Read-only view of occupancy for renderers. Backed by a persistent map,
//! so taking one is O(1) regardless of board size.

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

use super::action::{Move, MoveOrigin, MoveRecord};
use super::node::NodeId;
use super::player::{Occupancy, Player, PlayerMap};
use crate::board::BoardGraph;
use crate::error::GameError;

/// Result of a claim attempt on a node that exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The node was unclaimed and now belongs to the player.
    Claimed,
    /// The node was already taken. Nothing changed.
    AlreadyClaimed { by: Player },
}

impl ClaimOutcome {
    /// Whether the claim changed the node.
    #[must_use]
    pub fn is_claimed(self) -> bool {
        matches!(self, ClaimOutcome::Claimed)
    }
}

/// Immutable occupancy view, ordered by node id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    nodes: OrdMap<NodeId, Occupancy>,
}

impl BoardSnapshot {
    /// Occupancy of a node, `None` if it is not on the board.
    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<Occupancy> {
        self.nodes.get(&node).copied()
    }

    /// Iterate over (node, occupancy) in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Occupancy)> + '_ {
        self.nodes.iter().map(|(&node, &occ)| (node, occ))
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the snapshot has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Mutable occupancy of one game session.
#[derive(Clone, Debug)]
pub struct GameState {
    occupancy: OrdMap<NodeId, Occupancy>,

    /// Applied moves in order.
    history: Vector<MoveRecord>,

    /// Nodes owned per player.
    claimed: PlayerMap<u32>,
}

impl GameState {
    /// Create a state with every node of `graph` unclaimed.
    #[must_use]
    pub fn new(graph: &BoardGraph) -> Self {
        Self {
            occupancy: graph
                .node_ids()
                .map(|node| (node, Occupancy::Unclaimed))
                .collect(),
            history: Vector::new(),
            claimed: PlayerMap::with_value(0),
        }
    }

    /// Occupancy of a node.
    pub fn occupancy_of(&self, node: NodeId) -> Result<Occupancy, GameError> {
        self.occupancy
            .get(&node)
            .copied()
            .ok_or(GameError::UnknownNode(node.raw()))
    }

    /// Whether `node` is on the board and still unclaimed.
    #[must_use]
    pub fn is_unclaimed(&self, node: NodeId) -> bool {
        matches!(self.occupancy.get(&node), Some(Occupancy::Unclaimed))
    }

    /// Claim a node for `player`, recorded as a local move.
    ///
    /// Only an unclaimed node changes. Claiming an owned node again, by
    /// either player, leaves the first owner in place and reports
    /// `AlreadyClaimed`, so a redelivered move is harmless.
    pub fn claim(&mut self, node: NodeId, player: Player) -> Result<ClaimOutcome, GameError> {
        self.claim_from(node, player, MoveOrigin::Local)
    }

    /// Claim a node for `player`, recording where the move came from.
    pub fn claim_from(
        &mut self,
        node: NodeId,
        player: Player,
        origin: MoveOrigin,
    ) -> Result<ClaimOutcome, GameError> {
        let slot = self
            .occupancy
            .get_mut(&node)
            .ok_or(GameError::UnknownNode(node.raw()))?;

        if let Some(owner) = slot.owner() {
            return Ok(ClaimOutcome::AlreadyClaimed { by: owner });
        }

        *slot = Occupancy::claimed_by(player);
        self.claimed[player] += 1;
        let sequence = self.history.len() as u32;
        self.history
            .push_back(MoveRecord::new(Move::new(node, player), sequence, origin));

        Ok(ClaimOutcome::Claimed)
    }

    /// Read-only view of all occupancy.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            nodes: self.occupancy.clone(),
        }
    }

    /// Applied moves, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<MoveRecord> {
        &self.history
    }

    /// The most recently applied move.
    #[must_use]
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|record| record.mv)
    }

    /// Number of nodes owned by `player`.
    #[must_use]
    pub fn claimed_count(&self, player: Player) -> u32 {
        self.claimed[player]
    }

    /// Unclaimed nodes in ascending id order.
    pub fn unclaimed_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.occupancy
            .iter()
            .filter(|(_, occ)| occ.is_unclaimed())
            .map(|(&node, _)| node)
    }

    /// Number of nodes on the board.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.occupancy.len()
    }
}
