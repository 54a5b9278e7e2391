//! Moves and move history.
//!
//! A move is a single claim: one player takes one node. There are no
//! other action types (no passes, captures, or swaps).

use serde::{Deserialize, Serialize};

use super::node::NodeId;
use super::player::Player;

/// A single claim of `node` by `player`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub node: NodeId,
    pub player: Player,
}

impl Move {
    /// Create a move.
    #[must_use]
    pub const fn new(node: NodeId, player: Player) -> Self {
        Self { node, player }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.player, self.node)
    }
}

/// Where an applied move came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOrigin {
    /// Entered on this client.
    Local,
    /// Received from the session server.
    Remote,
}

/// An applied move with its position in the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub mv: Move,

    /// 0-based order of application.
    pub sequence: u32,

    /// Client that entered the move.
    pub origin: MoveOrigin,
}

impl MoveRecord {
    /// Create a history record.
    #[must_use]
    pub const fn new(mv: Move, sequence: u32, origin: MoveOrigin) -> Self {
        Self {
            mv,
            sequence,
            origin,
        }
    }
}
