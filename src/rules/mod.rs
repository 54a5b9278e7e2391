//! Game rules: win detection and game outcomes.
//!
//! Legality of a claim is owned by `GameState::claim` (a node can be
//! claimed once). This module decides when a claim ends the game.

pub mod win;

pub use win::WinDetector;

use serde::{Deserialize, Serialize};

/// Why a session ended without a winner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbortReason {
    /// The session server could not be reached or refused a request.
    Transport,
    /// The configured poll attempt cap was reached.
    PollLimit,
    /// The session was torn down locally.
    Abandoned,
}

/// How a game ended, from the local client's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    /// The local player completed a chain.
    LocalWin,
    /// The remote player completed a chain.
    LocalLoss,
    /// The session stopped before anyone won.
    Aborted(AbortReason),
}

impl GameOutcome {
    /// Whether the game was decided on the board.
    #[must_use]
    pub fn is_decided(self) -> bool {
        matches!(self, GameOutcome::LocalWin | GameOutcome::LocalLoss)
    }
}
