//! Error types.
//!
//! Board errors are fatal before play starts. Move errors are recoverable:
//! the input is rejected and the coordinator keeps waiting. Transport and
//! session errors end the session.

use thiserror::Error;

use crate::rules::GameOutcome;
use crate::sync::TurnPhase;

/// Malformed board geometry or adjacency data.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum BoardError {
    #[error("board has no nodes")]
    EmptyBoard,

    #[error("coordinate feed has {positions} nodes but adjacency feed has {adjacency}")]
    NodeCountMismatch { positions: usize, adjacency: usize },

    #[error("node {node} lists neighbor {neighbor}, which is not on the board")]
    DanglingNeighbor { node: u32, neighbor: u32 },

    #[error("invalid coordinate on line {line}: '{content}'")]
    InvalidCoordinate { line: usize, content: String },

    #[error("invalid neighbor id '{token}' on line {line}")]
    InvalidNeighborId { line: usize, token: String },

    #[error("side {side} references node {node}, which is not on the board")]
    SideReferencesUnknownNode { side: usize, node: u32 },
}

/// Errors from reading or mutating the game state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("node {0} is not on the board")]
    UnknownNode(u32),
}

/// Failure talking to the session server.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("server unreachable: {0}")]
    Unreachable(String),

    #[error("{endpoint} rejected the request with status {status}")]
    Rejected { endpoint: &'static str, status: u16 },

    #[error("malformed {endpoint} response: {message}")]
    Malformed {
        endpoint: &'static str,
        message: String,
    },
}

/// A local move the coordinator refused. The session continues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("node {0} is not on the board")]
    UnknownNode(u32),

    #[error("node {node} is already claimed")]
    AlreadyClaimed { node: u32 },

    #[error("cannot move while {phase:?}")]
    NotYourTurn { phase: TurnPhase },
}

impl From<GameError> for MoveError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::UnknownNode(id) => MoveError::UnknownNode(id),
        }
    }
}

/// Errors surfaced by the turn coordinator.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SessionError {
    #[error("invalid session config: {0}")]
    Config(String),

    #[error("party code '{party}' is not a valid session")]
    InvalidSession { party: String },

    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("move rejected: {0}")]
    Move(#[from] MoveError),

    #[error("no remote move after {attempts} polls")]
    PollLimitExceeded { attempts: u32 },

    #[error("session is over ({outcome:?})")]
    SessionOver { outcome: GameOutcome },
}

impl SessionError {
    /// Whether the session can keep going after this error.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SessionError::Move(_))
    }
}

/// Invalid session configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
