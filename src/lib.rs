//! # trilink
//!
//! Engine for a two-player connection game on a fixed planar graph.
//! Players alternately claim nodes; a player wins with a connected chain
//! of their own nodes that touches all three sides of the board.
//!
//! ## Design Principles
//!
//! 1. **Explicit Session**: A `TurnCoordinator` owns its `GameState`.
//!    Nothing is global; dropping the coordinator ends the session.
//!
//! 2. **Closed Types**: Occupancy is `Unclaimed | PlayerA | PlayerB`,
//!    seats are `Player::A | Player::B`. Wire tags are decoded at the edge.
//!
//! 3. **Idempotent Claims**: A node is claimed once. Redelivered moves are
//!    reported, never re-applied, so polling can repeat safely.
//!
//! ## Architecture
//!
//! - **Board**: immutable graph + three side sets, built once from the
//!   geometry feeds.
//!
//! - **Win Detection**: breadth-first search from the node just claimed,
//!   through same-color neighbors, stopping once all sides are touched.
//!
//! - **Turn Synchronization**: each client runs a state machine over a
//!   request/response `SessionServer`, pushing its own moves and polling
//!   for the opponent's.
//!
//! ## Modules
//!
//! - `core`: Node ids, players, moves, game state, configuration, RNG
//! - `board`: Board graph, geometry feeds, side sets
//! - `rules`: Win detection and game outcomes
//! - `sync`: Session server contract, poll scheduling, turn coordinator
//! - `error`: Error types

pub mod core;
pub mod board;
pub mod rules;
pub mod sync;
pub mod error;

// Re-export commonly used types
pub use crate::core::{
    NodeId, Player, Occupancy, PlayerMap,
    Move, MoveOrigin, MoveRecord,
    GameState, ClaimOutcome, BoardSnapshot,
    SessionConfig, PollPolicy, SessionRng,
};

pub use crate::board::{Board, BoardGraph, Position, SideMask, SideSets};

pub use crate::rules::{AbortReason, GameOutcome, WinDetector};

pub use crate::sync::{
    PartyCode, SeatRole, SessionServer,
    PlayerIdResponse, PushMoveRequest, GetMoveResponse,
    InMemoryServer, MemoryConnection,
    PollSchedule, PollStatus, TurnCoordinator, TurnEvent, TurnPhase,
};

pub use crate::error::{BoardError, ConfigError, GameError, MoveError, SessionError, TransportError};
