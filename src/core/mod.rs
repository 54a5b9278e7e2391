//! Core engine types: nodes, players, moves, state, configuration, RNG.
//!
//! Everything here is independent of the session server. The coordinator
//! in `sync` composes these into a running session.

pub mod node;
pub mod player;
pub mod action;
pub mod state;
pub mod config;
pub mod rng;

pub use node::NodeId;
pub use player::{Occupancy, Player, PlayerMap};
pub use action::{Move, MoveOrigin, MoveRecord};
pub use state::{BoardSnapshot, ClaimOutcome, GameState};
pub use config::{PollPolicy, SessionConfig};
pub use rng::SessionRng;
