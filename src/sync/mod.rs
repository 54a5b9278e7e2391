//! Turn synchronization between two clients through the session server.
//!
//! - `server`: the request/response contract and its wire payloads
//! - `memory`: an in-process server for tests and local play
//! - `poll`: delays between `getMove` polls
//! - `coordinator`: the per-client turn state machine

pub mod coordinator;
pub mod memory;
pub mod poll;
pub mod server;

pub use coordinator::{PollStatus, TurnCoordinator, TurnEvent, TurnPhase};
pub use memory::{InMemoryServer, MemoryConnection, RelayedMove};
pub use poll::PollSchedule;
pub use server::{
    endpoint, GetMoveResponse, PartyCode, PlayerIdResponse, PushMoveRequest, SeatRole,
    SessionServer,
};
