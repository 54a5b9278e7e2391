//! Session server contract and wire payloads.
//!
//! The server is a stateless request/response API with three endpoints.
//! A `SessionServer` implementation only moves these payloads; meaning
//! (seat roles, the "no move yet" sentinel, duplicate moves) is decided by
//! the coordinator.

use serde::{Deserialize, Serialize};

use crate::core::{NodeId, Player};
use crate::error::TransportError;

/// Endpoint paths, also used to label transport errors.
pub mod endpoint {
    pub const GET_PLAYER_ID: &str = "/api/getPlayerID";
    pub const PUSH_MOVE: &str = "/api/pushMove";
    pub const GET_MOVE: &str = "/api/getMove";
}

/// Opaque code tying two clients to one game on the server.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyCode(String);

impl PartyCode {
    /// Wrap a party code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The code as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PartyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Seat assigned by `getPlayerID`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeatRole {
    /// Wire value 1. Moves first.
    First,
    /// Wire value 2. Waits for the first move.
    Second,
}

impl SeatRole {
    /// Decode a wire player id. `0` (invalid party) and unknown values
    /// have no role.
    #[must_use]
    pub const fn from_wire(player_id: u8) -> Option<Self> {
        match player_id {
            1 => Some(SeatRole::First),
            2 => Some(SeatRole::Second),
            _ => None,
        }
    }

    /// Wire player id.
    #[must_use]
    pub const fn to_wire(self) -> u8 {
        match self {
            SeatRole::First => 1,
            SeatRole::Second => 2,
        }
    }

    /// The seat this role plays.
    #[must_use]
    pub const fn player(self) -> Player {
        match self {
            SeatRole::First => Player::A,
            SeatRole::Second => Player::B,
        }
    }
}

/// `getPlayerID` response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerIdResponse {
    /// 0 = invalid party, 1 = first seat, 2 = second seat.
    pub player_id: u8,
}

impl PlayerIdResponse {
    pub const INVALID: u8 = 0;
}

/// `pushMove` request body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMoveRequest {
    pub party_code: PartyCode,
    pub node_id: u32,
    pub color: String,
}

impl PushMoveRequest {
    /// Request pushing `node` for `player`.
    #[must_use]
    pub fn new(party_code: PartyCode, node: NodeId, player: Player) -> Self {
        Self {
            party_code,
            node_id: node.raw(),
            color: player.color_tag().to_string(),
        }
    }
}

/// `getMove` response. `node_id == 0` means no new move yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMoveResponse {
    pub node_id: u32,
}

impl GetMoveResponse {
    /// The "no move yet" response.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            node_id: NodeId::SENTINEL,
        }
    }

    /// Response reporting `node`.
    #[must_use]
    pub const fn node(node: NodeId) -> Self {
        Self { node_id: node.raw() }
    }

    /// The reported move, `None` for the sentinel.
    #[must_use]
    pub const fn move_node(self) -> Option<NodeId> {
        NodeId::from_wire(self.node_id)
    }
}

/// Request/response access to the session server.
///
/// Implementations report any failure to reach the server, or any non-OK
/// answer, as a `TransportError`. `push_move` is expected to be idempotent
/// on the server side.
pub trait SessionServer {
    fn get_player_id(&mut self, party: &PartyCode) -> Result<PlayerIdResponse, TransportError>;

    fn push_move(&mut self, request: &PushMoveRequest) -> Result<(), TransportError>;

    fn get_move(&mut self, party: &PartyCode) -> Result<GetMoveResponse, TransportError>;
}

impl<S: SessionServer + ?Sized> SessionServer for &mut S {
    fn get_player_id(&mut self, party: &PartyCode) -> Result<PlayerIdResponse, TransportError> {
        (**self).get_player_id(party)
    }

    fn push_move(&mut self, request: &PushMoveRequest) -> Result<(), TransportError> {
        (**self).push_move(request)
    }

    fn get_move(&mut self, party: &PartyCode) -> Result<GetMoveResponse, TransportError> {
        (**self).get_move(party)
    }
}

impl<S: SessionServer + ?Sized> SessionServer for Box<S> {
    fn get_player_id(&mut self, party: &PartyCode) -> Result<PlayerIdResponse, TransportError> {
        (**self).get_player_id(party)
    }

    fn push_move(&mut self, request: &PushMoveRequest) -> Result<(), TransportError> {
        (**self).push_move(request)
    }

    fn get_move(&mut self, party: &PartyCode) -> Result<GetMoveResponse, TransportError> {
        (**self).get_move(party)
    }
}
