//! In-process session server.
//!
//! `InMemoryServer` implements the session server contract without a
//! network, for tests and for two local clients sharing one process.
//! Each `connect()` returns a connection that behaves like one browser
//! session: it remembers the seat it was given.
//!
//! Relay semantics follow the production server: `getMove` keeps
//! returning the opponent's most recent move until a newer one is pushed,
//! so clients must apply each move once.
//!
//! ```
//! use trilink::core::NodeId;
//! use trilink::sync::{InMemoryServer, PartyCode, SessionServer};
//!
//! let server = InMemoryServer::new();
//! let party = PartyCode::new("abc");
//! server.open_party(party.clone());
//!
//! let mut first = server.connect();
//! let mut second = server.connect();
//! assert_eq!(first.get_player_id(&party).unwrap().player_id, 1);
//! assert_eq!(second.get_player_id(&party).unwrap().player_id, 2);
//! assert_eq!(second.get_move(&party).unwrap().move_node(), None);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use tracing::debug;

use super::server::{
    endpoint, GetMoveResponse, PartyCode, PlayerIdResponse, PushMoveRequest, SeatRole,
    SessionServer,
};
use crate::core::NodeId;
use crate::error::TransportError;

/// One relayed move as the server stored it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayedMove {
    pub seat: SeatRole,
    pub node: NodeId,
    pub color: String,
}

#[derive(Debug, Default)]
struct Party {
    seats_taken: u8,
    last_move: Option<RelayedMove>,
    moves: Vec<RelayedMove>,
}

#[derive(Debug, Default)]
struct ServerInner {
    parties: FxHashMap<PartyCode, Party>,
    /// Requests left before every request fails.
    failures_after: Option<u32>,
    requests: u32,
}

/// Shared server state. Cloning shares the same parties.
#[derive(Clone, Debug, Default)]
pub struct InMemoryServer {
    inner: Rc<RefCell<ServerInner>>,
}

impl InMemoryServer {
    /// Server with no parties.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a party code. Re-opening an existing party resets it.
    pub fn open_party(&self, party: PartyCode) {
        self.inner.borrow_mut().parties.insert(party, Party::default());
    }

    /// A new client connection with no seat yet.
    #[must_use]
    pub fn connect(&self) -> MemoryConnection {
        MemoryConnection {
            server: self.clone(),
            seat: None,
        }
    }

    /// Make every request after the next `requests` fail as unreachable.
    pub fn fail_after(&self, requests: u32) {
        self.inner.borrow_mut().failures_after = Some(requests);
    }

    /// Stop injecting failures.
    pub fn recover(&self) {
        self.inner.borrow_mut().failures_after = None;
    }

    /// Total requests served, failed ones included.
    #[must_use]
    pub fn request_count(&self) -> u32 {
        self.inner.borrow().requests
    }

    /// Every move pushed to `party`, in order.
    #[must_use]
    pub fn moves(&self, party: &PartyCode) -> Vec<RelayedMove> {
        self.inner
            .borrow()
            .parties
            .get(party)
            .map(|p| p.moves.clone())
            .unwrap_or_default()
    }

    fn begin_request(&self) -> Result<(), TransportError> {
        let mut inner = self.inner.borrow_mut();
        inner.requests += 1;
        match inner.failures_after.as_mut() {
            Some(0) => Err(TransportError::Unreachable("connection refused".into())),
            Some(remaining) => {
                *remaining -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

/// One client's view of an `InMemoryServer`.
#[derive(Clone, Debug)]
pub struct MemoryConnection {
    server: InMemoryServer,
    seat: Option<(PartyCode, SeatRole)>,
}

impl MemoryConnection {
    /// Seat assigned to this connection, if any.
    #[must_use]
    pub fn seat(&self) -> Option<SeatRole> {
        self.seat.as_ref().map(|(_, seat)| *seat)
    }

    fn seat_in(&self, party: &PartyCode) -> Option<SeatRole> {
        match &self.seat {
            Some((code, seat)) if code == party => Some(*seat),
            _ => None,
        }
    }
}

impl SessionServer for MemoryConnection {
    fn get_player_id(&mut self, party: &PartyCode) -> Result<PlayerIdResponse, TransportError> {
        self.server.begin_request()?;
        if let Some(seat) = self.seat_in(party) {
            return Ok(PlayerIdResponse {
                player_id: seat.to_wire(),
            });
        }

        let mut inner = self.server.inner.borrow_mut();
        let Some(state) = inner.parties.get_mut(party) else {
            return Ok(PlayerIdResponse {
                player_id: PlayerIdResponse::INVALID,
            });
        };
        let Some(seat) = SeatRole::from_wire(state.seats_taken + 1) else {
            return Ok(PlayerIdResponse {
                player_id: PlayerIdResponse::INVALID,
            });
        };

        state.seats_taken += 1;
        self.seat = Some((party.clone(), seat));
        debug!(%party, ?seat, "seat assigned");
        Ok(PlayerIdResponse {
            player_id: seat.to_wire(),
        })
    }

    fn push_move(&mut self, request: &PushMoveRequest) -> Result<(), TransportError> {
        self.server.begin_request()?;
        let rejected = TransportError::Rejected {
            endpoint: endpoint::PUSH_MOVE,
            status: 403,
        };
        let seat = self.seat_in(&request.party_code).ok_or(rejected.clone())?;
        let node = NodeId::from_wire(request.node_id).ok_or(TransportError::Rejected {
            endpoint: endpoint::PUSH_MOVE,
            status: 400,
        })?;

        let mut inner = self.server.inner.borrow_mut();
        let state = inner.parties.get_mut(&request.party_code).ok_or(rejected)?;
        let relayed = RelayedMove {
            seat,
            node,
            color: request.color.clone(),
        };

        // A resend of the move already on record is not stored twice.
        if state.last_move.as_ref() != Some(&relayed) {
            state.moves.push(relayed.clone());
            state.last_move = Some(relayed);
        }
        Ok(())
    }

    fn get_move(&mut self, party: &PartyCode) -> Result<GetMoveResponse, TransportError> {
        self.server.begin_request()?;
        let seat = self.seat_in(party).ok_or(TransportError::Rejected {
            endpoint: endpoint::GET_MOVE,
            status: 403,
        })?;

        let inner = self.server.inner.borrow();
        let response = inner
            .parties
            .get(party)
            .and_then(|state| state.last_move.as_ref())
            .filter(|relayed| relayed.seat != seat)
            .map_or(GetMoveResponse::none(), |relayed| GetMoveResponse::node(relayed.node));
        Ok(response)
    }
}
