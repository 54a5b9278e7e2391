//! Client-side turn state machine.
//!
//! ## Phases
//!
//! ```text
//!            connect (role 1)            connect (role 2)
//!                  |                            |
//!                  v                            v
//!        AwaitingLocalMove <--- remote move -- AwaitingRemoteMove
//!                  |                            ^
//!            local move                         |
//!                  v                            |
//!         LocalMovePending ---- pushMove ok ----+
//!                  |
//!          win / any failure
//!                  v
//!              GameOver
//! ```
//!
//! Each client runs its own coordinator. The two copies of the game stay
//! consistent only through the server: a local move is applied, checked
//! for a win, then pushed; a remote move is polled for, applied once, then
//! checked for a win. Moves strictly alternate because a local move is only
//! accepted in `AwaitingLocalMove`, which is entered only after the remote
//! move has been applied.
//!
//! The coordinator is driven from a single thread. The two suspension
//! points are waiting for local input (the caller simply doesn't call
//! `submit_local_move`) and waiting between polls (`wait_for_remote`
//! hands each delay to a caller-supplied sleeper).

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use super::poll::PollSchedule;
use super::server::{PartyCode, PushMoveRequest, SeatRole, SessionServer};
use crate::board::Board;
use crate::core::{
    BoardSnapshot, ClaimOutcome, GameState, Move, MoveOrigin, NodeId, Player, SessionConfig,
    SessionRng,
};
use crate::error::{GameError, MoveError, SessionError, TransportError};
use crate::rules::{AbortReason, GameOutcome, WinDetector};

/// Coordinator phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnPhase {
    /// Local player to move.
    AwaitingLocalMove,
    /// Local move applied, not yet confirmed by the server.
    LocalMovePending,
    /// Polling for the remote player's move.
    AwaitingRemoteMove,
    /// Terminal. No more moves or polls.
    GameOver,
}

/// A state change reported to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnEvent {
    /// A move was applied and the game goes on.
    MoveApplied { mv: Move, origin: MoveOrigin },
    /// A move was applied and ended the game.
    GameOver {
        mv: Move,
        origin: MoveOrigin,
        outcome: GameOutcome,
    },
}

impl TurnEvent {
    /// The applied move.
    #[must_use]
    pub fn mv(self) -> Move {
        match self {
            TurnEvent::MoveApplied { mv, .. } | TurnEvent::GameOver { mv, .. } => mv,
        }
    }

    /// Outcome, if the move ended the game.
    #[must_use]
    pub fn outcome(self) -> Option<GameOutcome> {
        match self {
            TurnEvent::MoveApplied { .. } => None,
            TurnEvent::GameOver { outcome, .. } => Some(outcome),
        }
    }
}

/// Result of a single poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollStatus {
    /// No new move. Poll again after `retry_after`.
    Pending { retry_after: Duration },
    /// The remote move was applied.
    Applied(TurnEvent),
}

/// Turn coordinator for one session.
///
/// Owns the session's `GameState`. Dropping the coordinator (or calling
/// `abandon`) ends the session; there is no background work to cancel.
pub struct TurnCoordinator<S> {
    server: S,
    party: PartyCode,
    board: Arc<Board>,
    state: GameState,
    local: Player,
    phase: TurnPhase,
    outcome: Option<GameOutcome>,
    schedule: PollSchedule,
    wait_before_first_poll: bool,
}

impl<S: SessionServer> TurnCoordinator<S> {
    /// Negotiate a seat with the server and start the session.
    ///
    /// Role 1 starts in `AwaitingLocalMove`, role 2 in `AwaitingRemoteMove`.
    /// An invalid party code aborts before any move is exchanged.
    #[instrument(skip_all, fields(party = %party))]
    pub fn connect(
        mut server: S,
        party: PartyCode,
        board: Arc<Board>,
        config: &SessionConfig,
    ) -> Result<Self, SessionError> {
        config
            .validate()
            .map_err(|err| SessionError::Config(err.to_string()))?;

        let response = server.get_player_id(&party).map_err(|err| {
            warn!(error = %err, "seat negotiation failed");
            SessionError::Transport(err)
        })?;

        let role = match SeatRole::from_wire(response.player_id) {
            Some(role) => role,
            None if response.player_id == 0 => {
                warn!("invalid party code");
                return Err(SessionError::InvalidSession {
                    party: party.to_string(),
                });
            }
            None => {
                return Err(SessionError::Transport(TransportError::Malformed {
                    endpoint: super::server::endpoint::GET_PLAYER_ID,
                    message: format!("unknown player id {}", response.player_id),
                }));
            }
        };

        let phase = match role {
            SeatRole::First => {
                info!("seated first; share the party code with the opponent");
                TurnPhase::AwaitingLocalMove
            }
            SeatRole::Second => {
                info!("seated second; waiting for the first move");
                TurnPhase::AwaitingRemoteMove
            }
        };

        let rng = SessionRng::new(config.seed).for_context(party.as_str());
        Ok(Self {
            server,
            state: GameState::new(board.graph()),
            board,
            party,
            local: role.player(),
            phase,
            outcome: None,
            schedule: PollSchedule::new(config.poll.clone(), rng),
            wait_before_first_poll: config.wait_before_first_poll,
        })
    }

    /// Claim `node` for the local player and forward it to the server.
    ///
    /// Unknown or already-claimed nodes are rejected with no state change
    /// and no server call; the coordinator stays in `AwaitingLocalMove`.
    /// A winning move is still pushed so the opponent sees the final
    /// position.
    #[instrument(skip(self), fields(party = %self.party, seat = ?self.local))]
    pub fn submit_local_move(&mut self, node: NodeId) -> Result<TurnEvent, SessionError> {
        self.ensure_phase(TurnPhase::AwaitingLocalMove)?;

        match self.state.claim_from(node, self.local, MoveOrigin::Local) {
            Ok(ClaimOutcome::Claimed) => {}
            Ok(ClaimOutcome::AlreadyClaimed { by }) => {
                warn!(%node, owner = ?by, "rejected local move on a claimed node");
                return Err(MoveError::AlreadyClaimed { node: node.raw() }.into());
            }
            Err(err) => {
                warn!(%node, "rejected local move on an unknown node");
                return Err(MoveError::from(err).into());
            }
        }
        self.phase = TurnPhase::LocalMovePending;
        let mv = Move::new(node, self.local);
        info!(%node, "local move applied");

        let won = self.has_won(mv)?;
        let request = PushMoveRequest::new(self.party.clone(), node, self.local);
        if let Err(err) = self.server.push_move(&request) {
            return Err(self.transport_failure(err));
        }

        if won {
            let outcome = self.finish(GameOutcome::LocalWin);
            return Ok(TurnEvent::GameOver {
                mv,
                origin: MoveOrigin::Local,
                outcome,
            });
        }

        self.phase = TurnPhase::AwaitingRemoteMove;
        self.schedule.reset();
        Ok(TurnEvent::MoveApplied {
            mv,
            origin: MoveOrigin::Local,
        })
    }

    /// Ask the server once for the remote move.
    ///
    /// The sentinel, a move already applied, and a node the board doesn't
    /// have all count as "nothing new" and leave the state untouched.
    #[instrument(skip(self), fields(party = %self.party, seat = ?self.local))]
    pub fn poll_remote(&mut self) -> Result<PollStatus, SessionError> {
        self.ensure_phase(TurnPhase::AwaitingRemoteMove)?;

        let response = match self.server.get_move(&self.party) {
            Ok(response) => response,
            Err(err) => return Err(self.transport_failure(err)),
        };

        let Some(node) = response.move_node() else {
            debug!("no remote move yet");
            return self.missed_poll();
        };

        let remote = self.local.opponent();
        match self.state.claim_from(node, remote, MoveOrigin::Remote) {
            Ok(ClaimOutcome::Claimed) => {}
            Ok(ClaimOutcome::AlreadyClaimed { .. }) => {
                debug!(%node, "remote move already applied");
                return self.missed_poll();
            }
            Err(GameError::UnknownNode(_)) => {
                warn!(%node, "ignoring remote move on an unknown node");
                return self.missed_poll();
            }
        }

        let mv = Move::new(node, remote);
        info!(%node, "remote move applied");
        self.schedule.reset();

        if self.has_won(mv)? {
            let outcome = self.finish(GameOutcome::LocalLoss);
            return Ok(PollStatus::Applied(TurnEvent::GameOver {
                mv,
                origin: MoveOrigin::Remote,
                outcome,
            }));
        }

        self.phase = TurnPhase::AwaitingLocalMove;
        Ok(PollStatus::Applied(TurnEvent::MoveApplied {
            mv,
            origin: MoveOrigin::Remote,
        }))
    }

    /// Poll until the remote move arrives.
    ///
    /// `sleep` is called with each delay before the next poll; pass
    /// `std::thread::sleep` for wall-clock pacing or a no-op in tests.
    pub fn wait_for_remote(
        &mut self,
        mut sleep: impl FnMut(Duration),
    ) -> Result<TurnEvent, SessionError> {
        self.ensure_phase(TurnPhase::AwaitingRemoteMove)?;

        let mut delay = self
            .wait_before_first_poll
            .then(|| self.schedule.first_delay());
        loop {
            if let Some(delay) = delay {
                sleep(delay);
            }
            match self.poll_remote()? {
                PollStatus::Pending { retry_after } => delay = Some(retry_after),
                PollStatus::Applied(event) => return Ok(event),
            }
        }
    }

    /// Tear the session down. Later calls fail with `SessionOver`.
    pub fn abandon(&mut self) {
        if self.phase != TurnPhase::GameOver {
            self.finish(GameOutcome::Aborted(AbortReason::Abandoned));
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Whether a local move would be accepted now.
    #[must_use]
    pub fn is_local_turn(&self) -> bool {
        self.phase == TurnPhase::AwaitingLocalMove
    }

    /// How the session ended, `None` while it is running.
    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Seat played on this client.
    #[must_use]
    pub fn local_player(&self) -> Player {
        self.local
    }

    /// Party code of the session.
    #[must_use]
    pub fn party(&self) -> &PartyCode {
        &self.party
    }

    /// Board the session is played on.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Game state owned by the session.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Occupancy view for renderers.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        self.state.snapshot()
    }

    /// The chain that decided the game, for highlighting.
    #[must_use]
    pub fn winning_chain(&self) -> Option<Vec<NodeId>> {
        if !self.outcome?.is_decided() {
            return None;
        }
        let last = self.state.last_move()?;
        match WinDetector::new(&self.board, &self.state).winning_chain(last.player, last.node) {
            Ok(chain) => chain,
            Err(err) => {
                warn!(error = %err, node = %last.node, "winning chain lookup failed");
                None
            }
        }
    }

    /// Underlying server connection.
    #[must_use]
    pub fn server(&self) -> &S {
        &self.server
    }

    fn ensure_phase(&self, expected: TurnPhase) -> Result<(), SessionError> {
        if let Some(outcome) = self.outcome {
            return Err(SessionError::SessionOver { outcome });
        }
        if self.phase != expected {
            return Err(MoveError::NotYourTurn { phase: self.phase }.into());
        }
        Ok(())
    }

    fn has_won(&self, mv: Move) -> Result<bool, SessionError> {
        debug_assert!(self.alternates(), "two consecutive moves by one player");
        WinDetector::new(&self.board, &self.state)
            .has_won(mv.player, mv.node)
            .map_err(|err| MoveError::from(err).into())
    }

    fn missed_poll(&mut self) -> Result<PollStatus, SessionError> {
        match self.schedule.record_miss() {
            Some(retry_after) => Ok(PollStatus::Pending { retry_after }),
            None => {
                let attempts = self.schedule.misses();
                warn!(attempts, "giving up on the remote move");
                self.finish(GameOutcome::Aborted(AbortReason::PollLimit));
                Err(SessionError::PollLimitExceeded { attempts })
            }
        }
    }

    fn transport_failure(&mut self, err: TransportError) -> SessionError {
        warn!(error = %err, "transport failure; ending session");
        self.finish(GameOutcome::Aborted(AbortReason::Transport));
        SessionError::Transport(err)
    }

    fn finish(&mut self, outcome: GameOutcome) -> GameOutcome {
        info!(?outcome, moves = self.state.history().len(), "game over");
        self.phase = TurnPhase::GameOver;
        self.outcome = Some(outcome);
        outcome
    }

    fn alternates(&self) -> bool {
        let history = self.state.history();
        history
            .iter()
            .zip(history.iter().skip(1))
            .all(|(prev, next)| prev.mv.player != next.mv.player)
    }
}
