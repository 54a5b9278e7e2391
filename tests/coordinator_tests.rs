//! Turn coordinator tests against scripted and in-memory servers.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use trilink::board::{Board, BoardGraph, SideSets};
use trilink::core::{MoveOrigin, NodeId, Occupancy, Player, PollPolicy, SessionConfig};
use trilink::error::{MoveError, SessionError, TransportError};
use trilink::rules::{AbortReason, GameOutcome};
use trilink::sync::{
    GetMoveResponse, InMemoryServer, PartyCode, PlayerIdResponse, PollStatus, PushMoveRequest,
    SessionServer, TurnCoordinator, TurnEvent, TurnPhase,
};

// =============================================================================
// Fixtures
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
enum Call {
    GetPlayerId,
    PushMove { node_id: u32, color: String },
    GetMove,
}

/// Server that replays canned responses and records every call.
#[derive(Debug, Default)]
struct ScriptedServer {
    player_id: u8,
    /// `getMove` answers in order; the sentinel once exhausted.
    moves: VecDeque<Result<u32, TransportError>>,
    push_failure: Option<TransportError>,
    calls: Vec<Call>,
}

impl ScriptedServer {
    fn seated(player_id: u8) -> Self {
        Self {
            player_id,
            ..Self::default()
        }
    }

    fn with_moves(mut self, moves: impl IntoIterator<Item = u32>) -> Self {
        self.moves.extend(moves.into_iter().map(Ok));
        self
    }

    fn with_get_move_failure(mut self, err: TransportError) -> Self {
        self.moves.push_back(Err(err));
        self
    }

    fn with_push_failure(mut self, err: TransportError) -> Self {
        self.push_failure = Some(err);
        self
    }

    fn pushes(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::PushMove { .. }))
            .count()
    }
}

impl SessionServer for ScriptedServer {
    fn get_player_id(&mut self, _party: &PartyCode) -> Result<PlayerIdResponse, TransportError> {
        self.calls.push(Call::GetPlayerId);
        Ok(PlayerIdResponse {
            player_id: self.player_id,
        })
    }

    fn push_move(&mut self, request: &PushMoveRequest) -> Result<(), TransportError> {
        self.calls.push(Call::PushMove {
            node_id: request.node_id,
            color: request.color.clone(),
        });
        match self.push_failure.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn get_move(&mut self, _party: &PartyCode) -> Result<GetMoveResponse, TransportError> {
        self.calls.push(Call::GetMove);
        let node_id = self.moves.pop_front().unwrap_or(Ok(NodeId::SENTINEL))?;
        Ok(GetMoveResponse { node_id })
    }
}

/// 24-node ring on the stock side layout, with chords 1-5 and 5-9.
fn board() -> Arc<Board> {
    let n = 24;
    let mut adjacency: Vec<Vec<u32>> = (1..=n)
        .map(|id| {
            let prev = if id == 1 { n } else { id - 1 };
            let next = if id == n { 1 } else { id + 1 };
            vec![prev, next]
        })
        .collect();
    for (a, b) in [(1u32, 5u32), (5, 9)] {
        adjacency[(a - 1) as usize].push(b);
        adjacency[(b - 1) as usize].push(a);
    }
    let graph = BoardGraph::from_adjacency(&adjacency).unwrap();
    Arc::new(Board::new(graph, SideSets::triangle_24()).unwrap())
}

fn party() -> PartyCode {
    PartyCode::new("xk42")
}

fn connect(server: ScriptedServer) -> TurnCoordinator<ScriptedServer> {
    TurnCoordinator::connect(server, party(), board(), &SessionConfig::default()).unwrap()
}

fn unreachable() -> TransportError {
    TransportError::Unreachable("connection reset".into())
}

// =============================================================================
// Seat Negotiation
// =============================================================================

#[test]
fn test_first_seat_moves_first() {
    let coordinator = connect(ScriptedServer::seated(1));

    assert_eq!(coordinator.phase(), TurnPhase::AwaitingLocalMove);
    assert_eq!(coordinator.local_player(), Player::A);
    assert!(coordinator.is_local_turn());
    assert_eq!(coordinator.outcome(), None);
}

#[test]
fn test_second_seat_waits() {
    let coordinator = connect(ScriptedServer::seated(2));

    assert_eq!(coordinator.phase(), TurnPhase::AwaitingRemoteMove);
    assert_eq!(coordinator.local_player(), Player::B);
    assert!(!coordinator.is_local_turn());
}

/// `getPlayerID == 0` aborts before any move is exchanged.
#[test]
fn test_invalid_party_aborts_without_moves() {
    let mut server = ScriptedServer::seated(0).with_moves([3]);

    let err = TurnCoordinator::connect(&mut server, party(), board(), &SessionConfig::default()).err();

    assert!(matches!(err, Some(SessionError::InvalidSession { ref party }) if party == "xk42"));
    assert_eq!(server.calls, vec![Call::GetPlayerId]);
}

#[test]
fn test_unknown_player_id_is_malformed() {
    let result = TurnCoordinator::connect(
        ScriptedServer::seated(7),
        party(),
        board(),
        &SessionConfig::default(),
    );

    assert!(matches!(
        result,
        Err(SessionError::Transport(TransportError::Malformed { .. }))
    ));
}

#[test]
fn test_invalid_config_rejected_before_negotiation() {
    let mut server = ScriptedServer::seated(1);
    let config = SessionConfig::default().with_poll(PollPolicy::default().with_jitter(1.5));

    let err = TurnCoordinator::connect(&mut server, party(), board(), &config).err();

    assert!(matches!(err, Some(SessionError::Config(_))));
    assert!(server.calls.is_empty());
}

// =============================================================================
// Local Moves
// =============================================================================

#[test]
fn test_local_move_is_applied_then_pushed() {
    let mut coordinator = connect(ScriptedServer::seated(1));

    let event = coordinator.submit_local_move(NodeId::new(4)).unwrap();

    assert_eq!(
        event,
        TurnEvent::MoveApplied {
            mv: trilink::core::Move::new(NodeId::new(4), Player::A),
            origin: MoveOrigin::Local,
        }
    );
    assert_eq!(coordinator.phase(), TurnPhase::AwaitingRemoteMove);
    assert_eq!(coordinator.snapshot().get(NodeId::new(4)), Some(Occupancy::PlayerA));
    assert_eq!(
        coordinator.server().calls.last(),
        Some(&Call::PushMove {
            node_id: 4,
            color: "blue".to_string()
        })
    );
}

/// A move on an owned node changes nothing and calls nothing.
#[test]
fn test_claimed_node_rejected_locally() {
    let mut coordinator = connect(ScriptedServer::seated(2).with_moves([6]));
    coordinator.poll_remote().unwrap();
    assert_eq!(coordinator.phase(), TurnPhase::AwaitingLocalMove);

    let before = coordinator.snapshot();
    let calls = coordinator.server().calls.len();

    let err = coordinator.submit_local_move(NodeId::new(6)).unwrap_err();

    assert_eq!(err, SessionError::Move(MoveError::AlreadyClaimed { node: 6 }));
    assert!(err.is_recoverable());
    assert_eq!(coordinator.phase(), TurnPhase::AwaitingLocalMove);
    assert_eq!(coordinator.snapshot(), before);
    assert_eq!(coordinator.server().calls.len(), calls);
}

#[test]
fn test_unknown_node_rejected_locally() {
    let mut coordinator = connect(ScriptedServer::seated(1));

    let err = coordinator.submit_local_move(NodeId::new(99)).unwrap_err();

    assert_eq!(err, SessionError::Move(MoveError::UnknownNode(99)));
    assert_eq!(coordinator.phase(), TurnPhase::AwaitingLocalMove);
    assert_eq!(coordinator.server().pushes(), 0);
}

#[test]
fn test_move_out_of_turn_rejected() {
    let mut coordinator = connect(ScriptedServer::seated(2));

    let err = coordinator.submit_local_move(NodeId::new(1)).unwrap_err();

    assert_eq!(
        err,
        SessionError::Move(MoveError::NotYourTurn {
            phase: TurnPhase::AwaitingRemoteMove
        })
    );
    assert!(coordinator.state().history().is_empty());
    assert_eq!(coordinator.server().calls, vec![Call::GetPlayerId]);
}

// =============================================================================
// Remote Moves
// =============================================================================

/// The sentinel never mutates state; the coordinator just polls again.
#[test]
fn test_repeated_sentinel_keeps_polling() {
    let mut coordinator = connect(ScriptedServer::seated(2));
    let before = coordinator.snapshot();

    for _ in 0..25 {
        let status = coordinator.poll_remote().unwrap();
        assert_eq!(
            status,
            PollStatus::Pending {
                retry_after: Duration::from_secs(1)
            }
        );
    }

    assert_eq!(coordinator.phase(), TurnPhase::AwaitingRemoteMove);
    assert_eq!(coordinator.snapshot(), before);
    assert_eq!(coordinator.server().calls.len(), 26);
}

#[test]
fn test_remote_move_applied_once() {
    let server = ScriptedServer::seated(2).with_moves([3, 3]);
    let mut coordinator = connect(server);

    let status = coordinator.poll_remote().unwrap();
    assert!(matches!(
        status,
        PollStatus::Applied(TurnEvent::MoveApplied {
            origin: MoveOrigin::Remote,
            ..
        })
    ));
    assert_eq!(coordinator.snapshot().get(NodeId::new(3)), Some(Occupancy::PlayerA));

    coordinator.submit_local_move(NodeId::new(10)).unwrap();

    // The relay still reports node 3 until the opponent moves again.
    let status = coordinator.poll_remote().unwrap();
    assert!(matches!(status, PollStatus::Pending { .. }));
    assert_eq!(coordinator.state().history().len(), 2);
    assert_eq!(coordinator.state().claimed_count(Player::A), 1);
}

#[test]
fn test_remote_move_on_unknown_node_ignored() {
    let mut coordinator = connect(ScriptedServer::seated(2).with_moves([250, 8]));

    assert!(matches!(coordinator.poll_remote().unwrap(), PollStatus::Pending { .. }));
    assert!(coordinator.state().history().is_empty());

    assert!(matches!(coordinator.poll_remote().unwrap(), PollStatus::Applied(_)));
    assert_eq!(coordinator.state().last_move().unwrap().node, NodeId::new(8));
}

#[test]
fn test_wait_for_remote_sleeps_between_polls() {
    let mut coordinator = connect(ScriptedServer::seated(2).with_moves([0, 0, 12]));
    let mut sleeps = Vec::new();

    let event = coordinator.wait_for_remote(|delay| sleeps.push(delay)).unwrap();

    assert_eq!(event.mv().node, NodeId::new(12));
    assert_eq!(event.mv().player, Player::A);
    assert_eq!(sleeps, vec![Duration::from_secs(1); 3]);
    assert!(coordinator.is_local_turn());
}

#[test]
fn test_wait_for_remote_without_initial_delay() {
    let config = SessionConfig::default().with_wait_before_first_poll(false);
    let server = ScriptedServer::seated(2).with_moves([12]);
    let mut coordinator = TurnCoordinator::connect(server, party(), board(), &config).unwrap();
    let mut sleeps = Vec::new();

    coordinator.wait_for_remote(|delay| sleeps.push(delay)).unwrap();

    assert!(sleeps.is_empty());
}

#[test]
fn test_poll_limit_ends_session() {
    let config = SessionConfig::default().with_poll(PollPolicy::default().with_max_attempts(3));
    let mut coordinator =
        TurnCoordinator::connect(ScriptedServer::seated(2), party(), board(), &config).unwrap();

    let err = coordinator.wait_for_remote(|_| {}).unwrap_err();

    assert_eq!(err, SessionError::PollLimitExceeded { attempts: 3 });
    assert_eq!(coordinator.phase(), TurnPhase::GameOver);
    assert_eq!(
        coordinator.outcome(),
        Some(GameOutcome::Aborted(AbortReason::PollLimit))
    );
}

// =============================================================================
// Failures and Teardown
// =============================================================================

#[test]
fn test_push_failure_is_fatal() {
    let server = ScriptedServer::seated(1).with_push_failure(unreachable());
    let mut coordinator = connect(server);

    let err = coordinator.submit_local_move(NodeId::new(2)).unwrap_err();

    assert_eq!(err, SessionError::Transport(unreachable()));
    assert!(!err.is_recoverable());
    assert_eq!(coordinator.phase(), TurnPhase::GameOver);
    assert_eq!(
        coordinator.outcome(),
        Some(GameOutcome::Aborted(AbortReason::Transport))
    );

    let err = coordinator.submit_local_move(NodeId::new(3)).unwrap_err();
    assert!(matches!(err, SessionError::SessionOver { .. }));
    assert_eq!(coordinator.server().pushes(), 1);
}

#[test]
fn test_get_move_failure_is_fatal() {
    let server = ScriptedServer::seated(2)
        .with_moves([0])
        .with_get_move_failure(unreachable());
    let mut coordinator = connect(server);

    let err = coordinator.wait_for_remote(|_| {}).unwrap_err();

    assert_eq!(err, SessionError::Transport(unreachable()));
    assert_eq!(coordinator.phase(), TurnPhase::GameOver);
    assert!(coordinator.poll_remote().is_err());
    assert_eq!(coordinator.server().calls.len(), 3);
}

#[test]
fn test_abandon() {
    let mut coordinator = connect(ScriptedServer::seated(2));

    coordinator.abandon();

    assert_eq!(coordinator.phase(), TurnPhase::GameOver);
    assert_eq!(
        coordinator.outcome(),
        Some(GameOutcome::Aborted(AbortReason::Abandoned))
    );
    assert_eq!(
        coordinator.poll_remote().unwrap_err(),
        SessionError::SessionOver {
            outcome: GameOutcome::Aborted(AbortReason::Abandoned)
        }
    );
    assert_eq!(coordinator.winning_chain(), None);
}

// =============================================================================
// Two Clients
// =============================================================================

/// Full game through the in-memory server. Player A wins with 1, 5, 9.
#[test]
fn test_two_client_game() {
    let server = InMemoryServer::new();
    server.open_party(party());
    let board = board();
    let config = SessionConfig::default();

    let mut first =
        TurnCoordinator::connect(server.connect(), party(), Arc::clone(&board), &config).unwrap();
    let mut second =
        TurnCoordinator::connect(server.connect(), party(), Arc::clone(&board), &config).unwrap();
    assert_eq!(first.local_player(), Player::A);
    assert_eq!(second.local_player(), Player::B);

    // Nothing to see before the first move.
    assert!(matches!(second.poll_remote().unwrap(), PollStatus::Pending { .. }));

    let script = [(Player::A, 1), (Player::B, 2), (Player::A, 5), (Player::B, 3)];
    for (player, node) in script {
        let (mover, waiter) = match player {
            Player::A => (&mut first, &mut second),
            Player::B => (&mut second, &mut first),
        };
        mover.submit_local_move(NodeId::new(node)).unwrap();
        // The mover's own move is never echoed back to it.
        assert!(matches!(mover.poll_remote().unwrap(), PollStatus::Pending { .. }));

        let event = waiter.wait_for_remote(|_| {}).unwrap();
        assert_eq!(event.mv().node, NodeId::new(node));
        assert_eq!(event.outcome(), None);
    }

    let event = first.submit_local_move(NodeId::new(9)).unwrap();
    assert_eq!(event.outcome(), Some(GameOutcome::LocalWin));
    assert_eq!(first.phase(), TurnPhase::GameOver);

    let event = second.wait_for_remote(|_| {}).unwrap();
    assert_eq!(event.outcome(), Some(GameOutcome::LocalLoss));
    assert_eq!(second.phase(), TurnPhase::GameOver);

    assert_eq!(first.snapshot(), second.snapshot());
    let chain = first.winning_chain().unwrap();
    assert_eq!(second.winning_chain(), Some(chain.clone()));
    for node in [1, 5, 9] {
        assert!(chain.contains(&NodeId::new(node)));
    }

    // Each side records its own moves as local and the opponent's as remote.
    for record in first.state().history().iter() {
        let expected = if record.mv.player == Player::A {
            MoveOrigin::Local
        } else {
            MoveOrigin::Remote
        };
        assert_eq!(record.origin, expected);
    }
    for record in second.state().history().iter() {
        let expected = if record.mv.player == Player::B {
            MoveOrigin::Local
        } else {
            MoveOrigin::Remote
        };
        assert_eq!(record.origin, expected);
    }
    assert_eq!(first.state().history().len(), 5);
    assert_eq!(second.state().history().len(), 5);

    // Strict alternation, as relayed.
    let colors: Vec<String> = server.moves(&party()).into_iter().map(|m| m.color).collect();
    assert_eq!(colors, vec!["blue", "red", "blue", "red", "blue"]);
}

#[test]
fn test_third_client_is_turned_away() {
    let server = InMemoryServer::new();
    server.open_party(party());
    let config = SessionConfig::default();

    let _first = TurnCoordinator::connect(server.connect(), party(), board(), &config).unwrap();
    let _second = TurnCoordinator::connect(server.connect(), party(), board(), &config).unwrap();
    let third = TurnCoordinator::connect(server.connect(), party(), board(), &config);

    assert!(matches!(third, Err(SessionError::InvalidSession { .. })));
}

#[test]
fn test_server_outage_mid_game() {
    let server = InMemoryServer::new();
    server.open_party(party());
    let config = SessionConfig::default();

    let mut first = TurnCoordinator::connect(server.connect(), party(), board(), &config).unwrap();
    let mut second =
        TurnCoordinator::connect(server.connect(), party(), board(), &config).unwrap();

    first.submit_local_move(NodeId::new(14)).unwrap();
    server.fail_after(0);

    let err = second.wait_for_remote(|_| {}).unwrap_err();
    assert!(matches!(err, SessionError::Transport(TransportError::Unreachable(_))));
    assert_eq!(
        second.outcome(),
        Some(GameOutcome::Aborted(AbortReason::Transport))
    );
    assert_eq!(second.state().history().len(), 0);
}
