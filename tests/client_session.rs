// Client driven through whole sessions: user gestures in, socket events and status snapshots in,
// outgoing requests and the rendered board out.

mod common;

use std::sync::mpsc;
use std::time::Duration;

use common::*;
use instant::Instant;
use pretty_assertions::assert_eq;
use worstchess::client::{ClientState, EventError, NotableEvent, OutgoingRequest};
use worstchess::clock::{ClockSide, TimeControl};
use worstchess::config::{ClientConfig, UiVariant};
use worstchess::coord::Coord;
use worstchess::display::BoardOrientation;
use worstchess::event::{ClientEvent, GameAction};
use worstchess::force::Force;
use worstchess::history::MoveAuthor;
use worstchess::input::{InputBlock, InputOutcome, InputState};
use worstchess::outcome::Outcome;
use worstchess::piece::PieceKind;
use worstchess::position::STARTING_POSITION;
use worstchess::test_util::*;


const AFTER_E4_E5: &str = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2";

fn config_with_time(secs: u64) -> ClientConfig {
    ClientConfig {
        time_control: TimeControl { starting_time: Duration::from_secs(secs) },
        ..ClientConfig::default()
    }
}

// Client that has synced the starting position and picked `force`.
fn playing_as(
    force: Force, config: ClientConfig, t0: Instant,
) -> (ClientState, mpsc::Receiver<OutgoingRequest>) {
    let (mut client, rx) = new_client(config);
    client.apply_status(starting_status(None));
    client.select_color(force, t0);
    drain_requests(&rx);
    (client, rx)
}

#[test]
fn sync_on_startup() {
    let (client, rx) = new_client(ClientConfig::default());
    client.sync();
    assert_eq!(drain_requests(&rx), vec![OutgoingRequest::FetchStatus]);
}

#[test]
fn play_e2e4() {
    let t0 = Instant::now();
    let (mut client, rx) = playing_as(Force::White, ClientConfig::default(), t0);

    assert_eq!(client.click(Coord::E2), InputOutcome::Noop);
    assert_eq!(client.input_state(), InputState::Selected { from: Coord::E2 });
    let view = client.board_view();
    assert!(view.square(Coord::E2).unwrap().flags.selected);
    assert!(view.square(Coord::E3).unwrap().flags.legal_hint);
    assert!(view.square(Coord::E4).unwrap().flags.legal_hint);
    assert!(!view.square(Coord::E5).unwrap().flags.legal_hint);

    assert_eq!(client.click(Coord::E4), InputOutcome::Submit("e2e4".parse().unwrap()));
    assert_eq!(drain_emitted(&rx), vec![ClientEvent::Move { move_code: "e2e4".to_owned() }]);
    // Nothing moves until the server answers.
    assert!(client.cache().position().piece_at(Coord::E2).is_some());

    let event = server_event!({
        "event": "move_response",
        "data": {
            "valid": true,
            "fen": AFTER_E4,
            "last_move": "e2e4",
            "moves": ["e7e5", "e7e6", "g8f6"],
            "check": false,
            "game_over": false,
        }
    });
    assert_eq!(client.process_server_event(event), Ok(NotableEvent::MoveAccepted));
    assert_eq!(client.cache().active_force(), Force::Black);
    assert_eq!(client.last_move(), Some((Coord::E2, Coord::E4)));
    let view = client.board_view();
    assert!(view.square(Coord::E2).unwrap().flags.last_move_from);
    assert!(view.square(Coord::E4).unwrap().flags.last_move_to);
    assert!(view.square(Coord::E4).unwrap().piece.is_some());
    assert_eq!(view.status, "Engine is thinking...");
    assert_eq!(client.history().entries().len(), 1);
    assert_eq!(client.history().entries()[0].notation, "e4");
    // Fresh moves came with the position, so no resync.
    assert_eq!(drain_requests(&rx), vec![]);
}

#[test]
fn engine_reply_in_same_response() {
    let t0 = Instant::now();
    let (mut client, rx) = playing_as(Force::White, ClientConfig::default(), t0);
    client.click(Coord::E2);
    client.click(Coord::E4);
    drain_requests(&rx);

    let event = server_event!({
        "event": "move_response",
        "data": {
            "valid": true,
            "fen": AFTER_E4_E5,
            "last_move": "e2e4",
            "engine_move": "e7e5",
            "moves": ["g1f3", "d2d4"],
            "check": false,
            "game_over": false,
        }
    });
    assert_eq!(client.process_server_event(event), Ok(NotableEvent::EngineMoved));
    assert_eq!(client.last_move(), Some((Coord::E7, Coord::E5)));
    let notations: Vec<_> =
        client.history().entries().iter().map(|e| e.notation.as_str()).collect();
    assert_eq!(notations, vec!["e4", "e5"]);
    assert_eq!(client.history().entries()[1].author, MoveAuthor::Engine);
    assert_eq!(client.history().numbered_rows(), vec!["1. e4 e5"]);
    assert_eq!(client.board_view().status, "Your move (White).");
    // The check flag of the response predates the engine move: pull the real one.
    assert_eq!(drain_requests(&rx), vec![OutgoingRequest::FetchStatus]);
}

#[test]
fn rejected_move_shows_message() {
    let t0 = Instant::now();
    let (mut client, _rx) = playing_as(Force::White, ClientConfig::default(), t0);
    client.click(Coord::E2);
    client.click(Coord::E4);
    let event = server_event!({
        "event": "move_response",
        "data": {"valid": false, "message": "Illegal move"}
    });
    assert_eq!(
        client.process_server_event(event),
        Err(EventError::MoveRejected("Illegal move".to_owned()))
    );
    assert_eq!(client.input_state(), InputState::Idle);
    assert_eq!(client.board_view().status, "Illegal move");
    assert!(client.history().is_empty());
    assert_eq!(client.cache().position().as_fen(), STARTING_POSITION);

    // Next selection clears the message once a move is sent.
    client.click(Coord::G1);
    client.click(Coord::F3);
    assert_eq!(client.notice(), None);
}

#[test]
fn engine_opens_when_player_picks_black() {
    let t0 = Instant::now();
    let (mut client, rx) = playing_as(Force::Black, ClientConfig::default(), t0);
    assert_eq!(client.orientation(), BoardOrientation::Rotated);
    let event = server_event!({
        "event": "move_made",
        "data": {"move": "e2e4", "fen": AFTER_E4}
    });
    assert_eq!(client.process_server_event(event), Ok(NotableEvent::EngineMoved));
    assert_eq!(client.history().entries()[0].notation, "e4");
    assert_eq!(client.last_move(), Some((Coord::E2, Coord::E4)));
    assert!(client.cache().legal_moves_stale());
    assert!(client.cache().legal_moves().is_empty());
    assert_eq!(drain_requests(&rx), vec![OutgoingRequest::FetchStatus]);

    // Stale moves are never offered.
    assert_eq!(client.click(Coord::E7), InputOutcome::Noop);
    assert_eq!(client.input_state(), InputState::Idle);

    client.apply_status(status(AFTER_E4, &["e7e5"], Force::Black, Some(Force::Black)));
    client.click(Coord::E7);
    assert_eq!(client.input_state(), InputState::Selected { from: Coord::E7 });
}

#[test]
fn malformed_fields_are_ignored() {
    let t0 = Instant::now();
    let (mut client, _rx) = playing_as(Force::White, ClientConfig::default(), t0);
    let event = server_event!({
        "event": "move_made",
        "data": {"move": "e2e9", "fen": "not a position"}
    });
    assert_eq!(client.process_server_event(event), Ok(NotableEvent::None));
    assert_eq!(client.cache().position().as_fen(), STARTING_POSITION);
    assert_eq!(client.cache().legal_moves().len(), STARTING_MOVES.len());
    assert_eq!(client.last_move(), None);
}

#[test]
fn undo_takes_back_a_full_move() {
    let t0 = Instant::now();
    let (mut client, rx) = playing_as(Force::White, ClientConfig::default(), t0);
    client.click(Coord::E2);
    client.click(Coord::E4);
    client
        .process_server_event(server_event!({
            "event": "move_response",
            "data": {
                "valid": true,
                "fen": AFTER_E4_E5,
                "last_move": "e2e4",
                "engine_move": "e7e5",
                "moves": ["g1f3"],
            }
        }))
        .unwrap();
    drain_requests(&rx);

    client.game_action(GameAction::Undo);
    assert_eq!(drain_emitted(&rx), vec![ClientEvent::GameAction { action: GameAction::Undo }]);
    let event = server_event!({
        "event": "board_update",
        "data": {"action": "undo", "fen": STARTING_POSITION}
    });
    assert_eq!(client.process_server_event(event), Ok(NotableEvent::BoardReset));
    assert!(client.history().is_empty());
    assert_eq!(client.last_move(), None);
    assert_eq!(client.cache().position().as_fen(), STARTING_POSITION);
    assert!(drain_requests(&rx).contains(&OutgoingRequest::FetchStatus));
}

#[test]
fn new_game_clears_session() {
    let t0 = Instant::now();
    let (mut client, rx) = playing_as(Force::White, ClientConfig::default(), t0);
    client.click(Coord::E2);
    client.click(Coord::E4);
    client
        .process_server_event(server_event!({
            "event": "move_response",
            "data": {"valid": true, "fen": AFTER_E4, "last_move": "e2e4", "moves": []}
        }))
        .unwrap();
    client.refresh(t0 + Duration::from_secs(5));

    client
        .process_server_event(server_event!({
            "event": "board_update",
            "data": {"action": "new_game", "fen": STARTING_POSITION}
        }))
        .unwrap();
    assert!(client.history().is_empty());
    assert_eq!(client.last_move(), None);
    assert_eq!(client.player_force(), None);
    assert_eq!(client.clock().remaining_secs(ClockSide::Player), 600);
    assert!(!client.clock().is_running());
    assert_eq!(client.board_view().status, "Choose a side to start.");
    assert!(drain_requests(&rx).contains(&OutgoingRequest::FetchStatus));
}

#[test]
fn flip_is_confirmed_by_server() {
    let t0 = Instant::now();
    let (mut client, rx) = playing_as(Force::White, ClientConfig::default(), t0);
    client.game_action(GameAction::Flip);
    assert_eq!(drain_emitted(&rx), vec![ClientEvent::GameAction { action: GameAction::Flip }]);
    assert_eq!(client.orientation(), BoardOrientation::Normal);

    let flip = || server_event!({"event": "board_update", "data": {"action": "flip"}});
    client.process_server_event(flip()).unwrap();
    assert_eq!(client.orientation(), BoardOrientation::Rotated);
    assert_eq!(client.board_view().squares[0].coord, Coord::H1);
    client.process_server_event(flip()).unwrap();
    assert_eq!(client.orientation(), BoardOrientation::Normal);
    assert_eq!(client.board_view().squares[0].coord, Coord::A8);
}

#[test]
fn clock_charges_side_to_move() {
    let t0 = Instant::now();
    let (mut client, _rx) = playing_as(Force::White, config_with_time(60), t0);
    for n in 1..=5 {
        client.refresh(t0 + Duration::from_secs(n));
    }
    assert_eq!(client.clock().remaining_secs(ClockSide::Player), 55);
    assert_eq!(client.clock().remaining_secs(ClockSide::Opponent), 60);

    client.apply_status(status(AFTER_E4, &["e7e5"], Force::Black, Some(Force::White)));
    client.refresh(t0 + Duration::from_secs(8));
    assert_eq!(client.clock().remaining_secs(ClockSide::Player), 55);
    assert_eq!(client.clock().remaining_secs(ClockSide::Opponent), 57);
}

#[test]
fn local_timeout_ends_game() {
    let t0 = Instant::now();
    let (mut client, _rx) = playing_as(Force::White, config_with_time(3), t0);
    assert_eq!(client.refresh(t0 + Duration::from_secs(2)), NotableEvent::None);
    assert_eq!(client.refresh(t0 + Duration::from_secs(3)), NotableEvent::GameOver);
    assert_eq!(client.clock().remaining_secs(ClockSide::Player), 0);
    assert!(client.is_game_over());
    assert_eq!(client.board_view().status, "White ran out of time. Black wins.");

    // Frozen: more time passing changes nothing.
    assert_eq!(client.refresh(t0 + Duration::from_secs(30)), NotableEvent::None);
    assert_eq!(client.clock().remaining_secs(ClockSide::Opponent), 3);

    // Input is blocked.
    assert_eq!(client.click(Coord::E2), InputOutcome::Noop);
    assert_eq!(client.drag_start(Coord::E2), InputOutcome::DragRefused(InputBlock::GameOver));

    // A snapshot saying the game goes on does not revive it.
    client.apply_status(starting_status(Some(Force::White)));
    assert!(client.is_game_over());

    // Server outcome wins over the local one.
    let mut snapshot = starting_status(Some(Force::White));
    snapshot.is_game_over = true;
    snapshot.outcome = Some("insufficient_material".to_owned());
    client.apply_status(snapshot);
    assert_eq!(
        client.game_result().map(|(outcome, _)| outcome),
        Some(Outcome::InsufficientMaterial)
    );
    assert!(!client.clock().is_running());

    // Only a new game starts over.
    client
        .process_server_event(server_event!({
            "event": "board_update",
            "data": {"action": "new_game", "fen": STARTING_POSITION}
        }))
        .unwrap();
    client.apply_status(starting_status(None));
    assert!(!client.is_game_over());
    client.select_color(Force::White, t0 + Duration::from_secs(40));
    assert!(client.clock().is_running());
}

#[test]
fn game_over_without_color_shows_outcome() {
    let (mut client, _rx) = new_client(ClientConfig::default());
    let mut snapshot = status("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", &[], Force::Black, None);
    snapshot.is_game_over = true;
    snapshot.outcome = Some("stalemate".to_owned());
    client.apply_status(snapshot);
    assert_eq!(client.board_view().status, "Draw by stalemate.");
}

#[test]
fn checkmate_reported_by_server() {
    let t0 = Instant::now();
    let fen = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1";
    let (mut client, rx) = new_client(ClientConfig::default());
    client.apply_status(status(fen, &["a1a8", "a1a2"], Force::White, None));
    client.select_color(Force::White, t0);
    client.click(Coord::A1);
    client.click(Coord::A8);
    drain_requests(&rx);
    let event = server_event!({
        "event": "move_response",
        "data": {
            "valid": true,
            "fen": "R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1",
            "last_move": "a1a8",
            "moves": [],
            "check": true,
            "game_over": true,
            "outcome": "checkmate",
        }
    });
    assert_eq!(client.process_server_event(event), Ok(NotableEvent::GameOver));
    assert_eq!(client.history().entries()[0].notation, "Ra8#");
    assert_eq!(client.board_view().status, "Checkmate! White wins.");
    assert!(client.clock().is_frozen());
}

#[test]
fn promotion_prompt_in_full_variant() {
    let t0 = Instant::now();
    let fen = "8/4P3/8/8/8/8/k7/4K3 w - - 0 1";
    let (mut client, rx) = new_client(ClientConfig::default());
    client.apply_status(status(fen, &["e7e8q", "e7e8r", "e7e8b", "e7e8n"], Force::White, None));
    client.select_color(Force::White, t0);
    drain_requests(&rx);

    assert_eq!(client.drag_start(Coord::E7), InputOutcome::Noop);
    assert_eq!(
        client.drag_drop(Some(Coord::E8)),
        InputOutcome::PromptPromotion { from: Coord::E7, to: Coord::E8 }
    );
    assert_eq!(drain_emitted(&rx), vec![]);
    assert_eq!(
        client.choose_promotion(PieceKind::Rook),
        InputOutcome::Submit("e7e8r".parse().unwrap())
    );
    assert_eq!(drain_emitted(&rx), vec![ClientEvent::Move { move_code: "e7e8r".to_owned() }]);
}

#[test]
fn minimal_variant() {
    let t0 = Instant::now();
    let fen = "8/4P3/8/8/8/8/k7/4K3 w - - 0 1";
    let config = ClientConfig { ui_variant: UiVariant::Minimal, ..ClientConfig::default() };
    let (mut client, rx) = new_client(config);
    client.apply_status(status(fen, &["e7e8q", "e7e8n"], Force::White, None));
    client.select_color(Force::White, t0);
    assert!(!client.clock().is_running());
    drain_requests(&rx);

    client.click(Coord::E7);
    assert_eq!(client.click(Coord::E8), InputOutcome::Submit("e7e8q".parse().unwrap()));
    client
        .process_server_event(server_event!({
            "event": "move_response",
            "data": {"valid": true, "fen": "4Q3/8/8/8/8/8/k7/4K3 b - - 0 1", "last_move": "e7e8q"}
        }))
        .unwrap();
    assert!(client.history().is_empty());
    assert_eq!(client.last_move(), Some((Coord::E7, Coord::E8)));
}

#[test]
fn engine_settings_are_clamped() {
    let (mut client, rx) = new_client(ClientConfig::default());
    client.set_depth(20);
    client.set_engine_time(0);
    assert_eq!(drain_emitted(&rx), vec![
        ClientEvent::SetDepth { depth: 8 },
        ClientEvent::UpdateTime { time: 1 },
    ]);
    let event = server_event!({"event": "time_updated", "data": {"time": 1}});
    assert_eq!(client.process_server_event(event), Ok(NotableEvent::SettingsUpdated));
    assert_eq!(client.engine_time_secs(), Some(1));
    let event = server_event!({"event": "depth_updated", "data": {"depth": 8}});
    client.process_server_event(event).unwrap();
    assert_eq!(client.search_depth(), Some(8));
}

#[test]
fn render_requests_follow_changes() {
    let t0 = Instant::now();
    let (mut client, _rx) = playing_as(Force::White, ClientConfig::default(), t0);
    assert!(client.take_render_request());
    assert!(!client.take_render_request());
    client.click(Coord::E2);
    assert!(client.take_render_request());
    client.status_fetch_failed("connection refused");
    assert!(client.take_render_request());
    assert!(!client.take_render_request());
}

#[test]
fn no_input_before_color_is_chosen() {
    let (mut client, rx) = new_client(ClientConfig::default());
    client.apply_status(starting_status(None));
    assert_eq!(client.click(Coord::E2), InputOutcome::Noop);
    assert_eq!(
        client.drag_start(Coord::E2),
        InputOutcome::DragRefused(InputBlock::NoPlayerColor)
    );
    assert_eq!(drain_emitted(&rx), vec![]);
}

#[test]
fn one_move_in_flight_at_a_time() {
    let t0 = Instant::now();
    let (mut client, rx) = playing_as(Force::White, ClientConfig::default(), t0);
    client.click(Coord::E2);
    assert_eq!(client.click(Coord::E4), InputOutcome::Submit("e2e4".parse().unwrap()));

    // Still White to move in the cache, but the board waits for the server.
    assert_eq!(client.click(Coord::D2), InputOutcome::Noop);
    assert_eq!(client.click(Coord::D4), InputOutcome::Noop);
    assert_eq!(client.input_state(), InputState::Idle);
    assert_eq!(
        client.drag_start(Coord::D2),
        InputOutcome::DragRefused(InputBlock::AwaitingServer)
    );
    assert_eq!(drain_emitted(&rx), vec![ClientEvent::Move { move_code: "e2e4".to_owned() }]);

    client
        .process_server_event(server_event!({
            "event": "move_response",
            "data": {
                "valid": true,
                "fen": AFTER_E4_E5,
                "last_move": "e2e4",
                "engine_move": "e7e5",
                "moves": ["g1f3", "d2d4"],
            }
        }))
        .unwrap();
    assert_eq!(client.history().entries()[0].notation, "e4");
    client.click(Coord::D2);
    assert_eq!(client.click(Coord::D4), InputOutcome::Submit("d2d4".parse().unwrap()));
}

#[test]
fn rejection_and_resync_release_the_board() {
    let t0 = Instant::now();
    let (mut client, _rx) = playing_as(Force::White, ClientConfig::default(), t0);
    client.click(Coord::E2);
    client.click(Coord::E4);
    let event = server_event!({"event": "move_response", "data": {"valid": false}});
    assert!(client.process_server_event(event).is_err());
    client.click(Coord::E2);
    assert_eq!(client.input_state(), InputState::Selected { from: Coord::E2 });

    client.click(Coord::E4);
    assert_eq!(client.click(Coord::G1), InputOutcome::Noop);
    client.apply_status(status(AFTER_E4_E5, &["g1f3"], Force::White, Some(Force::White)));
    client.click(Coord::G1);
    assert_eq!(client.click(Coord::F3), InputOutcome::Submit("g1f3".parse().unwrap()));
}

#[test]
fn server_color_does_not_pick_a_side() {
    let t0 = Instant::now();
    let (mut client, _rx) = new_client(ClientConfig::default());
    client.apply_status(starting_status(Some(Force::Black)));
    assert_eq!(client.player_force(), None);
    assert_eq!(client.orientation(), BoardOrientation::Normal);
    assert_eq!(client.board_view().status, "Choose a side to start.");

    client.select_color(Force::White, t0);
    client
        .process_server_event(server_event!({
            "event": "board_update",
            "data": {"action": "new_game", "fen": STARTING_POSITION}
        }))
        .unwrap();
    client.apply_status(starting_status(Some(Force::Black)));
    assert_eq!(client.player_force(), None);
    assert_eq!(client.orientation(), BoardOrientation::Normal);
    assert_eq!(client.board_view().status, "Choose a side to start.");
    assert!(!client.clock().is_running());

    // A chosen side survives a snapshot that disagrees.
    client.select_color(Force::White, t0);
    client.apply_status(starting_status(Some(Force::Black)));
    assert_eq!(client.player_force(), Some(Force::White));
    assert!(client.clock().is_running());
}

#[test]
fn server_update_drops_selection() {
    let t0 = Instant::now();
    let (mut client, _rx) = playing_as(Force::White, ClientConfig::default(), t0);
    client.click(Coord::E2);
    client
        .process_server_event(server_event!({"event": "depth_updated", "data": {"depth": 3}}))
        .unwrap();
    assert_eq!(client.input_state(), InputState::Selected { from: Coord::E2 });

    client.apply_status(starting_status(None));
    assert_eq!(client.input_state(), InputState::Idle);
    assert!(!client.board_view().square(Coord::E2).unwrap().flags.selected);
}
