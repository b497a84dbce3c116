// Test utilities shared by unit tests, integration tests and the front ends' tests.

use std::sync::mpsc;

use crate::client::{ClientState, OutgoingRequest};
use crate::config::ClientConfig;
use crate::event::{ClientEvent, StatusSnapshot};
use crate::force::Force;
use crate::position::STARTING_POSITION;


pub const AFTER_E4: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";

// Legal moves for white in the starting position, in the order python-chess lists them.
pub const STARTING_MOVES: [&str; 20] = [
    "g1h3", "g1f3", "b1c3", "b1a3", "h2h3", "g2g3", "f2f3", "e2e3", "d2d3", "c2c3", "b2b3",
    "a2a3", "h2h4", "g2g4", "f2f4", "e2e4", "d2d4", "c2c4", "b2b4", "a2a4",
];

pub fn status(
    fen: &str, moves: &[&str], turn: Force, player_color: Option<Force>,
) -> StatusSnapshot {
    StatusSnapshot {
        fen: fen.to_owned(),
        moves: moves.iter().map(|m| (*m).to_owned()).collect(),
        turn,
        player_color,
        is_check: false,
        is_game_over: false,
        outcome: None,
    }
}

pub fn starting_status(player_color: Option<Force>) -> StatusSnapshot {
    status(STARTING_POSITION, &STARTING_MOVES, Force::White, player_color)
}

pub fn new_client(config: ClientConfig) -> (ClientState, mpsc::Receiver<OutgoingRequest>) {
    let (tx, rx) = mpsc::channel();
    (ClientState::new(config, tx), rx)
}

pub fn drain_requests(rx: &mpsc::Receiver<OutgoingRequest>) -> Vec<OutgoingRequest> {
    rx.try_iter().collect()
}

// Only the socket events, in order.
pub fn drain_emitted(rx: &mpsc::Receiver<OutgoingRequest>) -> Vec<ClientEvent> {
    rx.try_iter()
        .filter_map(|request| match request {
            OutgoingRequest::Emit(event) => Some(event),
            OutgoingRequest::FetchStatus => None,
        })
        .collect()
}
