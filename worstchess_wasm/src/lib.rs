// Browser bindings. The page owns the DOM and the socket: it forwards gestures and server
// messages here, drains `next_request` after every call and redraws from `board_view_json`
// whenever `take_render_request` says so.

#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod web_error_handling;

use std::sync::mpsc;

use instant::Instant;
use wasm_bindgen::prelude::*;

use worstchess::client::{ClientState, EventError, NotableEvent, OutgoingRequest};
use worstchess::clock::ClockSide;
use worstchess::config::ClientConfig;
use worstchess::coord::Coord;
use worstchess::display::pixel_to_coord;
use worstchess::event::{GameAction, ServerEvent, StatusSnapshot};
use worstchess::force::Force;
use worstchess::input::InputOutcome;
use worstchess::piece::PieceKind;

use crate::web_error_handling::JsResult;


#[wasm_bindgen(getter_with_clone)]
pub struct JsRequestEmit {
    // Serialized `ClientEvent`, ready to be sent over the socket.
    pub message: String,
}

#[wasm_bindgen]
pub struct JsRequestFetchStatus {}

#[wasm_bindgen]
pub struct WebClient {
    state: ClientState,
    requests_rx: mpsc::Receiver<OutgoingRequest>,
}

#[wasm_bindgen]
impl WebClient {
    // `config` is a JSON-serialized `ClientConfig`; missing fields take default values.
    pub fn new_client(config: &str) -> JsResult<WebClient> {
        let config = parse_config(config).map_err(|err| rust_error!("{err}"))?;
        let (requests_tx, requests_rx) = mpsc::channel();
        Ok(WebClient {
            state: ClientState::new(config, requests_tx),
            requests_rx,
        })
    }

    pub fn sync(&self) { self.state.sync(); }

    pub fn select_color(&mut self, color: &str) -> JsResult<()> {
        let force = color.parse::<Force>().map_err(|_| rust_error!("Unknown color: {color}"))?;
        self.state.select_color(force, Instant::now());
        Ok(())
    }
    pub fn game_action(&mut self, action: &str) -> JsResult<()> {
        let action =
            action.parse::<GameAction>().map_err(|_| rust_error!("Unknown action: {action}"))?;
        self.state.game_action(action);
        Ok(())
    }
    pub fn set_depth(&mut self, depth: u32) { self.state.set_depth(depth); }
    pub fn set_engine_time(&mut self, secs: u32) { self.state.set_engine_time(secs); }

    pub fn click(&mut self, square: &str) -> JsResult<String> {
        let coord = parse_square(square).map_err(|err| rust_error!("{err}"))?;
        Ok(outcome_name(self.state.click(coord)).to_owned())
    }
    // Returns `false` if the native drag must be cancelled.
    pub fn drag_start(&mut self, square: &str) -> JsResult<bool> {
        let coord = parse_square(square).map_err(|err| rust_error!("{err}"))?;
        Ok(!matches!(self.state.drag_start(coord), InputOutcome::DragRefused(_)))
    }
    // Pointer position relative to the board's top-left corner, in pixels.
    pub fn drag_hover(&mut self, x: f64, y: f64, board_size: f64) {
        let coord = self.coord_at(x, y, board_size);
        self.state.drag_hover(coord);
    }
    pub fn drag_drop(&mut self, x: f64, y: f64, board_size: f64) -> String {
        let coord = self.coord_at(x, y, board_size);
        outcome_name(self.state.drag_drop(coord)).to_owned()
    }
    pub fn drag_end(&mut self) { self.state.drag_end(); }
    pub fn choose_promotion(&mut self, letter: &str) -> JsResult<String> {
        let kind = parse_promotion(letter).map_err(|err| rust_error!("{err}"))?;
        Ok(outcome_name(self.state.choose_promotion(kind)).to_owned())
    }
    pub fn dismiss_promotion(&mut self) { self.state.dismiss_promotion(); }

    // Returns the notable event name, or "move_rejected".
    pub fn process_server_event(&mut self, event: &str) -> JsResult<String> {
        let server_event: ServerEvent =
            serde_json::from_str(event).map_err(|err| rust_error!("Bad server event: {err}"))?;
        Ok(match self.state.process_server_event(server_event) {
            Ok(ev) => notable_event_name(&ev),
            Err(EventError::MoveRejected(_)) => "move_rejected",
        }
        .to_owned())
    }
    pub fn apply_status(&mut self, status: &str) -> JsResult<()> {
        let status: StatusSnapshot =
            serde_json::from_str(status).map_err(|err| rust_error!("Bad status: {err}"))?;
        self.state.apply_status(status);
        Ok(())
    }
    pub fn status_fetch_failed(&self, error: &str) { self.state.status_fetch_failed(error); }

    // Should be called on a timer, at least once per second.
    pub fn refresh(&mut self) -> String {
        notable_event_name(&self.state.refresh(Instant::now())).to_owned()
    }

    // `JsRequestEmit`, `JsRequestFetchStatus` or `null` when there is nothing to send.
    pub fn next_request(&mut self) -> JsResult<JsValue> {
        match self.requests_rx.try_recv() {
            Ok(OutgoingRequest::Emit(event)) => {
                let message = serde_json::to_string(&event)
                    .map_err(|err| rust_error!("Cannot serialize {event:?}: {err}"))?;
                Ok(JsRequestEmit { message }.into())
            }
            Ok(OutgoingRequest::FetchStatus) => Ok(JsRequestFetchStatus {}.into()),
            Err(_) => Ok(JsValue::NULL),
        }
    }

    pub fn take_render_request(&self) -> bool { self.state.take_render_request() }

    pub fn board_view_json(&self) -> JsResult<String> {
        serde_json::to_string(&self.state.board_view())
            .map_err(|err| rust_error!("Cannot serialize board: {err}"))
    }
    pub fn status_text(&self) -> String { self.state.board_view().status }
    pub fn move_list_json(&self) -> JsResult<String> {
        serde_json::to_string(&self.state.history().numbered_rows())
            .map_err(|err| rust_error!("Cannot serialize move list: {err}"))
    }
    pub fn player_clock(&self) -> String { self.state.clock().showing(ClockSide::Player) }
    pub fn opponent_clock(&self) -> String { self.state.clock().showing(ClockSide::Opponent) }
    pub fn is_clock_running(&self) -> bool { self.state.clock().is_running() }
    pub fn awaiting_promotion(&self) -> bool {
        self.state.input_state().pending_promotion().is_some()
    }
    pub fn is_dragging(&self) -> bool { self.state.input_state().is_dragging() }

    fn coord_at(&self, x: f64, y: f64, board_size: f64) -> Option<Coord> {
        pixel_to_coord(x, y, board_size, self.state.orientation())
    }
}

fn parse_config(config: &str) -> Result<ClientConfig, String> {
    if config.trim().is_empty() {
        return Ok(ClientConfig::default());
    }
    serde_json::from_str(config).map_err(|err| format!("Bad config: {err}"))
}

fn parse_square(square: &str) -> Result<Coord, String> {
    Coord::from_algebraic(square).ok_or_else(|| format!("Not a square: {square}"))
}

fn parse_promotion(letter: &str) -> Result<PieceKind, String> {
    let mut chars = letter.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => PieceKind::from_promotion_letter(ch.to_ascii_lowercase()),
        _ => None,
    }
    .ok_or_else(|| format!("Not a promotion piece: {letter}"))
}

fn outcome_name(outcome: InputOutcome) -> &'static str {
    match outcome {
        InputOutcome::Noop => "noop",
        InputOutcome::Submit(_) => "submit",
        InputOutcome::PromptPromotion { .. } => "prompt_promotion",
        InputOutcome::DragRefused(_) => "drag_refused",
    }
}

fn notable_event_name(event: &NotableEvent) -> &'static str {
    match event {
        NotableEvent::None => "none",
        NotableEvent::MoveAccepted => "move_accepted",
        NotableEvent::EngineMoved => "engine_moved",
        NotableEvent::BoardReset => "board_reset",
        NotableEvent::GameOver => "game_over",
        NotableEvent::SettingsUpdated => "settings_updated",
    }
}
