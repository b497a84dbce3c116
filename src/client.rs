// Application state of a board client.
//
// `ClientState` owns the board cache together with all the purely local UI state (selection,
// last move, move list, clock, orientation). It is driven by three kinds of input:
//   - server events (`process_server_event`) and status snapshots (`apply_status`);
//   - user gestures (`click`, `drag_start`, ...);
//   - the passage of time (`refresh`).
// Outgoing traffic is put into a channel; the front end decides how to deliver it.

use std::cell::Cell;
use std::sync::mpsc;

use instant::Instant;
use log::{debug, info, warn};

use crate::cache::{BoardCache, CachePatch, Snapshot};
use crate::clock::{Clock, ClockSide};
use crate::config::{ClientConfig, UiVariant};
use crate::coord::Coord;
use crate::dirty::Dirty;
use crate::display::BoardOrientation;
use crate::event::{
    ClientEvent, GameAction, MAX_ENGINE_TIME_SECS, MAX_SEARCH_DEPTH, MIN_ENGINE_TIME_SECS,
    MIN_SEARCH_DEPTH, MoveResponse, ServerEvent, StatusSnapshot,
};
use crate::force::Force;
use crate::grid::Grid;
use crate::history::{HistoryEntry, MoveAuthor, MoveHistory};
use crate::input::{InputContext, InputEvent, InputOutcome, InputState, transition};
use crate::movecode::MoveCode;
use crate::notation::{CheckMark, describe_move};
use crate::outcome::Outcome;
use crate::piece::PieceKind;
use crate::position::Position;
use crate::render::{BoardView, RenderInput, StatusFacts, render_board};


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum OutgoingRequest {
    // Send over the socket.
    Emit(ClientEvent),
    // Pull the full state from the status endpoint and pass it to `apply_status`.
    FetchStatus,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NotableEvent {
    None,
    MoveAccepted,
    EngineMoved,
    BoardReset,
    GameOver,
    SettingsUpdated,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum EventError {
    MoveRejected(String),
}

// A move that has been sent but not answered yet. Remembers the board it was made on, so that the
// move list can be written once the server accepts it.
#[derive(Clone, Debug)]
struct PendingMove {
    move_code: MoveCode,
    grid_before: Grid,
    legal_before: Vec<MoveCode>,
}

pub struct ClientState {
    config: ClientConfig,
    requests_tx: mpsc::Sender<OutgoingRequest>,
    cache: BoardCache,
    input: Dirty<InputState>,
    last_move: Dirty<Option<(Coord, Coord)>>,
    history: Dirty<MoveHistory>,
    clock: Dirty<Clock>,
    orientation: Dirty<BoardOrientation>,
    // Side that ran out of time on the local clock. Only a new game clears it.
    local_timeout: Dirty<Option<Force>>,
    // Shown instead of the turn prompt, e.g. why a move was rejected.
    notice: Dirty<Option<String>>,
    search_depth: Dirty<Option<u32>>,
    engine_time_secs: Dirty<Option<u32>>,
    pending_move: Option<PendingMove>,
    // Redraw without any state change (e.g. after a failed status fetch).
    redraw_requested: Cell<bool>,
}

impl ClientState {
    pub fn new(config: ClientConfig, requests_tx: mpsc::Sender<OutgoingRequest>) -> Self {
        let clock = Clock::new(config.time_control.clone());
        ClientState {
            config,
            requests_tx,
            cache: BoardCache::new(),
            input: Dirty::new(InputState::Idle),
            last_move: Dirty::new(None),
            history: Dirty::new(MoveHistory::new()),
            clock: Dirty::new(clock),
            orientation: Dirty::new(BoardOrientation::Normal),
            local_timeout: Dirty::new(None),
            notice: Dirty::new(None),
            search_depth: Dirty::new(None),
            engine_time_secs: Dirty::new(None),
            pending_move: None,
            redraw_requested: Cell::new(true),
        }
    }

    pub fn config(&self) -> &ClientConfig { &self.config }
    pub fn ui_variant(&self) -> UiVariant { self.config.ui_variant }
    pub fn cache(&self) -> &BoardCache { &self.cache }
    pub fn input_state(&self) -> InputState { *self.input }
    pub fn last_move(&self) -> Option<(Coord, Coord)> { *self.last_move }
    pub fn history(&self) -> &MoveHistory { &self.history }
    pub fn clock(&self) -> &Clock { &self.clock }
    pub fn orientation(&self) -> BoardOrientation { *self.orientation }
    pub fn notice(&self) -> Option<&str> { self.notice.as_deref() }
    pub fn search_depth(&self) -> Option<u32> { *self.search_depth }
    pub fn engine_time_secs(&self) -> Option<u32> { *self.engine_time_secs }
    pub fn player_force(&self) -> Option<Force> { self.cache.player_force() }
    pub fn local_timeout(&self) -> Option<Force> { *self.local_timeout }

    // Either the server said so or the local clock ran out.
    pub fn is_game_over(&self) -> bool {
        self.cache.is_game_over() || self.local_timeout.is_some()
    }

    // Outcome and losing side. A server outcome replaces a local timeout.
    pub fn game_result(&self) -> Option<(Outcome, Force)> {
        if self.cache.is_game_over() {
            if let Some(outcome) = self.cache.outcome() {
                // Mated or stalemated side is the one to move.
                return Some((outcome, self.cache.active_force()));
            }
        }
        (*self.local_timeout).map(|loser| (Outcome::Timeout, loser))
    }

    pub fn status_facts(&self) -> StatusFacts {
        StatusFacts {
            game_over: self.is_game_over(),
            result: self.game_result(),
            player_force: self.cache.player_force(),
            active_force: self.cache.active_force(),
            is_check: self.cache.is_check(),
            notice: (*self.notice).clone(),
        }
    }

    pub fn board_view(&self) -> BoardView {
        render_board(&RenderInput {
            cache: &self.cache,
            input: *self.input,
            last_move: *self.last_move,
            orientation: *self.orientation,
            piece_dir: &self.config.piece_dir,
            status: self.status_facts(),
        })
    }

    // Whether anything visible changed since the last call. Important: take all dirt, no
    // short-circuiting!
    pub fn take_render_request(&self) -> bool {
        self.redraw_requested.replace(false)
            | self.cache.take_dirt()
            | self.input.take_dirt()
            | self.last_move.take_dirt()
            | self.history.take_dirt()
            | self.clock.take_dirt()
            | self.orientation.take_dirt()
            | self.local_timeout.take_dirt()
            | self.notice.take_dirt()
            | self.search_depth.take_dirt()
            | self.engine_time_secs.take_dirt()
    }

    // Asks the front end to pull the full state. Should be called once on startup.
    pub fn sync(&self) { self.send(OutgoingRequest::FetchStatus); }

    pub fn select_color(&mut self, force: Force, now: Instant) {
        info!("Playing as {force}");
        self.send(OutgoingRequest::Emit(ClientEvent::SelectColor { color: force }));
        self.cache.set_player_force(Some(force));
        self.orientation.set(BoardOrientation::for_force(force));
        self.reset_input();
        self.notice.set(None);
        let start_clock = self.config.ui_variant.has_clock() && !self.is_game_over();
        let clock = self.clock.get_mut();
        clock.reset();
        if start_clock {
            clock.start(now);
        }
    }

    pub fn game_action(&mut self, action: GameAction) {
        self.send(OutgoingRequest::Emit(ClientEvent::GameAction { action }));
    }

    pub fn set_depth(&mut self, depth: u32) {
        let depth = depth.clamp(MIN_SEARCH_DEPTH, MAX_SEARCH_DEPTH);
        self.send(OutgoingRequest::Emit(ClientEvent::SetDepth { depth }));
    }

    pub fn set_engine_time(&mut self, secs: u32) {
        let time = secs.clamp(MIN_ENGINE_TIME_SECS, MAX_ENGINE_TIME_SECS);
        self.send(OutgoingRequest::Emit(ClientEvent::UpdateTime { time }));
    }

    pub fn click(&mut self, coord: Coord) -> InputOutcome {
        self.input_event(InputEvent::Click(coord))
    }
    pub fn drag_start(&mut self, coord: Coord) -> InputOutcome {
        self.input_event(InputEvent::DragStart(coord))
    }
    pub fn drag_hover(&mut self, coord: Option<Coord>) -> InputOutcome {
        self.input_event(InputEvent::DragHover(coord))
    }
    pub fn drag_drop(&mut self, coord: Option<Coord>) -> InputOutcome {
        self.input_event(InputEvent::Drop(coord))
    }
    pub fn drag_end(&mut self) -> InputOutcome { self.input_event(InputEvent::DragEnd) }
    pub fn choose_promotion(&mut self, kind: PieceKind) -> InputOutcome {
        self.input_event(InputEvent::ChoosePromotion(kind))
    }
    pub fn dismiss_promotion(&mut self) -> InputOutcome {
        self.input_event(InputEvent::DismissPromotion)
    }

    fn input_event(&mut self, event: InputEvent) -> InputOutcome {
        let ctx = InputContext {
            cache: &self.cache,
            ui_variant: self.config.ui_variant,
            game_over: self.is_game_over(),
            awaiting_server: self.pending_move.is_some(),
        };
        let (state, outcome) = transition(*self.input, event, &ctx);
        self.input.set(state);
        if let InputOutcome::Submit(move_code) = outcome {
            self.submit_move(move_code);
        }
        outcome
    }

    fn reset_input(&mut self) { self.input_event(InputEvent::Reset); }

    fn submit_move(&mut self, move_code: MoveCode) {
        debug!("Submitting {move_code}");
        self.pending_move = Some(PendingMove {
            move_code,
            grid_before: *self.cache.position().grid(),
            legal_before: self.cache.legal_moves().to_vec(),
        });
        self.notice.set(None);
        self.send(OutgoingRequest::Emit(ClientEvent::Move { move_code: move_code.to_string() }));
    }

    // Advances the clock. Returns `NotableEvent::GameOver` if the clock ran out.
    pub fn refresh(&mut self, now: Instant) -> NotableEvent {
        if self.is_game_over() {
            if !self.clock.is_frozen() {
                self.clock.get_mut().freeze();
            }
            return NotableEvent::None;
        }
        let Some(player_force) = self.cache.player_force() else {
            return NotableEvent::None;
        };
        if !self.clock.next_tick_at().is_some_and(|t| t <= now) {
            return NotableEvent::None;
        }
        let side =
            if self.cache.is_player_turn() { ClockSide::Player } else { ClockSide::Opponent };
        if !self.clock.get_mut().advance(now, side) {
            return NotableEvent::None;
        }
        let loser = match side {
            ClockSide::Player => player_force,
            ClockSide::Opponent => player_force.opponent(),
        };
        info!("{loser} ran out of time");
        self.local_timeout.set(Some(loser));
        self.reset_input();
        NotableEvent::GameOver
    }

    // Pull resync. Replaces everything the cache knows except the player color: the server reports
    // one even before a side is chosen, so it is only ever set by `select_color`. A move still in
    // flight is forgotten: the snapshot already tells whether the server took it.
    pub fn apply_status(&mut self, status: StatusSnapshot) {
        let StatusSnapshot {
            fen,
            moves,
            turn,
            player_color,
            is_check,
            is_game_over,
            outcome,
        } = status;
        let Some(position) = parse_position(&fen) else {
            return;
        };
        let player_force = self.cache.player_force();
        if player_color.is_some() && player_color != player_force {
            debug!("Ignoring server player color {player_color:?}");
        }
        let legal_moves = parse_moves(moves);
        let outcome = outcome.and_then(|tag| parse_outcome(&tag));
        self.pending_move = None;
        self.cache.apply_snapshot(Snapshot::new(
            position,
            legal_moves,
            turn,
            player_force,
            is_check,
            is_game_over,
            outcome,
        ));
        self.after_authoritative_update();
    }

    // The last known state stays on screen.
    pub fn status_fetch_failed(&self, error: &str) {
        warn!("Status fetch failed: {error}");
        self.redraw_requested.set(true);
    }

    pub fn process_server_event(
        &mut self, event: ServerEvent,
    ) -> Result<NotableEvent, EventError> {
        debug!("Server event: {event:?}");
        match event {
            ServerEvent::MoveMade { fen, move_code } => Ok(self.on_move_made(fen, move_code)),
            ServerEvent::MoveResponse(response) => self.on_move_response(response),
            ServerEvent::BoardUpdate { action, fen } => Ok(self.on_board_update(action, fen)),
            ServerEvent::TimeUpdated { time } => {
                self.engine_time_secs.set(Some(time));
                Ok(NotableEvent::SettingsUpdated)
            }
            ServerEvent::DepthUpdated { depth } => {
                self.search_depth.set(Some(depth));
                Ok(NotableEvent::SettingsUpdated)
            }
        }
    }

    fn on_move_made(&mut self, fen: Option<String>, move_code: Option<String>) -> NotableEvent {
        let move_code = move_code.as_deref().and_then(parse_move_code);
        if let Some(code) = move_code {
            let grid = *self.cache.position().grid();
            self.record_move(&grid, code, &[], CheckMark::None, MoveAuthor::Engine);
            self.last_move.set(Some((code.from, code.to)));
        }
        self.apply_patch(CachePatch {
            position: fen.as_deref().and_then(parse_position),
            ..CachePatch::default()
        });
        if move_code.is_some() { NotableEvent::EngineMoved } else { NotableEvent::None }
    }

    fn on_move_response(&mut self, response: MoveResponse) -> Result<NotableEvent, EventError> {
        let pending = self.pending_move.take();
        if !response.valid {
            let message = response.message.unwrap_or_else(|| "Invalid move".to_owned());
            info!("Move rejected: {message}");
            self.notice.set(Some(message.clone()));
            self.reset_input();
            return Err(EventError::MoveRejected(message));
        }
        let MoveResponse {
            fen,
            moves,
            check,
            game_over,
            outcome,
            last_move,
            engine_move,
            ..
        } = response;

        let local_move = last_move
            .as_deref()
            .and_then(parse_move_code)
            .or(pending.as_ref().map(|p| p.move_code));
        let engine_move = engine_move.as_deref().and_then(parse_move_code);
        let outcome = outcome.as_deref().and_then(parse_outcome);

        if let Some(local_move) = local_move {
            let (mut grid, legal_before) = match pending {
                Some(p) if p.move_code == local_move => (p.grid_before, p.legal_before),
                _ => (*self.cache.position().grid(), vec![]),
            };
            let mark = if game_over == Some(true) && outcome == Some(Outcome::Checkmate) {
                CheckMark::Mate
            } else if check == Some(true) {
                CheckMark::Check
            } else {
                CheckMark::None
            };
            self.record_move(&grid, local_move, &legal_before, mark, MoveAuthor::Local);
            self.last_move.set(Some((local_move.from, local_move.to)));
            if let Some(engine_move) = engine_move {
                grid.relocate(local_move.from, local_move.to, local_move.promote_to);
                self.record_move(&grid, engine_move, &[], CheckMark::None, MoveAuthor::Engine);
            }
        }
        if let Some(engine_move) = engine_move {
            self.last_move.set(Some((engine_move.from, engine_move.to)));
        }

        // The check flag describes the board right after the local move. If the engine has
        // replied since, it is out of date and the status pull will bring the right one.
        let check = if engine_move.is_some() { None } else { check };
        self.apply_patch(CachePatch {
            position: fen.as_deref().and_then(parse_position),
            legal_moves: moves.map(parse_moves),
            check,
            game_over,
            outcome,
        });
        if engine_move.is_some() {
            self.sync();
        }
        Ok(if self.is_game_over() {
            NotableEvent::GameOver
        } else if engine_move.is_some() {
            NotableEvent::EngineMoved
        } else {
            NotableEvent::MoveAccepted
        })
    }

    fn on_board_update(&mut self, action: GameAction, fen: Option<String>) -> NotableEvent {
        let position = fen.as_deref().and_then(parse_position);
        match action {
            GameAction::Flip => {
                let flipped = self.orientation.flipped();
                self.orientation.set(flipped);
                return NotableEvent::None;
            }
            GameAction::Undo => {
                self.history.get_mut().undo();
                self.last_move.set(None);
                self.apply_patch(CachePatch { position, ..CachePatch::default() });
            }
            GameAction::NewGame => {
                self.history.get_mut().clear();
                self.last_move.set(None);
                self.local_timeout.set(None);
                self.notice.set(None);
                self.pending_move = None;
                self.clock.get_mut().reset();
                self.cache.set_player_force(None);
                self.cache.clear_result();
                let position = position.unwrap_or_else(Position::starting);
                self.apply_patch(CachePatch { position: Some(position), ..CachePatch::default() });
            }
        }
        // Neither undo nor new game come with legal moves.
        self.sync();
        NotableEvent::BoardReset
    }

    fn apply_patch(&mut self, patch: CachePatch) {
        let result = self.cache.apply_patch(patch);
        if result.position_changed && result.legal_moves_stale {
            debug!("Position changed without legal moves; requesting status");
            self.sync();
        }
        self.after_authoritative_update();
    }

    fn after_authoritative_update(&mut self) {
        self.reset_input();
        if self.cache.is_game_over() {
            self.clock.get_mut().freeze();
        }
    }

    fn record_move(
        &mut self, grid: &Grid, move_code: MoveCode, legal_moves: &[MoveCode], mark: CheckMark,
        author: MoveAuthor,
    ) {
        if !self.config.ui_variant.has_history() {
            return;
        }
        let notation = describe_move(grid, move_code, legal_moves, mark);
        self.history.get_mut().push(HistoryEntry { move_code, notation, author });
    }

    fn send(&self, request: OutgoingRequest) {
        if let Err(err) = self.requests_tx.send(request) {
            warn!("Cannot send request, the transport is gone: {err}");
        }
    }
}

fn parse_position(fen: &str) -> Option<Position> {
    match Position::from_fen(fen) {
        Ok(position) => Some(position),
        Err(err) => {
            warn!("Ignoring malformed position {fen:?}: {err:?}");
            None
        }
    }
}

fn parse_move_code(code: &str) -> Option<MoveCode> {
    match code.parse() {
        Ok(code) => Some(code),
        Err(err) => {
            warn!("Ignoring malformed move code {code:?}: {err:?}");
            None
        }
    }
}

// Drops entries that cannot be parsed.
fn parse_moves(moves: Vec<String>) -> Vec<MoveCode> {
    moves.iter().filter_map(|code| parse_move_code(code)).collect()
}

fn parse_outcome(tag: &str) -> Option<Outcome> {
    match tag.parse() {
        Ok(outcome) => Some(outcome),
        Err(_) => {
            warn!("Ignoring unknown outcome {tag:?}");
            None
        }
    }
}
