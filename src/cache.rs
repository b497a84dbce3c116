// Local mirror of the authoritative game state kept by the server.
//
// The cache is the only place that stores the position, the legal moves, the side to move and
// the check / game-over flags. It is written from two sources:
//   - a full snapshot pulled from the status endpoint, which replaces everything;
//   - push events, which replace only the fields they carry.
// Both paths are last-writer-wins per field. The cache never draws anything: writes mark it dirty
// and the owner decides when to re-render.

use derive_new::new;
use itertools::Itertools;

use crate::coord::Coord;
use crate::dirty::Dirty;
use crate::force::Force;
use crate::movecode::MoveCode;
use crate::outcome::Outcome;
use crate::position::Position;


// Legal moves are only meaningful for the position they were computed for. The position is
// remembered alongside the list so that a list can never outlive its position.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LegalMoves {
    for_position: String,
    moves: Vec<MoveCode>,
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CachePatch {
    pub position: Option<Position>,
    pub legal_moves: Option<Vec<MoveCode>>,
    pub check: Option<bool>,
    pub game_over: Option<bool>,
    pub outcome: Option<Outcome>,
}

#[derive(Clone, PartialEq, Eq, Debug, new)]
pub struct Snapshot {
    pub position: Position,
    pub legal_moves: Vec<MoveCode>,
    pub active_force: Force,
    pub player_force: Option<Force>,
    pub is_check: bool,
    pub is_game_over: bool,
    pub outcome: Option<Outcome>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PatchResult {
    pub position_changed: bool,
    // Position changed but no fresh legal moves came with it. The caller should resync.
    pub legal_moves_stale: bool,
}

#[derive(Clone, Debug)]
pub struct BoardCache {
    position: Dirty<Position>,
    legal_moves: Dirty<LegalMoves>,
    active_force: Dirty<Force>,
    player_force: Dirty<Option<Force>>,
    is_check: Dirty<bool>,
    is_game_over: Dirty<bool>,
    outcome: Dirty<Option<Outcome>>,
}

impl LegalMoves {
    pub fn new(position: &Position, moves: Vec<MoveCode>) -> Self {
        LegalMoves { for_position: position.as_fen().to_owned(), moves }
    }

    pub fn is_for(&self, position: &Position) -> bool { self.for_position == position.as_fen() }
}

impl BoardCache {
    // Before the first sync: starting position, nothing known to be legal.
    pub fn new() -> Self {
        let position = Position::starting();
        BoardCache {
            legal_moves: Dirty::new(LegalMoves::new(&position, vec![])),
            active_force: Dirty::new(position.active_force()),
            position: Dirty::new(position),
            player_force: Dirty::new(None),
            is_check: Dirty::new(false),
            is_game_over: Dirty::new(false),
            outcome: Dirty::new(None),
        }
    }

    pub fn position(&self) -> &Position { &self.position }
    pub fn active_force(&self) -> Force { *self.active_force }
    pub fn player_force(&self) -> Option<Force> { *self.player_force }
    pub fn is_check(&self) -> bool { *self.is_check }
    pub fn is_game_over(&self) -> bool { *self.is_game_over }
    pub fn outcome(&self) -> Option<Outcome> { *self.outcome }

    pub fn is_player_turn(&self) -> bool { self.player_force() == Some(self.active_force()) }

    // Empty when the stored list belongs to an older position.
    pub fn legal_moves(&self) -> &[MoveCode] {
        if self.legal_moves.is_for(&self.position) {
            self.legal_moves.moves.as_slice()
        } else {
            &[]
        }
    }
    pub fn legal_moves_stale(&self) -> bool { !self.legal_moves.is_for(&self.position) }

    pub fn moves_from(&self, from: Coord) -> impl Iterator<Item = &MoveCode> + '_ {
        self.legal_moves().iter().filter(move |m| m.from == from)
    }

    // Distinct destinations, in the order the server listed them. Promotions to different pieces
    // share a destination.
    pub fn destinations_from(&self, from: Coord) -> Vec<Coord> {
        self.moves_from(from).map(|m| m.to).unique().collect()
    }

    pub fn has_moves_from(&self, from: Coord) -> bool { self.moves_from(from).next().is_some() }

    pub fn is_legal(&self, from: Coord, to: Coord) -> bool {
        self.moves_from(from).any(|m| m.to == to)
    }

    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        let Snapshot {
            position,
            legal_moves,
            active_force,
            player_force,
            is_check,
            is_game_over,
            outcome,
        } = snapshot;
        self.legal_moves.set(LegalMoves::new(&position, legal_moves));
        self.position.set(position);
        self.active_force.set(active_force);
        self.player_force.set(player_force);
        self.is_check.set(is_check);
        self.is_game_over.set(is_game_over);
        self.outcome.set(outcome);
    }

    pub fn apply_patch(&mut self, patch: CachePatch) -> PatchResult {
        let CachePatch { position, legal_moves, check, game_over, outcome } = patch;
        let mut position_changed = false;
        if let Some(position) = position {
            position_changed = position != *self.position;
            self.active_force.set(position.active_force());
            self.position.set(position);
        }
        if let Some(moves) = legal_moves {
            self.legal_moves.set(LegalMoves::new(&self.position, moves));
        }
        if let Some(check) = check {
            self.is_check.set(check);
        }
        if let Some(game_over) = game_over {
            self.is_game_over.set(game_over);
        }
        if let Some(outcome) = outcome {
            self.outcome.set(Some(outcome));
        }
        PatchResult {
            position_changed,
            legal_moves_stale: self.legal_moves_stale(),
        }
    }

    pub fn set_player_force(&mut self, force: Option<Force>) { self.player_force.set(force); }

    // New game: the server keeps no result, so neither do we.
    pub fn clear_result(&mut self) {
        self.is_check.set(false);
        self.is_game_over.set(false);
        self.outcome.set(None);
    }

    // Important: take all dirt, no short-circuiting!
    pub fn take_dirt(&self) -> bool {
        self.position.take_dirt()
            | self.legal_moves.take_dirt()
            | self.active_force.take_dirt()
            | self.player_force.take_dirt()
            | self.is_check.take_dirt()
            | self.is_game_over.take_dirt()
            | self.outcome.take_dirt()
    }
}
