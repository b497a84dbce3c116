// Turns clicks and drags on the board into move codes.
//
// The controller never touches the board itself: it reads the cache to learn which moves are
// legal and reports a move to submit. The position only changes once the server answers.

use crate::cache::BoardCache;
use crate::config::UiVariant;
use crate::coord::{Coord, SubjectiveRow};
use crate::movecode::MoveCode;
use crate::piece::{PROMOTION_CHOICES, PieceKind};


#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputState {
    #[default]
    Idle,
    Selected {
        from: Coord,
    },
    Dragging {
        from: Coord,
        hover: Option<Coord>,
    },
    AwaitingPromotion {
        from: Coord,
        to: Coord,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputEvent {
    Click(Coord),
    DragStart(Coord),
    // `None` when the pointer left the board.
    DragHover(Option<Coord>),
    // `None` when the piece was dropped outside the board.
    Drop(Option<Coord>),
    // The drag finished without a drop (e.g. Escape in the browser).
    DragEnd,
    ChoosePromotion(PieceKind),
    DismissPromotion,
    // The authoritative state has changed under our feet.
    Reset,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputOutcome {
    Noop,
    Submit(MoveCode),
    PromptPromotion { from: Coord, to: Coord },
    // The front end must cancel the native drag.
    DragRefused(InputBlock),
}

// Why the board is not accepting input right now.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputBlock {
    GameOver,
    NoPlayerColor,
    // A move was sent and the server has not answered yet.
    AwaitingServer,
    NotPlayerTurn,
    NoMovablePiece,
}

#[derive(Clone, Copy, Debug)]
pub struct InputContext<'a> {
    pub cache: &'a BoardCache,
    pub ui_variant: UiVariant,
    // Includes games ended by the local clock, which the cache does not know about.
    pub game_over: bool,
    pub awaiting_server: bool,
}

impl InputState {
    // Square whose moves are being shown.
    pub fn origin(self) -> Option<Coord> {
        match self {
            InputState::Idle => None,
            InputState::Selected { from }
            | InputState::Dragging { from, .. }
            | InputState::AwaitingPromotion { from, .. } => Some(from),
        }
    }

    pub fn drag_hover(self) -> Option<Coord> {
        match self {
            InputState::Dragging { hover, .. } => hover,
            _ => None,
        }
    }

    pub fn pending_promotion(self) -> Option<(Coord, Coord)> {
        match self {
            InputState::AwaitingPromotion { from, to } => Some((from, to)),
            _ => None,
        }
    }

    pub fn is_dragging(self) -> bool { matches!(self, InputState::Dragging { .. }) }
}

impl InputContext<'_> {
    pub fn block(&self) -> Option<InputBlock> {
        if self.game_over {
            Some(InputBlock::GameOver)
        } else if self.cache.player_force().is_none() {
            Some(InputBlock::NoPlayerColor)
        } else if self.awaiting_server {
            Some(InputBlock::AwaitingServer)
        } else if !self.cache.is_player_turn() {
            Some(InputBlock::NotPlayerTurn)
        } else {
            None
        }
    }

    // Own piece that has somewhere to go. Assumes input is not blocked.
    fn can_pick(&self, coord: Coord) -> bool {
        let own = self.cache.position().piece_at(coord).map(|piece| piece.force)
            == self.cache.player_force();
        own && self.cache.has_moves_from(coord)
    }

    fn is_promotion(&self, from: Coord, to: Coord) -> bool {
        let Some(piece) = self.cache.position().piece_at(from) else {
            return false;
        };
        let last_row = SubjectiveRow::last().to_row(piece.force);
        let pawn_reaches_end = piece.kind == PieceKind::Pawn && to.row == last_row;
        // The server's move list is trusted over our reading of the board.
        pawn_reaches_end || self.cache.moves_from(from).any(|m| m.to == to && m.is_promotion())
    }
}

pub fn transition(
    state: InputState, event: InputEvent, ctx: &InputContext,
) -> (InputState, InputOutcome) {
    use InputEvent::*;
    use InputState::*;

    const NOOP: InputOutcome = InputOutcome::Noop;

    if event == Reset {
        return (Idle, NOOP);
    }
    if let Some(block) = ctx.block() {
        return match event {
            DragStart(_) => (state, InputOutcome::DragRefused(block)),
            DragHover(_) | Click(_) => (state, NOOP),
            Drop(_) | DragEnd | ChoosePromotion(_) | DismissPromotion | Reset => (Idle, NOOP),
        };
    }

    match (state, event) {
        (Idle | Dragging { .. }, Click(coord)) => (pick(coord, ctx), NOOP),
        (Selected { from }, Click(coord)) => {
            if coord == from {
                (Idle, NOOP)
            } else if ctx.cache.is_legal(from, coord) {
                complete(from, coord, ctx)
            } else {
                (pick(coord, ctx), NOOP)
            }
        }
        (_, DragStart(coord)) => {
            if ctx.can_pick(coord) {
                (Dragging { from: coord, hover: Some(coord) }, NOOP)
            } else {
                (Idle, InputOutcome::DragRefused(InputBlock::NoMovablePiece))
            }
        }
        (Dragging { from, .. }, DragHover(hover)) => (Dragging { from, hover }, NOOP),
        (Dragging { from, .. }, Drop(Some(to))) if ctx.cache.is_legal(from, to) => {
            complete(from, to, ctx)
        }
        (Dragging { .. }, Drop(_) | DragEnd) => (Idle, NOOP),
        (AwaitingPromotion { from, to }, ChoosePromotion(kind)) => {
            if PROMOTION_CHOICES.contains(&kind) {
                (Idle, InputOutcome::Submit(MoveCode::with_promotion(from, to, kind)))
            } else {
                (state, NOOP)
            }
        }
        (AwaitingPromotion { .. }, DismissPromotion | Click(_)) => (Idle, NOOP),
        // Stray events (hover without a drag, drop after the drag was refused, etc.).
        (_, _) => (state, NOOP),
    }
}

fn pick(coord: Coord, ctx: &InputContext) -> InputState {
    if ctx.can_pick(coord) {
        InputState::Selected { from: coord }
    } else {
        InputState::Idle
    }
}

// `to` is known to be a legal destination from `from`.
fn complete(from: Coord, to: Coord, ctx: &InputContext) -> (InputState, InputOutcome) {
    if !ctx.is_promotion(from, to) {
        return (InputState::Idle, InputOutcome::Submit(MoveCode::new(from, to)));
    }
    if ctx.ui_variant.prompts_promotion() {
        (InputState::AwaitingPromotion { from, to }, InputOutcome::PromptPromotion { from, to })
    } else {
        let code = MoveCode::with_promotion(from, to, PieceKind::Queen);
        (InputState::Idle, InputOutcome::Submit(code))
    }
}
