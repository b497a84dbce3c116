// Description of what the board should look like. The front ends only draw what they get here.

use enum_map::EnumMap;
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::cache::BoardCache;
use crate::coord::{Coord, NUM_COLS, NUM_ROWS};
use crate::display::{BoardOrientation, DisplayCoord, from_display_coord, to_display_coord};
use crate::force::Force;
use crate::grid::Grid;
use crate::input::InputState;
use crate::outcome::Outcome;
use crate::piece::{PieceKind, PieceOnBoard, piece_image_name};


#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SquareShade {
    Light,
    Dark,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize)]
pub struct SquareFlags {
    pub selected: bool,
    pub last_move_from: bool,
    pub last_move_to: bool,
    pub legal_hint: bool,
    // Legal destination with a piece on it. Never set together with `legal_hint`.
    pub capture_hint: bool,
    pub drag_hover: bool,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct PieceView {
    pub piece: PieceOnBoard,
    pub image: String,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct SquareView {
    #[serde(skip)]
    pub coord: Coord,
    pub label: String,
    pub shade: SquareShade,
    pub display: DisplayCoord,
    pub piece: Option<PieceView>,
    pub flags: SquareFlags,
}

// Pieces each side has taken from the other.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize)]
pub struct CapturedPieces {
    pub by: EnumMap<Force, Vec<PieceKind>>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct BoardView {
    pub orientation: BoardOrientation,
    // Display order: top-left square first, row by row.
    pub squares: Vec<SquareView>,
    pub captured: CapturedPieces,
    pub status: String,
}

// Everything the status line depends on.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct StatusFacts {
    pub game_over: bool,
    // Outcome and the side that lost (ignored for draws).
    pub result: Option<(Outcome, Force)>,
    pub player_force: Option<Force>,
    pub active_force: Force,
    pub is_check: bool,
    // Message about the last rejected move, if any.
    pub notice: Option<String>,
}

#[derive(Clone, Debug)]
pub struct RenderInput<'a> {
    pub cache: &'a BoardCache,
    pub input: InputState,
    pub last_move: Option<(Coord, Coord)>,
    pub orientation: BoardOrientation,
    pub piece_dir: &'a str,
    pub status: StatusFacts,
}

pub fn square_shade(coord: Coord) -> SquareShade {
    if (coord.col.to_zero_based() + coord.row.to_one_based()) % 2 == 0 {
        SquareShade::Light
    } else {
        SquareShade::Dark
    }
}

pub fn piece_image_path(piece_dir: &str, piece: PieceOnBoard) -> String {
    let name = piece_image_name(piece.kind, piece.force);
    let dir = piece_dir.trim_end_matches('/');
    if dir.is_empty() { name } else { format!("{dir}/{name}") }
}

pub fn captured_pieces(grid: &Grid) -> CapturedPieces {
    let material = grid.material();
    let mut captured = CapturedPieces::default();
    for force in Force::iter() {
        let captor = force.opponent();
        for kind in PieceKind::iter().filter(|&kind| kind != PieceKind::King) {
            let missing = kind.starting_count().saturating_sub(material[force][kind]);
            captured.by[captor].extend(std::iter::repeat_n(kind, missing.into()));
        }
    }
    captured
}

pub fn status_text(facts: &StatusFacts) -> String {
    if facts.game_over {
        return match facts.result {
            Some((outcome, loser)) => outcome.ui_string(loser),
            None => "Game over.".to_owned(),
        };
    }
    let Some(player_force) = facts.player_force else {
        return "Choose a side to start.".to_owned();
    };
    if let Some(notice) = &facts.notice {
        return notice.clone();
    }
    let prefix = if facts.is_check { "Check! " } else { "" };
    if facts.active_force == player_force {
        format!("{prefix}Your move ({}).", player_force.title())
    } else {
        format!("{prefix}Engine is thinking...")
    }
}

pub fn render_board(input: &RenderInput) -> BoardView {
    let cache = input.cache;
    let grid = cache.position().grid();
    let origin = input.input.origin();
    let destinations = match origin {
        Some(from) => cache.destinations_from(from),
        None => vec![],
    };
    let mut squares = Vec::with_capacity(usize::from(NUM_ROWS) * usize::from(NUM_COLS));
    for y in 0..NUM_ROWS {
        for x in 0..NUM_COLS {
            let display = DisplayCoord { x, y };
            let Some(coord) = from_display_coord(display, input.orientation) else {
                continue;
            };
            debug_assert_eq!(to_display_coord(coord, input.orientation), display);
            let piece = grid[coord];
            let reachable = destinations.contains(&coord);
            let flags = SquareFlags {
                selected: origin == Some(coord),
                last_move_from: input.last_move.is_some_and(|(from, _)| from == coord),
                last_move_to: input.last_move.is_some_and(|(_, to)| to == coord),
                legal_hint: reachable && piece.is_none(),
                capture_hint: reachable && piece.is_some(),
                drag_hover: input.input.drag_hover() == Some(coord),
            };
            squares.push(SquareView {
                coord,
                label: coord.to_algebraic(),
                shade: square_shade(coord),
                display,
                piece: piece.map(|piece| PieceView {
                    piece,
                    image: piece_image_path(input.piece_dir, piece),
                }),
                flags,
            });
        }
    }
    BoardView {
        orientation: input.orientation,
        squares,
        captured: captured_pieces(grid),
        status: status_text(&input.status),
    }
}

impl BoardView {
    pub fn square(&self, coord: Coord) -> Option<&SquareView> {
        self.squares.iter().find(|sq| sq.coord == coord)
    }
}
