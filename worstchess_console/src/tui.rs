// Improvement potential. Use `crossterm` styling instead, so that the whole front end uses one
//   terminal library.

use console::Style;
use itertools::Itertools;
use worstchess::clock::{Clock, ClockSide};
use worstchess::coord::{NUM_COLS, NUM_ROWS};
use worstchess::display::{BoardOrientation, from_display_col, from_display_row};
use worstchess::force::Force;
use worstchess::history::MoveHistory;
use worstchess::piece::piece_to_pictogram;
use worstchess::render::{BoardView, CapturedPieces, SquareShade, SquareView};


const BOARD_WIDTH: usize = (NUM_COLS as usize + 2) * 3;

pub fn render_grid(view: &BoardView) -> String {
    let mut ret = String::new();
    for y in -1..=i32::from(NUM_ROWS) {
        for x in -1..=i32::from(NUM_COLS) {
            let row_header = x < 0 || x >= i32::from(NUM_COLS);
            let col_header = y < 0 || y >= i32::from(NUM_ROWS);
            let square = match (row_header, col_header) {
                (true, true) => format_square(' '),
                (true, false) => row_label(y, view.orientation),
                (false, true) => col_label(x, view.orientation),
                (false, false) => {
                    let idx = usize::try_from(y * i32::from(NUM_COLS) + x).unwrap_or(usize::MAX);
                    match view.squares.get(idx) {
                        Some(sq) => render_square(sq),
                        None => format_square('?'),
                    }
                }
            };
            ret.push_str(&square);
        }
        ret.push('\n');
    }
    ret
}

fn row_label(y: i32, orientation: BoardOrientation) -> String {
    let row = u8::try_from(y).ok().and_then(|y| from_display_row(y, orientation));
    format_square(row.map_or(' ', |row| row.to_algebraic()))
}

fn col_label(x: i32, orientation: BoardOrientation) -> String {
    let col = u8::try_from(x).ok().and_then(|x| from_display_col(x, orientation));
    format_square(col.map_or(' ', |col| col.to_algebraic()))
}

fn render_square(sq: &SquareView) -> String {
    let flags = sq.flags;
    let background = if flags.selected || flags.drag_hover {
        153
    } else if flags.capture_hint {
        210
    } else if flags.last_move_from || flags.last_move_to {
        186
    } else {
        match sq.shade {
            SquareShade::Light => 230,
            SquareShade::Dark => 222,
        }
    };
    let ch = match &sq.piece {
        Some(piece) => piece_to_pictogram(piece.piece.kind, piece.piece.force),
        None if flags.legal_hint => '·',
        None => ' ',
    };
    Style::new().color256(233).on_color256(background).apply_to(format_square(ch)).to_string()
}

fn format_square(ch: char) -> String { format!(" {ch} ") }

// Pieces taken by `force`, shown next to its side of the board.
pub fn render_captured(captured: &CapturedPieces, force: Force) -> String {
    let pieces = captured.by[force]
        .iter()
        .map(|&kind| piece_to_pictogram(kind, force.opponent()))
        .collect::<String>();
    format!("{pieces:^BOARD_WIDTH$}")
}

pub fn render_clock(clock: &Clock, side: ClockSide, active: bool) -> String {
    let text = clock.showing(side);
    if clock.remaining_secs(side) == 0 {
        Style::new().on_red().apply_to(text).to_string()
    } else if active && clock.is_running() {
        Style::new().reverse().apply_to(text).to_string()
    } else {
        text
    }
}

pub fn render_history(history: &MoveHistory, max_rows: usize) -> String {
    let rows = history.numbered_rows();
    let skip = rows.len().saturating_sub(max_rows);
    rows.into_iter().skip(skip).join("\n")
}
