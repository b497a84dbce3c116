// Rust-upgrade (https://github.com/rust-lang/rust/issues/46379):
//   remove `#[allow(dead_code)]` before public functions.

use itertools::Itertools;
use worstchess::coord::{Col, Coord, NUM_COLS, NUM_ROWS, Row};
use worstchess::event::ServerEvent;
use worstchess::grid::Grid;
use worstchess::piece::{PieceKind, PieceOnBoard, piece_from_ascii};
use worstchess::position::placement_to_fen;


#[derive(Clone, Copy, Debug)]
pub struct PieceMatcher {
    pub kind: PieceKind,
    pub force: worstchess::force::Force,
}

pub trait PieceIs {
    fn is(self, matcher: PieceMatcher) -> bool;
}

impl PieceIs for Option<PieceOnBoard> {
    fn is(self, matcher: PieceMatcher) -> bool {
        if let Some(piece) = self {
            piece.kind == matcher.kind && piece.force == matcher.force
        } else {
            false
        }
    }
}

#[macro_export]
macro_rules! piece {
    ($force:ident $kind:ident) => {
        common::PieceMatcher {
            force: worstchess::force::Force::$force,
            kind: worstchess::piece::PieceKind::$kind,
        }
    };
}

// Builds a server event from a JSON literal, e.g.
//   server_event!({"event": "board_update", "data": {"action": "flip"}})
#[macro_export]
macro_rules! server_event {
    ($($json:tt)+) => {
        common::parse_server_event(&serde_json::json!($($json)+).to_string())
    };
}

#[allow(dead_code)]
pub fn parse_server_event(text: &str) -> ServerEvent {
    serde_json::from_str(text).unwrap_or_else(|err| panic!("Bad event {text}: {err}"))
}

// Board diagram with rank 8 on top, one token per square, '.' for an empty square.
#[allow(dead_code)]
pub fn parse_grid(board_str: &str) -> Result<Grid, String> {
    let rows = board_str
        .split('\n')
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.split_ascii_whitespace().collect_vec())
        .collect_vec();
    assert_eq!(rows.len(), NUM_ROWS as usize);
    assert!(rows.iter().all(|row| row.len() == NUM_COLS as usize));
    let mut grid = Grid::new();
    for (row_idx, row) in rows.iter().rev().enumerate() {
        for (col_idx, piece_str) in row.iter().enumerate() {
            let piece_char = piece_str
                .chars()
                .exactly_one()
                .map_err(|_| format!("Invalid piece: {piece_str}"))?;
            let row = Row::from_zero_based(row_idx as u8);
            let coord = Coord::new(row, Col::from_zero_based(col_idx as u8));
            grid[coord] = if piece_char == '.' {
                None
            } else {
                let (kind, force) = piece_from_ascii(piece_char)
                    .ok_or_else(|| format!("Invalid piece: {piece_char}"))?;
                Some(PieceOnBoard::new(kind, force))
            };
        }
    }
    Ok(grid)
}

// Full position string for a diagram, with the given side to move.
#[allow(dead_code)]
pub fn fen_from_diagram(board_str: &str, side_to_move: char) -> String {
    let grid = parse_grid(board_str).unwrap();
    format!("{} {side_to_move} - - 0 1", placement_to_fen(&grid))
}


#[cfg(test)]
mod tests {
    use worstchess::position::{Position, STARTING_POSITION};

    use super::*;

    #[test]
    fn parse_grid_opening() {
        let board_str = "
            r n b q k b n r
            p p p p p p p p
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            P P P P P P P P
            R N B Q K B N R
        ";
        let grid = parse_grid(board_str).unwrap();
        assert_eq!(&grid, Position::from_fen(STARTING_POSITION).unwrap().grid());
    }
}
