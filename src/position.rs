// Position snapshots as sent by the server. Only the placement and the side to move are decoded;
// castling rights, en passant target and move counters are kept verbatim.
//
// The server is trusted to send well-formed snapshots. A string that cannot be decoded is
// reported as an error so that the caller can ignore the field instead of crashing.

use std::fmt;

use itertools::Itertools;

use crate::coord::{Col, Coord, NUM_COLS, NUM_ROWS, Row};
use crate::force::Force;
use crate::grid::Grid;
use crate::piece::{PieceOnBoard, piece_from_ascii, piece_to_ascii};


pub const STARTING_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum PositionError {
    MissingField(&'static str),
    WrongRankCount(usize),
    RankOverflow { rank: char },
    RankUnderflow { rank: char },
    InvalidPiece(char),
    InvalidSideToMove(String),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Position {
    raw: String,
    grid: Grid,
    active_force: Force,
}

impl Position {
    pub fn starting() -> Self {
        // Unwrap ok: the constant is well-formed.
        Position::from_fen(STARTING_POSITION).unwrap()
    }

    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let mut fields = fen.split_ascii_whitespace();
        let placement = fields.next().ok_or(PositionError::MissingField("placement"))?;
        let side = fields.next().ok_or(PositionError::MissingField("side to move"))?;
        let grid = placement_from_fen(placement)?;
        let active_force = side
            .chars()
            .exactly_one()
            .ok()
            .and_then(Force::from_fen_char)
            .ok_or_else(|| PositionError::InvalidSideToMove(side.to_owned()))?;
        Ok(Position { raw: fen.trim().to_owned(), grid, active_force })
    }

    pub fn as_fen(&self) -> &str { &self.raw }
    pub fn grid(&self) -> &Grid { &self.grid }
    pub fn active_force(&self) -> Force { self.active_force }
    pub fn piece_at(&self, coord: Coord) -> Option<PieceOnBoard> { self.grid[coord] }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.raw) }
}

// Ranks are listed from '8' down to '1', files from 'a' to 'h'.
pub fn placement_from_fen(placement: &str) -> Result<Grid, PositionError> {
    let ranks = placement.split('/').collect_vec();
    if ranks.len() != NUM_ROWS as usize {
        return Err(PositionError::WrongRankCount(ranks.len()));
    }
    let mut grid = Grid::new();
    for (rank_str, row) in ranks.iter().zip(Row::all().rev()) {
        let mut col_idx = 0_u8;
        for ch in rank_str.chars() {
            if let Some(skip) = ch.to_digit(10) {
                col_idx += skip as u8;
            } else {
                let (kind, force) = piece_from_ascii(ch).ok_or(PositionError::InvalidPiece(ch))?;
                if col_idx >= NUM_COLS {
                    return Err(PositionError::RankOverflow { rank: row.to_algebraic() });
                }
                grid[Coord::new(row, Col::from_zero_based(col_idx))] =
                    Some(PieceOnBoard::new(kind, force));
                col_idx += 1;
            }
            if col_idx > NUM_COLS {
                return Err(PositionError::RankOverflow { rank: row.to_algebraic() });
            }
        }
        if col_idx != NUM_COLS {
            return Err(PositionError::RankUnderflow { rank: row.to_algebraic() });
        }
    }
    Ok(grid)
}

pub fn placement_to_fen(grid: &Grid) -> String {
    Row::all()
        .rev()
        .map(|row| {
            let mut s = String::new();
            let mut empty = 0;
            for col in Col::all() {
                match grid[Coord::new(row, col)] {
                    Some(piece) => {
                        if empty > 0 {
                            s.push_str(&empty.to_string());
                            empty = 0;
                        }
                        s.push(piece_to_ascii(piece.kind, piece.force));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                s.push_str(&empty.to_string());
            }
            s
        })
        .join("/")
}
