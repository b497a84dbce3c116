use std::ops;

use enum_map::EnumMap;

use crate::coord::{Col, Coord, NUM_COLS, NUM_ROWS};
use crate::force::Force;
use crate::piece::{PieceKind, PieceOnBoard};


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Grid {
    data: [[Option<PieceOnBoard>; NUM_COLS as usize]; NUM_ROWS as usize],
}

impl Grid {
    pub fn new() -> Self { Grid { data: [[None; NUM_COLS as usize]; NUM_ROWS as usize] } }

    pub fn pieces(&self) -> impl Iterator<Item = (Coord, PieceOnBoard)> + '_ {
        Coord::all().filter_map(|coord| self[coord].map(|piece| (coord, piece)))
    }

    pub fn material(&self) -> EnumMap<Force, EnumMap<PieceKind, u8>> {
        let mut ret: EnumMap<Force, EnumMap<PieceKind, u8>> = EnumMap::default();
        for (_, piece) in self.pieces() {
            ret[piece.force][piece.kind] += 1;
        }
        ret
    }

    // Moves whatever stands on `from` to `to` and returns the captured piece. No rules are
    // checked: this is only used to predict how the board looks after a move the server has
    // already accepted. Castling and en passant are recognized by their geometry.
    pub fn relocate(
        &mut self, from: Coord, to: Coord, promote_to: Option<PieceKind>,
    ) -> Option<PieceOnBoard> {
        let piece = self[from].take()?;
        let mut captured = self[to].take();
        let d_col = to.col - from.col;
        match piece.kind {
            PieceKind::King if d_col.abs() == 2 => {
                let (rook_from, rook_to) = if d_col > 0 {
                    (Col::from_zero_based(NUM_COLS - 1), Col::from_zero_based(5))
                } else {
                    (Col::from_zero_based(0), Col::from_zero_based(3))
                };
                let rook = self[Coord::new(from.row, rook_from)].take();
                self[Coord::new(from.row, rook_to)] = rook;
            }
            PieceKind::Pawn if d_col != 0 && captured.is_none() => {
                let passed = Coord::new(from.row, to.col);
                captured = self[passed].take();
            }
            _ => {}
        }
        let kind = promote_to.unwrap_or(piece.kind);
        self[to] = Some(PieceOnBoard { kind, ..piece });
        captured
    }
}

impl ops::Index<Coord> for Grid {
    type Output = Option<PieceOnBoard>;
    fn index(&self, pos: Coord) -> &Self::Output {
        &self.data[pos.row.to_zero_based() as usize][pos.col.to_zero_based() as usize]
    }
}

impl ops::IndexMut<Coord> for Grid {
    fn index_mut(&mut self, pos: Coord) -> &mut Self::Output {
        &mut self.data[pos.row.to_zero_based() as usize][pos.col.to_zero_based() as usize]
    }
}
