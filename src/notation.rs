// Short algebraic notation for the move list, e.g. "Nf3", "exd5", "e8=Q", "O-O".
//
// The client does not know the rules, so the notation is reconstructed from the board before the
// move and the move code. Disambiguation ("Nbd2") is only possible when the legal moves of that
// board are known.

use crate::coord::{Col, Coord, Row};
use crate::grid::Grid;
use crate::movecode::MoveCode;
use crate::piece::PieceKind;


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CastleSide {
    ASide, // "O-O-O"
    HSide, // "O-O"
}

#[derive(Clone, Debug)]
pub struct AlgebraicMove {
    pub piece_kind: PieceKind,
    pub from_col: Option<Col>,
    pub from_row: Option<Row>,
    pub capturing: bool,
    pub to: Coord,
    pub promote_to: Option<PieceKind>,
}

#[derive(Clone, Debug)]
pub enum AlgebraicTurn {
    Move(AlgebraicMove),
    Castle(CastleSide),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CheckMark {
    None,
    Check,
    Mate,
}

impl AlgebraicTurn {
    // Returns `None` if there is no piece on the origin square.
    pub fn from_move_code(grid: &Grid, code: MoveCode, legal_moves: &[MoveCode]) -> Option<Self> {
        let MoveCode { from, to, promote_to } = code;
        let piece = grid[from]?;
        let d_col = to.col - from.col;
        if piece.kind == PieceKind::King && d_col.abs() == 2 {
            let side = if d_col > 0 { CastleSide::HSide } else { CastleSide::ASide };
            return Some(AlgebraicTurn::Castle(side));
        }
        let en_passant = piece.kind == PieceKind::Pawn && d_col != 0;
        let capturing = grid[to].is_some() || en_passant;
        let (from_col, from_row) = if piece.kind == PieceKind::Pawn {
            (capturing.then_some(from.col), None)
        } else {
            disambiguate(grid, code, legal_moves)
        };
        Some(AlgebraicTurn::Move(AlgebraicMove {
            piece_kind: piece.kind,
            from_col,
            from_row,
            capturing,
            to,
            promote_to,
        }))
    }

    pub fn format(&self) -> String {
        match self {
            AlgebraicTurn::Move(mv) => {
                let mut from = String::new();
                if let Some(col) = mv.from_col {
                    from.push(col.to_algebraic())
                };
                if let Some(row) = mv.from_row {
                    from.push(row.to_algebraic())
                };
                let promotion = match mv.promote_to {
                    Some(piece_kind) => format!("={}", piece_kind.to_full_algebraic()),
                    None => String::new(),
                };
                format!(
                    "{}{}{}{}{}",
                    mv.piece_kind.to_algebraic_for_move(),
                    from,
                    if mv.capturing { "x" } else { "" },
                    mv.to.to_algebraic(),
                    promotion,
                )
            }
            AlgebraicTurn::Castle(side) => match side {
                CastleSide::ASide => "O-O-O".to_owned(),
                CastleSide::HSide => "O-O".to_owned(),
            },
        }
    }

    pub fn format_with_mark(&self, mark: CheckMark) -> String {
        let suffix = match mark {
            CheckMark::None => "",
            CheckMark::Check => "+",
            CheckMark::Mate => "#",
        };
        format!("{}{}", self.format(), suffix)
    }
}

// Other pieces of the same kind that could also go to the same square.
fn disambiguate(
    grid: &Grid, code: MoveCode, legal_moves: &[MoveCode],
) -> (Option<Col>, Option<Row>) {
    let kind = grid[code.from].map(|piece| piece.kind);
    let rivals: Vec<Coord> = legal_moves
        .iter()
        .filter(|m| m.to == code.to && m.from != code.from)
        .filter(|m| grid[m.from].map(|piece| piece.kind) == kind)
        .map(|m| m.from)
        .collect();
    if rivals.is_empty() {
        (None, None)
    } else if rivals.iter().all(|c| c.col != code.from.col) {
        (Some(code.from.col), None)
    } else if rivals.iter().all(|c| c.row != code.from.row) {
        (None, Some(code.from.row))
    } else {
        (Some(code.from.col), Some(code.from.row))
    }
}

// Notation for a move played on `grid`, or the bare move code if the origin square is empty (the
// local board disagrees with the server).
pub fn describe_move(
    grid: &Grid, code: MoveCode, legal_moves: &[MoveCode], mark: CheckMark,
) -> String {
    match AlgebraicTurn::from_move_code(grid, code, legal_moves) {
        Some(turn) => turn.format_with_mark(mark),
        None => code.to_string(),
    }
}
