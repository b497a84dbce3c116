use derive_new::new;
use enum_map::Enum;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::force::Force;


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Enum, EnumIter, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, new, Serialize, Deserialize)]
pub struct PieceOnBoard {
    pub kind: PieceKind,
    pub force: Force,
}

// Pieces a pawn may turn into, in the order they are offered to the user.
pub const PROMOTION_CHOICES: [PieceKind; 4] =
    [PieceKind::Queen, PieceKind::Rook, PieceKind::Bishop, PieceKind::Knight];

impl PieceKind {
    // Upper-case letter used in placement strings. Pawns have one too, unlike in move notation.
    pub fn to_full_algebraic(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    // Prefix of a move in short notation: empty for pawns.
    pub fn to_algebraic_for_move(self) -> String {
        match self {
            PieceKind::Pawn => String::new(),
            _ => self.to_full_algebraic().to_string(),
        }
    }

    pub fn from_algebraic_char(notation: char) -> Option<Self> {
        match notation.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    // Trailing letter of a move code.
    pub fn to_promotion_letter(self) -> Option<char> {
        match self {
            PieceKind::Knight => Some('n'),
            PieceKind::Bishop => Some('b'),
            PieceKind::Rook => Some('r'),
            PieceKind::Queen => Some('q'),
            PieceKind::Pawn | PieceKind::King => None,
        }
    }

    pub fn from_promotion_letter(letter: char) -> Option<Self> {
        match letter {
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            _ => None,
        }
    }

    // Number of pieces of this kind each side starts with.
    pub fn starting_count(self) -> u8 {
        match self {
            PieceKind::Pawn => 8,
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook => 2,
            PieceKind::Queen | PieceKind::King => 1,
        }
    }
}

// Placement letter: upper case for white, lower case for black.
pub fn piece_to_ascii(kind: PieceKind, force: Force) -> char {
    let ch = kind.to_full_algebraic();
    match force {
        Force::White => ch,
        Force::Black => ch.to_ascii_lowercase(),
    }
}

pub fn piece_from_ascii(ch: char) -> Option<(PieceKind, Force)> {
    let force = if ch.is_ascii_uppercase() { Force::White } else { Force::Black };
    PieceKind::from_algebraic_char(ch).map(|kind| (kind, force))
}

// Image file name inside the piece directory, e.g. "wn.png" for a white knight.
pub fn piece_image_name(kind: PieceKind, force: Force) -> String {
    format!("{}{}.png", force.to_fen_char(), kind.to_full_algebraic().to_ascii_lowercase())
}

// Unicode chess symbols are laid out king to pawn, white first.
pub fn piece_to_pictogram(piece_kind: PieceKind, force: Force) -> char {
    let offset = match piece_kind {
        PieceKind::King => 0,
        PieceKind::Queen => 1,
        PieceKind::Rook => 2,
        PieceKind::Bishop => 3,
        PieceKind::Knight => 4,
        PieceKind::Pawn => 5,
    };
    let base = match force {
        Force::White => 0x2654,
        Force::Black => 0x265A,
    };
    char::from_u32(base + offset).unwrap_or('?')
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pictograms() {
        assert_eq!(piece_to_pictogram(PieceKind::King, Force::White), '♔');
        assert_eq!(piece_to_pictogram(PieceKind::Pawn, Force::White), '♙');
        assert_eq!(piece_to_pictogram(PieceKind::Knight, Force::Black), '♞');
        assert_eq!(piece_to_pictogram(PieceKind::Pawn, Force::Black), '♟');
    }

    #[test]
    fn ascii_and_images() {
        assert_eq!(piece_from_ascii('q'), Some((PieceKind::Queen, Force::Black)));
        assert_eq!(piece_from_ascii('x'), None);
        assert_eq!(piece_to_ascii(PieceKind::Knight, Force::White), 'N');
        assert_eq!(piece_image_name(PieceKind::Knight, Force::White), "wn.png");
        assert_eq!(PieceKind::Pawn.to_algebraic_for_move(), "");
    }
}
