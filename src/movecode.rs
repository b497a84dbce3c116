use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

use crate::coord::Coord;
use crate::piece::PieceKind;


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum MoveCodeError {
    WrongLength(usize),
    InvalidSquare(String),
    SameSquare,
    InvalidPromotion(char),
}

// Origin, destination and optional promotion piece, e.g. "e2e4" or "e7e8q".
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct MoveCode {
    pub from: Coord,
    pub to: Coord,
    pub promote_to: Option<PieceKind>,
}

impl MoveCode {
    pub fn new(from: Coord, to: Coord) -> Self { MoveCode { from, to, promote_to: None } }

    pub fn with_promotion(from: Coord, to: Coord, promote_to: PieceKind) -> Self {
        MoveCode { from, to, promote_to: Some(promote_to) }
    }

    pub fn is_promotion(&self) -> bool { self.promote_to.is_some() }
}

impl FromStr for MoveCode {
    type Err = MoveCodeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars = s.trim().chars().collect_vec();
        if chars.len() != 4 && chars.len() != 5 {
            return Err(MoveCodeError::WrongLength(chars.len()));
        }
        let square = |cs: &[char]| {
            let text: String = cs.iter().collect();
            Coord::from_algebraic(&text).ok_or(MoveCodeError::InvalidSquare(text))
        };
        let from = square(&chars[0..2])?;
        let to = square(&chars[2..4])?;
        if from == to {
            return Err(MoveCodeError::SameSquare);
        }
        let promote_to = match chars.get(4) {
            None => None,
            Some(&letter) => Some(
                PieceKind::from_promotion_letter(letter.to_ascii_lowercase())
                    .ok_or(MoveCodeError::InvalidPromotion(letter))?,
            ),
        };
        Ok(MoveCode { from, to, promote_to })
    }
}

impl fmt::Display for MoveCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(letter) = self.promote_to.and_then(PieceKind::to_promotion_letter) {
            write!(f, "{letter}")?;
        }
        Ok(())
    }
}
