use std::fmt;
use std::ops;

use itertools::Itertools;

use crate::force::Force;


pub const NUM_ROWS: u8 = 8;
pub const NUM_COLS: u8 = 8;


// Row counted from the given side's edge of the board. Row 0 holds that side's pieces.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct SubjectiveRow {
    idx: u8, // 0-based
}

impl SubjectiveRow {
    pub const fn from_zero_based(idx: u8) -> Self {
        assert!(idx < NUM_ROWS);
        Self { idx }
    }
    pub const fn last() -> Self { Self::from_zero_based(NUM_ROWS - 1) }
    pub fn to_row(self, force: Force) -> Row {
        match force {
            Force::White => Row::from_zero_based(self.idx),
            Force::Black => Row::from_zero_based(NUM_ROWS - self.idx - 1),
        }
    }
}


// Rank. Row 0 is rank '1'.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Row {
    idx: u8, // 0-based
}

impl Row {
    pub const fn from_zero_based(idx: u8) -> Self {
        assert!(idx < NUM_ROWS);
        Self { idx }
    }
    pub fn from_algebraic(ch: char) -> Option<Self> {
        let idx = (ch as u32).checked_sub('1' as u32)?;
        (idx < NUM_ROWS as u32).then(|| Self::from_zero_based(idx as u8))
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    // Rank number as printed on the board: 1 through 8.
    pub const fn to_one_based(self) -> u8 { self.idx + 1 }
    pub const fn to_algebraic(self) -> char { (self.idx + b'1') as char }
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + Clone {
        (0..NUM_ROWS).map(Self::from_zero_based)
    }
}


// File. Col 0 is file 'a'.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Col {
    idx: u8, // 0-based
}

impl Col {
    pub const fn from_zero_based(idx: u8) -> Col {
        assert!(idx < NUM_COLS);
        Col { idx }
    }
    pub fn from_algebraic(ch: char) -> Option<Self> {
        let idx = (ch as u32).checked_sub('a' as u32)?;
        (idx < NUM_COLS as u32).then(|| Self::from_zero_based(idx as u8))
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    pub const fn to_algebraic(self) -> char { (self.idx + b'a') as char }
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + Clone {
        (0..NUM_COLS).map(Self::from_zero_based)
    }
}

impl ops::Sub for Col {
    type Output = i8;
    fn sub(self, other: Self) -> Self::Output {
        (self.to_zero_based() as i8) - (other.to_zero_based() as i8)
    }
}


#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub row: Row,
    pub col: Col,
}

impl Coord {
    pub const fn new(row: Row, col: Col) -> Self { Self { row, col } }
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let (col, row) = s.chars().collect_tuple()?;
        Some(Coord {
            row: Row::from_algebraic(row)?,
            col: Col::from_algebraic(col)?,
        })
    }
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.col.to_algebraic(), self.row.to_algebraic())
    }
    pub fn all() -> impl Iterator<Item = Coord> {
        Row::all().cartesian_product(Col::all()).map(|(row, col)| Coord { row, col })
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.col.to_algebraic(), self.row.to_algebraic())
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({}{})", self.col.to_algebraic(), self.row.to_algebraic())
    }
}


macro_rules! coord_constants {
    ($($name:ident = $col:literal $row:literal),* $(,)?) => {
        #[allow(dead_code)]
        impl Coord {
            $(
                pub const $name: Coord = Coord::new(Row::from_zero_based($row - 1), Col::from_zero_based($col));
            )*
        }
    };
}

coord_constants! {
    A1 = 0 1, A2 = 0 2, A3 = 0 3, A4 = 0 4, A5 = 0 5, A6 = 0 6, A7 = 0 7, A8 = 0 8,
    B1 = 1 1, B2 = 1 2, B3 = 1 3, B4 = 1 4, B5 = 1 5, B6 = 1 6, B7 = 1 7, B8 = 1 8,
    C1 = 2 1, C2 = 2 2, C3 = 2 3, C4 = 2 4, C5 = 2 5, C6 = 2 6, C7 = 2 7, C8 = 2 8,
    D1 = 3 1, D2 = 3 2, D3 = 3 3, D4 = 3 4, D5 = 3 5, D6 = 3 6, D7 = 3 7, D8 = 3 8,
    E1 = 4 1, E2 = 4 2, E3 = 4 3, E4 = 4 4, E5 = 4 5, E6 = 4 6, E7 = 4 7, E8 = 4 8,
    F1 = 5 1, F2 = 5 2, F3 = 5 3, F4 = 5 4, F5 = 5 5, F6 = 5 6, F7 = 5 7, F8 = 5 8,
    G1 = 6 1, G2 = 6 2, G3 = 6 3, G4 = 6 4, G5 = 6 5, G6 = 6 6, G7 = 6 7, G8 = 6 8,
    H1 = 7 1, H2 = 7 2, H3 = 7 3, H4 = 7 4, H5 = 7 5, H6 = 7 6, H7 = 7 7, H8 = 7 8,
}
