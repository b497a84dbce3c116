// Mapping between board squares and on-screen positions.

use serde::{Deserialize, Serialize};

use crate::coord::{Col, Coord, NUM_COLS, NUM_ROWS, Row};
use crate::force::Force;


#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardOrientation {
    Normal,  // White at bottom
    Rotated, // Black at bottom
}

// These coords describe board squares, like `Coord`. Both `x` and `y` are integers between 0
// and 7, but row 0 here corresponds to the top-most row, which could be row '1' or row '8' on
// the board.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct DisplayCoord {
    pub x: u8,
    pub y: u8,
}

// Floating-point coords associated with `DisplayCoord` coordinate system, measured in squares.
// Point (0., 0.) corresponds to the top left corner of the top left square, while
// point (8., 8.) corresponds to the bottom right corner of the bottom right square.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct DisplayFCoord {
    pub x: f64,
    pub y: f64,
}

impl BoardOrientation {
    pub fn for_force(force: Force) -> Self {
        match force {
            Force::White => BoardOrientation::Normal,
            Force::Black => BoardOrientation::Rotated,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            BoardOrientation::Normal => BoardOrientation::Rotated,
            BoardOrientation::Rotated => BoardOrientation::Normal,
        }
    }

    pub fn bottom_force(self) -> Force {
        match self {
            BoardOrientation::Normal => Force::White,
            BoardOrientation::Rotated => Force::Black,
        }
    }
}

// Files and ranks are reversed together, so flipping is a half-turn rotation.
pub fn to_display_coord(coord: Coord, orientation: BoardOrientation) -> DisplayCoord {
    match orientation {
        BoardOrientation::Normal => DisplayCoord {
            x: coord.col.to_zero_based(),
            y: NUM_ROWS - coord.row.to_zero_based() - 1,
        },
        BoardOrientation::Rotated => DisplayCoord {
            x: NUM_COLS - coord.col.to_zero_based() - 1,
            y: coord.row.to_zero_based(),
        },
    }
}

pub fn from_display_row(y: u8, orientation: BoardOrientation) -> Option<Row> {
    if y >= NUM_ROWS {
        return None;
    }
    Some(match orientation {
        BoardOrientation::Normal => Row::from_zero_based(NUM_ROWS - y - 1),
        BoardOrientation::Rotated => Row::from_zero_based(y),
    })
}

pub fn from_display_col(x: u8, orientation: BoardOrientation) -> Option<Col> {
    if x >= NUM_COLS {
        return None;
    }
    Some(match orientation {
        BoardOrientation::Normal => Col::from_zero_based(x),
        BoardOrientation::Rotated => Col::from_zero_based(NUM_COLS - x - 1),
    })
}

pub fn from_display_coord(q: DisplayCoord, orientation: BoardOrientation) -> Option<Coord> {
    Some(Coord {
        row: from_display_row(q.y, orientation)?,
        col: from_display_col(q.x, orientation)?,
    })
}

impl DisplayFCoord {
    // Position of the top-left corner of a square.
    pub fn square_pivot(coord: DisplayCoord) -> Self {
        DisplayFCoord { x: f64::from(coord.x), y: f64::from(coord.y) }
    }

    pub fn to_square(self) -> Option<DisplayCoord> {
        if self.x.is_nan() || self.y.is_nan() || self.x < 0. || self.y < 0. {
            return None;
        }
        let x = self.x as u32;
        let y = self.y as u32;
        if x < NUM_COLS as u32 && y < NUM_ROWS as u32 {
            Some(DisplayCoord { x: x as u8, y: y as u8 })
        } else {
            None
        }
    }
}

// Pixel position inside a board of `board_size` pixels to the square under it.
pub fn pixel_to_coord(
    px: f64, py: f64, board_size: f64, orientation: BoardOrientation,
) -> Option<Coord> {
    if !board_size.is_finite() || board_size <= 0. {
        return None;
    }
    let square_size = board_size / f64::from(NUM_COLS);
    let display = DisplayFCoord { x: px / square_size, y: py / square_size }.to_square()?;
    from_display_coord(display, orientation)
}
