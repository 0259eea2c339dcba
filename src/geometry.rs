//! Board placement inside the window and pointer-to-square mapping.
//!
//! # Coordinate System
//!
//! Window pixels, `(0, 0)` at the top-left corner, y increasing downward.
//! The board is an 8×8 grid of square tiles centered in the window; screen
//! row 0 holds rank 8, so White plays from the bottom.
//!
//! The same [`Rect`]s are used for drawing and for hit detection.

use crate::game_repr::Square;

/// Pixels left free around the board, split evenly between both sides.
pub const BOARD_MARGIN: u32 = 100;

/// An axis-aligned rectangle in window pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Shrink the rectangle by `amount` on every side.
    pub fn inset(&self, amount: f32) -> Rect {
        Rect::new(
            self.left + amount,
            self.top + amount,
            (self.width - 2.0 * amount).max(0.0),
            (self.height - 2.0 * amount).max(0.0),
        )
    }

    /// Whether the point lies inside the rectangle. Edges count as inside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left as f64
            && x <= self.right() as f64
            && y >= self.top as f64
            && y <= self.bottom() as f64
    }

    /// The 4 corners in order top-left, top-right, bottom-left, bottom-right,
    /// matching the shared quad index buffer.
    pub fn corners(&self) -> [[f32; 2]; 4] {
        let right = self.right();
        let bottom = self.bottom();
        [
            [self.left, self.top],
            [right, self.top],
            [self.left, bottom],
            [right, bottom],
        ]
    }
}

/// Where the board sits in the window and how big one tile is.
///
/// Recomputed from the window size on every resize; never cached across one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportGeometry {
    pub offset_x: u32,
    pub offset_y: u32,
    pub tile_size: u32,
}

impl ViewportGeometry {
    /// Fit the board into a window of the given size.
    ///
    /// `tile_size = (min(width, height) - BOARD_MARGIN) / 8`, at least 1.
    /// The offsets center the board in both directions.
    pub fn recompute(width: u32, height: u32) -> Self {
        let board_budget = width.min(height).saturating_sub(BOARD_MARGIN);
        let tile_size = (board_budget / 8).max(1);
        let board = tile_size * 8;

        Self {
            offset_x: width.saturating_sub(board) / 2,
            offset_y: height.saturating_sub(board) / 2,
            tile_size,
        }
    }

    /// Side length of the whole board in pixels.
    pub fn board_size(&self) -> u32 {
        self.tile_size * 8
    }

    /// The square under a pointer position.
    ///
    /// # Returns
    ///
    /// * `Some(Square)` if the pointer is over the board
    /// * `None` if it is left of or above the board, or past its far edges
    pub fn square_from_pointer(&self, x: f64, y: f64) -> Option<Square> {
        let dx = x - self.offset_x as f64;
        let dy = y - self.offset_y as f64;
        if dx < 0.0 || dy < 0.0 {
            return None;
        }

        let tile = self.tile_size as f64;
        let col = (dx / tile).floor();
        let row = (dy / tile).floor();
        if col >= 8.0 || row >= 8.0 {
            return None;
        }

        Square::from_coords(col as u8, 7 - row as u8)
    }

    /// The tile at screen column `col` and screen row `row`.
    ///
    /// Columns and rows outside `[0, 8)` are allowed; the promotion overlay
    /// may stack tiles past the board edge.
    pub fn tile_rect(&self, col: i32, row: i32) -> Rect {
        let tile = self.tile_size as f32;
        Rect::new(
            self.offset_x as f32 + col as f32 * tile,
            self.offset_y as f32 + row as f32 * tile,
            tile,
            tile,
        )
    }

    pub fn square_rect(&self, square: Square) -> Rect {
        self.tile_rect(square.col() as i32, square.row() as i32)
    }

    pub fn square_center(&self, square: Square) -> (f32, f32) {
        self.square_rect(square).center()
    }
}
