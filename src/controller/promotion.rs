//! The four-piece chooser shown while a promotion is pending.
//!
//! Candidates are stacked one tile apart from the promotion square toward
//! the middle of the board: downward for a square on the top row, upward for
//! one on the bottom row. Candidate `i` sits `i + 1` tiles away.

use super::PendingPromotion;
use crate::game_repr::{Color, PieceKind, Square};
use crate::geometry::{Rect, ViewportGeometry};

/// Pieces offered, in display order.
pub const CANDIDATES: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// Fraction of a tile excluded from each edge of a candidate's click area.
pub const HIT_MARGIN: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionPicker {
    pub square: Square,
    pub color: Color,
}

impl PromotionPicker {
    pub fn new(square: Square, color: Color) -> Self {
        Self { square, color }
    }

    pub fn for_pending(pending: &PendingPromotion) -> Self {
        Self::new(pending.square(), pending.color)
    }

    /// +1 (down the screen) or -1 (up the screen).
    fn direction(&self) -> i32 {
        if self.square.row() == 0 {
            1
        } else {
            -1
        }
    }

    /// Screen rectangle of candidate `index`.
    pub fn slot_rect(&self, geometry: &ViewportGeometry, index: usize) -> Rect {
        let row = self.square.row() as i32 + self.direction() * (index as i32 + 1);
        geometry.tile_rect(self.square.col() as i32, row)
    }

    /// Every candidate with its rectangle, in display order.
    pub fn slots(&self, geometry: &ViewportGeometry) -> [(PieceKind, Rect); 4] {
        std::array::from_fn(|i| (CANDIDATES[i], self.slot_rect(geometry, i)))
    }

    /// The candidate under a pointer position, if any.
    ///
    /// The click area of each slot is its tile shrunk by `tile * HIT_MARGIN`
    /// on every side; edges of the shrunk area count as hits.
    pub fn hit_test(&self, geometry: &ViewportGeometry, x: f64, y: f64) -> Option<PieceKind> {
        let margin = geometry.tile_size as f32 * HIT_MARGIN;
        self.slots(geometry)
            .into_iter()
            .find(|(_, rect)| rect.inset(margin).contains(x, y))
            .map(|(kind, _)| kind)
    }
}
