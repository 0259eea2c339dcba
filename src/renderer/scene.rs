//! Everything a frame shows, as an ordered list of draw commands.
//!
//! A [`Scene`] is built from scratch every frame from the controller state
//! and the current [`ViewportGeometry`], then handed to a
//! [`Renderer`](super::Renderer). Commands are in window pixels and are
//! painted in list order, so later commands cover earlier ones.
//!
//! # Paint Order
//!
//! 1. background texture
//! 2. board squares
//! 3. selection highlight
//! 4. pieces
//! 5. move markers
//! 6. promotion overlay
//! 7. outcome banner

use crate::controller::{Controller, GameOutcome, GameState, PromotionPicker};
use crate::game_repr::{Move, Piece, RulesEngine, Square};
use crate::geometry::{Rect, ViewportGeometry};
use smallvec::SmallVec;

/// 8-bit RGBA.
pub type Rgba = [u8; 4];

pub const LIGHT_SQUARE: Rgba = [245, 245, 220, 255];
pub const DARK_SQUARE: Rgba = [205, 133, 63, 255];
pub const HIGHLIGHT: Rgba = [255, 255, 0, 128];
pub const MARKER: Rgba = [192, 192, 192, 255];
pub const PROMOTION_BACKING: Rgba = [255, 255, 255, 192];
pub const BANNER: Rgba = [0, 0, 255, 255];

/// Move marker radius in pixels. Does not scale with the board.
pub const MARKER_RADIUS: f32 = 20.0;

/// Glyph inset from each tile edge, as a fraction of the tile.
pub const PIECE_INSET: f32 = 0.1;

/// Banner font size in pixels.
pub const BANNER_SIZE: f32 = 48.0;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// The background texture stretched over the whole window.
    Background,
    Fill { rect: Rect, color: Rgba },
    Glyph { piece: Piece, rect: Rect },
    Disc { center: (f32, f32), radius: f32, color: Rgba },
    /// Text centered in the window.
    Banner { text: String, color: Rgba, size: f32 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full frame for a controller's current state.
    pub fn build<E: RulesEngine>(controller: &Controller<E>, geometry: &ViewportGeometry) -> Self {
        let mut scene = Scene::new();
        let selection = controller.selection();

        scene.push(DrawCommand::Background);
        scene.draw_board(geometry, selection.selected_square());
        scene.draw_pieces(controller.engine(), geometry);

        let picker = controller.promotion_picker();
        if picker.is_none() {
            scene.draw_possible_moves(selection.destinations(), geometry);
        }
        if let Some(picker) = picker {
            scene.draw_promotion_overlay(&picker, geometry);
        }
        if let GameState::Finished(outcome) = controller.state() {
            scene.draw_outcome_banner(outcome);
        }

        scene
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Checkerboard, then the highlight over the selected tile.
    pub fn draw_board(&mut self, geometry: &ViewportGeometry, selected: Option<Square>) {
        for row in 0..8 {
            for col in 0..8 {
                let color = if (row + col) % 2 == 0 {
                    LIGHT_SQUARE
                } else {
                    DARK_SQUARE
                };
                self.push(DrawCommand::Fill {
                    rect: geometry.tile_rect(col, row),
                    color,
                });
            }
        }

        if let Some(square) = selected {
            self.push(DrawCommand::Fill {
                rect: geometry.square_rect(square),
                color: HIGHLIGHT,
            });
        }
    }

    pub fn draw_pieces<E: RulesEngine + ?Sized>(&mut self, engine: &E, geometry: &ViewportGeometry) {
        let inset = geometry.tile_size as f32 * PIECE_INSET;
        for square in Square::all() {
            if let Some(piece) = engine.piece_at(square) {
                self.push(DrawCommand::Glyph {
                    piece,
                    rect: geometry.square_rect(square).inset(inset),
                });
            }
        }
    }

    /// One marker per destination tile. Promotion moves share a tile, so
    /// each tile is marked once.
    pub fn draw_possible_moves(&mut self, destinations: &[Move], geometry: &ViewportGeometry) {
        let mut tiles: SmallVec<[Square; 64]> = destinations.iter().map(|mv| mv.to).collect();
        tiles.sort_unstable();
        tiles.dedup();

        for square in tiles {
            self.push(DrawCommand::Disc {
                center: geometry.square_center(square),
                radius: MARKER_RADIUS,
                color: MARKER,
            });
        }
    }

    pub fn draw_promotion_overlay(&mut self, picker: &PromotionPicker, geometry: &ViewportGeometry) {
        let inset = geometry.tile_size as f32 * PIECE_INSET;
        for (kind, rect) in picker.slots(geometry) {
            self.push(DrawCommand::Fill {
                rect,
                color: PROMOTION_BACKING,
            });
            self.push(DrawCommand::Glyph {
                piece: Piece::new(kind, picker.color),
                rect: rect.inset(inset),
            });
        }
    }

    pub fn draw_outcome_banner(&mut self, outcome: &GameOutcome) {
        if let Some(text) = outcome.banner_text() {
            self.push(DrawCommand::Banner {
                text,
                color: BANNER,
                size: BANNER_SIZE,
            });
        }
    }
}
