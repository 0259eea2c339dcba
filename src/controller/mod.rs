//! Click-driven game state machine.
//!
//! [`Controller`] owns the rules engine and everything the operator can
//! change with the mouse: the selection, a pending promotion and the final
//! outcome. It is driven one event at a time by the frame loop and read by
//! the scene builder.
//!
//! # State Machine
//!
//! ```text
//! Playing ──pawn reaches last rank──▶ AwaitingPromotion
//!    ▲                                     │
//!    └──────────piece picked───────────────┘
//! Playing ──checkmate or draw──▶ Finished (terminal)
//! ```
//!
//! While a promotion is pending, board clicks go to the [`PromotionPicker`]
//! and the selection is frozen. Once finished, every click is ignored.

pub mod executor;
pub mod promotion;
pub mod selection;
pub mod status;

pub use executor::MoveResult;
pub use promotion::PromotionPicker;
pub use selection::{SelectionController, SelectionEvent, SelectionState};
pub use status::{DrawReason, GameOutcome};

use crate::game_repr::{Color, Move, PieceKind, RulesEngine, Square};
use crate::geometry::ViewportGeometry;
use log::{debug, error, info};

/// A pawn move waiting for the operator to pick its promotion piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPromotion {
    /// The pawn advance, without a promotion piece.
    pub mv: Move,
    /// The side that is promoting.
    pub color: Color,
}

impl PendingPromotion {
    /// The promotion square.
    pub fn square(&self) -> Square {
        self.mv.to
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    AwaitingPromotion(PendingPromotion),
    Finished(GameOutcome),
}

/// Owns the engine and routes clicks to selection, moves and promotion.
pub struct Controller<E: RulesEngine> {
    engine: E,
    selection: SelectionController,
    state: GameState,
}

impl<E: RulesEngine> Controller<E> {
    /// Start controlling `engine`.
    ///
    /// A position that is already over starts out finished.
    pub fn new(engine: E) -> Self {
        let mut controller = Self {
            engine,
            selection: SelectionController::new(),
            state: GameState::Playing,
        };
        controller.refresh_status();
        controller
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The final outcome, once the game is finished.
    pub fn outcome(&self) -> Option<GameOutcome> {
        match self.state {
            GameState::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// The chooser to show, while a promotion is pending.
    pub fn promotion_picker(&self) -> Option<PromotionPicker> {
        match &self.state {
            GameState::AwaitingPromotion(pending) => Some(PromotionPicker::for_pending(pending)),
            _ => None,
        }
    }

    /// Route a pointer press at window position `(x, y)`.
    ///
    /// # Arguments
    ///
    /// * `x`, `y` - Pointer position in window pixels
    /// * `geometry` - Board placement for the current window size
    pub fn handle_pointer(&mut self, x: f64, y: f64, geometry: &ViewportGeometry) {
        match self.state {
            GameState::Playing => self.handle_click(geometry.square_from_pointer(x, y)),
            GameState::AwaitingPromotion(pending) => {
                let picker = PromotionPicker::for_pending(&pending);
                match picker.hit_test(geometry, x, y) {
                    Some(kind) => self.choose_promotion(kind),
                    None => debug!("Click at ({x}, {y}) missed the promotion choices"),
                }
            }
            GameState::Finished(_) => debug!("Click at ({x}, {y}) ignored, the game is over"),
        }
    }

    /// Process a click that resolved to `square`, or to nothing when it
    /// landed off the board. Only acts while playing.
    pub fn handle_click(&mut self, square: Option<Square>) {
        if self.state != GameState::Playing {
            return;
        }
        let Some(square) = square else {
            return;
        };

        if let SelectionEvent::MoveRequested(mv) = self.selection.click(&self.engine, square) {
            self.attempt_move(mv);
        }
    }

    /// Try to play `mv` and update the selection and game state to match.
    ///
    /// # Returns
    ///
    /// * [`MoveResult::Applied`] - played; selection idle, outcome re-evaluated
    /// * [`MoveResult::NeedsPromotion`] - now awaiting a promotion piece
    /// * [`MoveResult::Rejected`] - nothing changed
    pub fn attempt_move(&mut self, mv: Move) -> MoveResult {
        let result = executor::attempt_move(&mut self.engine, &self.state, mv);

        match result {
            MoveResult::Applied => {
                self.selection.clear();
                self.refresh_status();
            }
            MoveResult::NeedsPromotion(_) => {
                let color = self
                    .engine
                    .piece_at(mv.from)
                    .map_or_else(|| self.engine.side_to_move(), |piece| piece.color);
                self.state = GameState::AwaitingPromotion(PendingPromotion { mv, color });
            }
            MoveResult::Rejected => {}
        }

        result
    }

    /// Finish a pending promotion with `kind`. Does nothing otherwise.
    pub fn choose_promotion(&mut self, kind: PieceKind) {
        let GameState::AwaitingPromotion(pending) = self.state else {
            return;
        };

        if let Err(e) = executor::finish_promotion(&mut self.engine, &pending, kind) {
            // The move was legal when it was requested and nothing has
            // been played since.
            error!("Could not finish promotion {}: {e}", pending.mv);
        }

        self.selection.clear();
        self.state = GameState::Playing;
        self.refresh_status();
    }

    /// Re-evaluate the position and finish the game if it is over.
    ///
    /// Runs once per frame and after every applied move. Only a game in
    /// progress can finish; a pending promotion is left alone.
    pub fn refresh_status(&mut self) {
        if self.state != GameState::Playing {
            return;
        }

        let outcome = status::evaluate(&self.engine);
        if outcome.is_over() {
            info!("Game over: {outcome}");
            self.selection.clear();
            self.state = GameState::Finished(outcome);
        }
    }
}
