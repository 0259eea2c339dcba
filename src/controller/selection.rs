//! Which piece the operator has picked up and where it may go.
//!
//! # Click Handling Logic
//!
//! - **Idle + click on a piece of the side to move**: select it, even if it has no legal moves
//! - **Idle + any other click**: stay idle
//! - **Selected + click on the selected square**: deselect
//! - **Selected + click on a destination**: request the move
//! - **Selected + click on another piece of the side to move**: reselect
//! - **Selected + click anywhere else on the board**: deselect

use crate::game_repr::{Move, RulesEngine, Square};
use log::debug;
use smallvec::SmallVec;

/// Destinations of the selected piece, as legal moves.
pub type Destinations = SmallVec<[Move; 64]>;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Selected {
        square: Square,
        destinations: Destinations,
    },
}

/// What a click did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    Ignored,
    Selected(Square),
    Deselected,
    /// The click completed a move. The selection is unchanged until the
    /// move's fate is known.
    MoveRequested(Move),
}

#[derive(Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selected_square(&self) -> Option<Square> {
        match &self.state {
            SelectionState::Idle => None,
            SelectionState::Selected { square, .. } => Some(*square),
        }
    }

    /// Legal moves of the selected piece, empty when idle.
    pub fn destinations(&self) -> &[Move] {
        match &self.state {
            SelectionState::Idle => &[],
            SelectionState::Selected { destinations, .. } => destinations.as_slice(),
        }
    }

    /// Return to idle.
    pub fn clear(&mut self) {
        self.state = SelectionState::Idle;
    }

    /// Process a click on a board square.
    ///
    /// # Arguments
    ///
    /// * `engine` - Queried for pieces, the side to move and legal moves
    /// * `square` - The square under the pointer
    ///
    /// # Returns
    ///
    /// What the click did. [`SelectionEvent::MoveRequested`] leaves the
    /// selection in place; the caller clears it once the move is applied.
    pub fn click<E: RulesEngine + ?Sized>(&mut self, engine: &E, square: Square) -> SelectionEvent {
        let (from, is_destination) = match &self.state {
            SelectionState::Idle => return self.try_select(engine, square),
            SelectionState::Selected {
                square: from,
                destinations,
            } => (*from, destinations.iter().any(|mv| mv.to == square)),
        };

        if square == from {
            debug!("Deselected {from}");
            self.clear();
            return SelectionEvent::Deselected;
        }

        if is_destination {
            return SelectionEvent::MoveRequested(Move::new(from, square));
        }

        let own_piece = engine
            .piece_at(square)
            .is_some_and(|piece| piece.is(engine.side_to_move()));
        if own_piece {
            return self.try_select(engine, square);
        }

        debug!("Deselected {from}, {square} is not a destination");
        self.clear();
        SelectionEvent::Deselected
    }

    fn try_select<E: RulesEngine + ?Sized>(&mut self, engine: &E, square: Square) -> SelectionEvent {
        match engine.piece_at(square) {
            Some(piece) if piece.is(engine.side_to_move()) => {
                let destinations = engine.legal_moves_from(square);
                debug!(
                    "Selected {} {} on {square} with {} legal moves",
                    piece.color,
                    piece.kind.name(),
                    destinations.len()
                );
                self.state = SelectionState::Selected {
                    square,
                    destinations,
                };
                SelectionEvent::Selected(square)
            }
            _ => {
                self.clear();
                SelectionEvent::Ignored
            }
        }
    }
}
