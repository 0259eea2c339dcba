//! The seam between the board controller and the chess rules.
//!
//! The controller never decides legality or game termination itself. It asks
//! a [`RulesEngine`] for pieces, legal moves and terminal conditions, and
//! hands it the moves the operator completes.

use super::{Color, Move, Piece, Square};
use smallvec::SmallVec;
use thiserror::Error;

/// Failures reported by a rules engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid FEN `{fen}`: {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("FEN `{fen}` describes an illegal position: {reason}")]
    IllegalPosition { fen: String, reason: String },

    #[error("move `{0}` is not legal in the current position")]
    IllegalMove(Move),
}

/// Board state plus legality and terminal-condition logic.
///
/// Implementations own the position. All moves cross this boundary in
/// standard form: castling is the king's two-square step and promotions name
/// the piece they become.
pub trait RulesEngine {
    /// The piece standing on `square`, if any.
    fn piece_at(&self, square: Square) -> Option<Piece>;

    /// The color whose turn it is.
    fn side_to_move(&self) -> Color;

    /// Every legal move in the current position.
    fn legal_moves(&self) -> Vec<Move>;

    /// Apply a legal move. Illegal moves leave the position untouched.
    fn push(&mut self, mv: Move) -> Result<(), EngineError>;

    /// Number of moves pushed since the engine was created.
    fn move_count(&self) -> usize;

    fn is_checkmate(&self) -> bool;

    fn is_stalemate(&self) -> bool;

    fn is_insufficient_material(&self) -> bool;

    /// At least 75 moves by each side without a capture or pawn advance.
    fn is_seventyfive_moves(&self) -> bool;

    /// The current position has occurred five times.
    fn is_fivefold_repetition(&self) -> bool;

    /// Legal moves starting on `from`.
    fn legal_moves_from(&self, from: Square) -> SmallVec<[Move; 64]> {
        self.legal_moves()
            .into_iter()
            .filter(|mv| mv.from == from)
            .collect()
    }
}
