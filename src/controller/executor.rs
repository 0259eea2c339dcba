//! Turning a requested move into an engine move.

use super::{GameState, PendingPromotion};
use crate::game_repr::{EngineError, Move, PieceKind, RulesEngine, Square};
use log::{debug, info};

/// Result of [`attempt_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    /// The engine played the move.
    Applied,
    /// The move is not legal now, a promotion is pending, or the game is
    /// over. Nothing changed.
    Rejected,
    /// A pawn reached its last rank; a piece must be picked before the move
    /// is played. The board is unchanged.
    NeedsPromotion(Square),
}

/// Validate a move against the engine's current legal moves and play it.
///
/// Legality is checked again here rather than trusting the destinations
/// computed when the piece was selected.
///
/// # Arguments
///
/// * `engine` - The position to play on
/// * `state` - Current game state; only a game in progress accepts moves
/// * `mv` - The move; without a promotion piece it may still need one
pub fn attempt_move<E: RulesEngine + ?Sized>(
    engine: &mut E,
    state: &GameState,
    mv: Move,
) -> MoveResult {
    match state {
        GameState::Playing => {}
        GameState::AwaitingPromotion(pending) => {
            debug!("Rejected {mv}, {} is waiting for a promotion piece", pending.mv);
            return MoveResult::Rejected;
        }
        GameState::Finished(_) => {
            debug!("Rejected {mv}, the game is over");
            return MoveResult::Rejected;
        }
    }

    let legal = engine.legal_moves_from(mv.from);
    if !legal.iter().any(|candidate| candidate.same_path(&mv)) {
        debug!("Rejected {mv}, not legal in the current position");
        return MoveResult::Rejected;
    }

    if mv.promotion.is_none() && is_promotion(engine, mv) {
        debug!("{mv} reaches the last rank, waiting for a promotion piece");
        return MoveResult::NeedsPromotion(mv.to);
    }

    match engine.push(mv) {
        Ok(()) => {
            info!("Played {mv}");
            MoveResult::Applied
        }
        Err(e) => {
            debug!("Rejected {mv}: {e}");
            MoveResult::Rejected
        }
    }
}

/// Play a pending pawn move as a promotion to `kind`.
pub fn finish_promotion<E: RulesEngine + ?Sized>(
    engine: &mut E,
    pending: &PendingPromotion,
    kind: PieceKind,
) -> Result<(), EngineError> {
    let mv = pending.mv.with_promotion(kind);
    engine.push(mv)?;
    info!("Played {mv}, {} promotes to {}", pending.color, kind.name());
    Ok(())
}

fn is_promotion<E: RulesEngine + ?Sized>(engine: &E, mv: Move) -> bool {
    engine.piece_at(mv.from).is_some_and(|piece| {
        piece.kind == PieceKind::Pawn && mv.to.rank() == piece.color.last_rank()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::status::{DrawReason, GameOutcome};
    use crate::game_repr::{Color, Piece, ShakmatyEngine};

    fn sq(index: u8) -> Square {
        Square::new(index).unwrap()
    }

    #[test]
    fn test_applied_move() {
        let mut engine = ShakmatyEngine::new();

        let result = attempt_move(&mut engine, &GameState::Playing, Move::new(sq(12), sq(28)));

        assert_eq!(result, MoveResult::Applied);
        assert_eq!(engine.move_count(), 1);
    }

    #[test]
    fn test_stale_move_rejected() {
        let mut engine = ShakmatyEngine::new();
        attempt_move(&mut engine, &GameState::Playing, Move::new(sq(12), sq(28)));

        // Same pair again: the pawn is no longer on e2
        let result = attempt_move(&mut engine, &GameState::Playing, Move::new(sq(12), sq(28)));

        assert_eq!(result, MoveResult::Rejected);
        assert_eq!(engine.move_count(), 1);
    }

    #[test]
    fn test_finished_game_rejects() {
        let mut engine = ShakmatyEngine::new();
        let state = GameState::Finished(GameOutcome::Draw(DrawReason::Stalemate));

        let result = attempt_move(&mut engine, &state, Move::new(sq(12), sq(28)));

        assert_eq!(result, MoveResult::Rejected);
        assert_eq!(engine.move_count(), 0);
    }

    #[test]
    fn test_pending_promotion_rejects_other_moves() {
        let mut engine = ShakmatyEngine::from_fen("k7/4P3/8/8/8/8/r7/4K3 w - - 0 1").unwrap();
        let state = GameState::AwaitingPromotion(PendingPromotion {
            mv: Move::new(sq(52), sq(60)),
            color: Color::White,
        });

        // Kd1 is legal, but the board is locked until the pawn promotes
        let result = attempt_move(&mut engine, &state, Move::new(sq(4), sq(3)));

        assert_eq!(result, MoveResult::Rejected);
        assert_eq!(engine.move_count(), 0);
        assert_eq!(
            engine.piece_at(sq(4)),
            Some(Piece::new(PieceKind::King, Color::White))
        );
    }

    #[test]
    fn test_white_promotion_waits_for_piece() {
        let mut engine = ShakmatyEngine::from_fen("k7/4P3/8/8/8/8/r7/4K3 w - - 0 1").unwrap();

        let result = attempt_move(&mut engine, &GameState::Playing, Move::new(sq(52), sq(60)));

        assert_eq!(result, MoveResult::NeedsPromotion(sq(60)));
        assert_eq!(engine.move_count(), 0);
        assert_eq!(
            engine.piece_at(sq(52)),
            Some(Piece::new(PieceKind::Pawn, Color::White))
        );
        assert_eq!(engine.piece_at(sq(60)), None);
    }

    #[test]
    fn test_black_promotion_finishes() {
        let mut engine = ShakmatyEngine::from_fen("4k3/8/8/8/8/8/4p3/K6R b - - 0 1").unwrap();
        let mv = Move::new(sq(12), sq(4));

        assert_eq!(
            attempt_move(&mut engine, &GameState::Playing, mv),
            MoveResult::NeedsPromotion(sq(4))
        );

        let pending = PendingPromotion {
            mv,
            color: Color::Black,
        };
        finish_promotion(&mut engine, &pending, PieceKind::Queen).unwrap();

        assert_eq!(
            engine.piece_at(sq(4)),
            Some(Piece::new(PieceKind::Queen, Color::Black))
        );
        assert_eq!(engine.piece_at(sq(12)), None);
        assert_eq!(engine.move_count(), 1);
    }

    #[test]
    fn test_explicit_promotion_plays_directly() {
        let mut engine = ShakmatyEngine::from_fen("k7/4P3/8/8/8/8/r7/4K3 w - - 0 1").unwrap();
        let mv = Move::new(sq(52), sq(60)).with_promotion(PieceKind::Bishop);

        assert_eq!(
            attempt_move(&mut engine, &GameState::Playing, mv),
            MoveResult::Applied
        );
        assert_eq!(
            engine.piece_at(sq(60)),
            Some(Piece::new(PieceKind::Bishop, Color::White))
        );
    }
}
