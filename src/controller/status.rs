//! Game termination checks and the text shown when the game is over.

use crate::game_repr::{Color, RulesEngine};
use std::fmt;

/// Why a game ended without a winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMove,
    FivefoldRepetition,
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DrawReason::Stalemate => "stalemate",
            DrawReason::InsufficientMaterial => "insufficient material",
            DrawReason::SeventyFiveMove => "seventy-five-move rule",
            DrawReason::FivefoldRepetition => "fivefold repetition",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Ongoing,
    Checkmate { winner: Color },
    Draw(DrawReason),
}

impl GameOutcome {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameOutcome::Ongoing)
    }

    /// Text for the end-of-game banner. Every draw reads the same.
    pub fn banner_text(&self) -> Option<String> {
        match self {
            GameOutcome::Ongoing => None,
            GameOutcome::Checkmate { winner } => Some(format!("{winner} wins")),
            GameOutcome::Draw(_) => Some("Draw".to_string()),
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Ongoing => f.write_str("ongoing"),
            GameOutcome::Checkmate { winner } => write!(f, "checkmate, {winner} wins"),
            GameOutcome::Draw(reason) => write!(f, "draw by {reason}"),
        }
    }
}

/// Classify the engine's current position.
///
/// Checkmate wins for the side that just moved. Draw conditions are checked
/// in a fixed order: stalemate, insufficient material, the seventy-five-move
/// rule, fivefold repetition.
pub fn evaluate<E: RulesEngine + ?Sized>(engine: &E) -> GameOutcome {
    if engine.is_checkmate() {
        return GameOutcome::Checkmate {
            winner: engine.side_to_move().opposite(),
        };
    }

    let draw = if engine.is_stalemate() {
        Some(DrawReason::Stalemate)
    } else if engine.is_insufficient_material() {
        Some(DrawReason::InsufficientMaterial)
    } else if engine.is_seventyfive_moves() {
        Some(DrawReason::SeventyFiveMove)
    } else if engine.is_fivefold_repetition() {
        Some(DrawReason::FivefoldRepetition)
    } else {
        None
    };

    draw.map_or(GameOutcome::Ongoing, GameOutcome::Draw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_repr::{Move, ShakmatyEngine, Square};

    fn play(engine: &mut ShakmatyEngine, from: u8, to: u8) {
        let mv = Move::new(Square::new(from).unwrap(), Square::new(to).unwrap());
        engine.push(mv).unwrap();
    }

    #[test]
    fn test_start_is_ongoing() {
        let outcome = evaluate(&ShakmatyEngine::new());
        assert_eq!(outcome, GameOutcome::Ongoing);
        assert!(!outcome.is_over());
        assert_eq!(outcome.banner_text(), None);
    }

    #[test]
    fn test_fools_mate() {
        let mut engine = ShakmatyEngine::new();
        play(&mut engine, 13, 21); // f3
        play(&mut engine, 52, 36); // e5
        play(&mut engine, 14, 30); // g4
        play(&mut engine, 59, 31); // Qh4#

        let outcome = evaluate(&engine);
        assert_eq!(
            outcome,
            GameOutcome::Checkmate {
                winner: Color::Black
            }
        );
        assert_eq!(outcome.banner_text().as_deref(), Some("Black wins"));
    }

    #[test]
    fn test_draw_reasons() {
        let stalemate = ShakmatyEngine::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(
            evaluate(&stalemate),
            GameOutcome::Draw(DrawReason::Stalemate)
        );

        let kings = ShakmatyEngine::from_fen("7k/8/8/8/8/8/8/K7 w - - 0 1").unwrap();
        assert_eq!(
            evaluate(&kings),
            GameOutcome::Draw(DrawReason::InsufficientMaterial)
        );

        let mut quiet = ShakmatyEngine::from_fen("7k/8/8/8/8/8/8/R6K w - - 149 80").unwrap();
        play(&mut quiet, 0, 8);
        assert_eq!(
            evaluate(&quiet),
            GameOutcome::Draw(DrawReason::SeventyFiveMove)
        );
    }

    #[test]
    fn test_fivefold_repetition_is_draw() {
        let mut engine = ShakmatyEngine::new();
        for _ in 0..4 {
            play(&mut engine, 6, 21);
            play(&mut engine, 62, 45);
            play(&mut engine, 21, 6);
            play(&mut engine, 45, 62);
        }
        assert_eq!(
            evaluate(&engine),
            GameOutcome::Draw(DrawReason::FivefoldRepetition)
        );
    }

    #[test]
    fn test_every_draw_shares_one_banner() {
        for reason in [
            DrawReason::Stalemate,
            DrawReason::InsufficientMaterial,
            DrawReason::SeventyFiveMove,
            DrawReason::FivefoldRepetition,
        ] {
            assert_eq!(
                GameOutcome::Draw(reason).banner_text().as_deref(),
                Some("Draw")
            );
        }
        assert_eq!(
            GameOutcome::Checkmate {
                winner: Color::White
            }
            .banner_text()
            .as_deref(),
            Some("White wins")
        );
    }
}
