use super::{PieceKind, Square};
use std::fmt;

/// A move from one square to another, optionally naming the promotion piece.
///
/// Castling is expressed the standard way, as the king's two-square step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    /// The same move, finalized with a promotion piece.
    pub fn with_promotion(self, kind: PieceKind) -> Self {
        Self {
            promotion: Some(kind),
            ..self
        }
    }

    /// Whether both moves travel between the same two squares.
    pub fn same_path(&self, other: &Move) -> bool {
        self.from == other.from && self.to == other.to
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.uci_char())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(index: u8) -> Square {
        Square::new(index).unwrap()
    }

    #[test]
    fn test_display_uci() {
        assert_eq!(Move::new(sq(12), sq(28)).to_string(), "e2e4");
        assert_eq!(
            Move::new(sq(52), sq(60)).with_promotion(PieceKind::Knight).to_string(),
            "e7e8n"
        );
    }

    #[test]
    fn test_same_path_ignores_promotion() {
        let plain = Move::new(sq(52), sq(60));
        let queen = plain.with_promotion(PieceKind::Queen);
        assert!(plain.same_path(&queen));
        assert_ne!(plain, queen);
    }
}
