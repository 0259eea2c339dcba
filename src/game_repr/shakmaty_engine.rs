//! [`RulesEngine`] backed by the `shakmaty` move generator.

use super::engine::{EngineError, RulesEngine};
use super::{Color, Move, Piece, PieceKind, Square};
use shakmaty as sm;
use std::collections::HashMap;

/// Halfmove clock value at which the seventy-five-move rule ends the game.
const SEVENTY_FIVE_MOVE_HALFMOVES: u32 = 150;

/// Occurrences of one position that end the game by repetition.
const FIVEFOLD: u32 = 5;

/// Standard chess rules on top of [`shakmaty::Chess`].
///
/// Besides the position itself this keeps what the position alone cannot
/// answer: how many moves were played and how often every position occurred.
#[derive(Clone)]
pub struct ShakmatyEngine {
    chess: sm::Chess,
    history: Vec<Move>,
    /// Occurrence count per Zobrist hash, including the starting position.
    seen: HashMap<u64, u32>,
}

impl Default for ShakmatyEngine {
    fn default() -> Self {
        Self::from_chess(sm::Chess::default())
    }
}

impl ShakmatyEngine {
    /// Engine at the standard starting position.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine at the position described by a FEN string.
    ///
    /// # Errors
    ///
    /// * [`EngineError::InvalidFen`] if the string does not parse
    /// * [`EngineError::IllegalPosition`] if it parses but cannot occur in standard chess
    pub fn from_fen(fen: &str) -> Result<Self, EngineError> {
        let parsed: sm::fen::Fen = fen.parse().map_err(|e: sm::fen::ParseFenError| {
            EngineError::InvalidFen {
                fen: fen.to_string(),
                reason: e.to_string(),
            }
        })?;

        let chess: sm::Chess = parsed
            .0
            .position(sm::CastlingMode::Standard)
            .map_err(|e| EngineError::IllegalPosition {
                fen: fen.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self::from_chess(chess))
    }

    fn from_chess(chess: sm::Chess) -> Self {
        let mut seen = HashMap::new();
        seen.insert(zobrist(&chess), 1);

        Self {
            chess,
            history: Vec::new(),
            seen,
        }
    }

    /// Moves pushed so far, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// How many times the current position has occurred.
    pub fn repetitions(&self) -> u32 {
        self.seen.get(&zobrist(&self.chess)).copied().unwrap_or(0)
    }

    /// Halfmoves since the last capture or pawn advance.
    pub fn halfmoves(&self) -> u32 {
        sm::Position::halfmoves(&self.chess)
    }
}

impl RulesEngine for ShakmatyEngine {
    fn piece_at(&self, square: Square) -> Option<Piece> {
        sm::Position::board(&self.chess)
            .piece_at(square.into())
            .map(Into::into)
    }

    fn side_to_move(&self) -> Color {
        sm::Position::turn(&self.chess).into()
    }

    fn legal_moves(&self) -> Vec<Move> {
        sm::Position::legal_moves(&self.chess)
            .iter()
            .filter_map(|m| from_uci(sm::uci::Uci::from_standard(m)))
            .collect()
    }

    fn push(&mut self, mv: Move) -> Result<(), EngineError> {
        let uci = sm::uci::Uci::Normal {
            from: mv.from.into(),
            to: mv.to.into(),
            promotion: mv.promotion.map(Into::into),
        };

        match uci.to_move(&self.chess) {
            Ok(m) if sm::Position::is_legal(&self.chess, &m) => {
                sm::Position::play_unchecked(&mut self.chess, &m);
                self.history.push(mv);
                *self.seen.entry(zobrist(&self.chess)).or_insert(0) += 1;
                Ok(())
            }
            _ => Err(EngineError::IllegalMove(mv)),
        }
    }

    fn move_count(&self) -> usize {
        self.history.len()
    }

    fn is_checkmate(&self) -> bool {
        sm::Position::is_checkmate(&self.chess)
    }

    fn is_stalemate(&self) -> bool {
        sm::Position::is_stalemate(&self.chess)
    }

    fn is_insufficient_material(&self) -> bool {
        sm::Position::is_insufficient_material(&self.chess)
    }

    fn is_seventyfive_moves(&self) -> bool {
        self.halfmoves() >= SEVENTY_FIVE_MOVE_HALFMOVES
    }

    fn is_fivefold_repetition(&self) -> bool {
        self.repetitions() >= FIVEFOLD
    }
}

fn zobrist(chess: &sm::Chess) -> u64 {
    sm::zobrist::ZobristHash::zobrist_hash::<u64>(chess)
}

fn from_uci(uci: sm::uci::Uci) -> Option<Move> {
    match uci {
        sm::uci::Uci::Normal {
            from,
            to,
            promotion,
        } => Some(Move {
            from: from_sm_square(from)?,
            to: from_sm_square(to)?,
            promotion: promotion.map(Into::into),
        }),
        _ => None,
    }
}

fn from_sm_square(square: sm::Square) -> Option<Square> {
    Square::new(u32::from(square) as u8)
}

#[doc(hidden)]
impl From<Square> for sm::Square {
    fn from(square: Square) -> Self {
        sm::Square::new(u32::from(square.index()))
    }
}

#[doc(hidden)]
impl From<sm::Color> for Color {
    fn from(c: sm::Color) -> Self {
        match c {
            sm::Color::White => Color::White,
            sm::Color::Black => Color::Black,
        }
    }
}

#[doc(hidden)]
impl From<sm::Role> for PieceKind {
    fn from(r: sm::Role) -> Self {
        match r {
            sm::Role::Pawn => PieceKind::Pawn,
            sm::Role::Knight => PieceKind::Knight,
            sm::Role::Bishop => PieceKind::Bishop,
            sm::Role::Rook => PieceKind::Rook,
            sm::Role::Queen => PieceKind::Queen,
            sm::Role::King => PieceKind::King,
        }
    }
}

#[doc(hidden)]
impl From<PieceKind> for sm::Role {
    fn from(kind: PieceKind) -> Self {
        match kind {
            PieceKind::Pawn => sm::Role::Pawn,
            PieceKind::Knight => sm::Role::Knight,
            PieceKind::Bishop => sm::Role::Bishop,
            PieceKind::Rook => sm::Role::Rook,
            PieceKind::Queen => sm::Role::Queen,
            PieceKind::King => sm::Role::King,
        }
    }
}

#[doc(hidden)]
impl From<sm::Piece> for Piece {
    fn from(p: sm::Piece) -> Self {
        Piece::new(p.role.into(), p.color.into())
    }
}
