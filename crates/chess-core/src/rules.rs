//! Rules engine capability used to replay games.
//!
//! The analysis crate only talks to [`RulesEngine`]; [`ShakmatyEngine`] is the
//! production implementation and supports every Lichess variant.

use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::variant::VariantPosition;
use shakmaty::{CastlingMode, Color, EnPassantMode, Move, Position};

use crate::game_data::GameRecord;
use crate::pgn::{self, PgnError};
use crate::variant::Variant;

#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("unreadable move '{0}'")]
    InvalidSan(String),

    #[error("move '{0}' cannot be played in this position")]
    IllegalMove(String),
}

pub trait RulesEngine {
    type Board: Clone;
    type Move;

    fn parse_game(&self, pgn: &str) -> Result<GameRecord, PgnError> {
        pgn::parse_pgn(pgn)
    }

    /// Default layout of a variant (standard layout for most of them).
    fn initial_position_for(&self, variant: Variant) -> Self::Board;

    /// Position from an explicit `FEN` tag.
    fn position_from_fen(&self, variant: Variant, fen: &str) -> Result<Self::Board, RulesError>;

    /// Resolve a SAN move against the current board.
    fn parse_move(&self, board: &Self::Board, san: &str) -> Result<Self::Move, RulesError>;

    fn apply_move(&self, board: &mut Self::Board, mv: Self::Move) -> Result<(), RulesError>;

    /// En passant target square of the position, only when a capture onto it is legal.
    fn en_passant_target(&self, board: &Self::Board) -> Option<String>;

    fn is_en_passant_capture(&self, board: &Self::Board, mv: &Self::Move) -> bool;

    fn side_to_move(&self, board: &Self::Board) -> Color;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShakmatyEngine;

impl RulesEngine for ShakmatyEngine {
    type Board = VariantPosition;
    type Move = Move;

    fn initial_position_for(&self, variant: Variant) -> VariantPosition {
        VariantPosition::new(variant.into())
    }

    fn position_from_fen(&self, variant: Variant, fen: &str) -> Result<VariantPosition, RulesError> {
        let invalid = |reason: String| RulesError::InvalidFen {
            fen: fen.to_string(),
            reason,
        };
        let parsed: Fen = fen.parse().map_err(|e| invalid(format!("{e}")))?;
        let mode = match variant {
            Variant::Chess960 => CastlingMode::Chess960,
            _ => CastlingMode::Standard,
        };
        VariantPosition::from_setup(variant.into(), parsed.into_setup(), mode)
            .map_err(|e| invalid(format!("{e}")))
    }

    fn parse_move(&self, board: &VariantPosition, san: &str) -> Result<Move, RulesError> {
        let san_plus: SanPlus = san
            .parse()
            .map_err(|_| RulesError::InvalidSan(san.to_string()))?;
        san_plus
            .san
            .to_move(board)
            .map_err(|_| RulesError::IllegalMove(san.to_string()))
    }

    fn apply_move(&self, board: &mut VariantPosition, mv: Move) -> Result<(), RulesError> {
        let label = mv.to_string();
        let next = board
            .clone()
            .play(mv)
            .map_err(|_| RulesError::IllegalMove(label))?;
        *board = next;
        Ok(())
    }

    fn en_passant_target(&self, board: &VariantPosition) -> Option<String> {
        board.ep_square(EnPassantMode::Legal).map(|sq| sq.to_string())
    }

    fn is_en_passant_capture(&self, _board: &VariantPosition, mv: &Move) -> bool {
        mv.is_en_passant()
    }

    fn side_to_move(&self, board: &VariantPosition) -> Color {
        board.turn()
    }
}
