//! Opportunity records produced by the scanner and stored per user.

use serde::{Deserialize, Serialize};
use shakmaty::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accepted,
    Declined,
}

impl Decision {
    pub fn is_accepted(self) -> bool {
        self == Decision::Accepted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameCategory {
    Rated,
    Casual,
}

impl GameCategory {
    pub const ALL: [GameCategory; 2] = [GameCategory::Rated, GameCategory::Casual];

    pub fn as_str(self) -> &'static str {
        match self {
            GameCategory::Rated => "rated",
            GameCategory::Casual => "casual",
        }
    }
}

/// Link to the board as the tracked player saw it, plus who they faced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionRef {
    pub url: String,
    pub opponent: String,
}

/// One halfmove on which the tracked player could capture en passant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opportunity {
    /// 1-based index of the opponent's double step that created the chance.
    pub halfmove: usize,
    pub decision: Decision,
    pub position_ref: String,
    pub opponent: String,
}

impl Opportunity {
    pub fn reference(&self) -> PositionRef {
        PositionRef {
            url: self.position_ref.clone(),
            opponent: self.opponent.clone(),
        }
    }
}

pub(crate) fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}

/// `{site}/{color}#{halfmove}` opens the game at that ply from `color`'s side.
pub(crate) fn position_ref(site: &str, color: Color, halfmove: usize) -> String {
    format!("{}/{}#{}", site, color_name(color), halfmove)
}
