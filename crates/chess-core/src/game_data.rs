use serde::{Deserialize, Serialize};

use crate::variant::Variant;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameHeaders {
    pub event: Option<String>,
    /// Base game URL on Lichess, e.g. `https://lichess.org/abcd1234`.
    pub site: String,
    pub date: Option<String>,
    pub white: String,
    pub black: String,
    pub result: String, // "1-0", "0-1", "1/2-1/2", "*"
    pub variant: Variant,
    /// Explicit `FEN` tag (Chess960, From Position).
    pub starting_fen: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameRecord {
    pub headers: GameHeaders,
    pub moves: Vec<String>, // SAN notation, mainline only
}

impl GameHeaders {
    /// Name of the winning player, `None` for draws and unfinished games.
    pub fn winner(&self) -> Option<&str> {
        match self.result.as_str() {
            "1-0" => Some(&self.white),
            "0-1" => Some(&self.black),
            _ => None,
        }
    }
}
