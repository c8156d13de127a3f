//! Chess primitives shared by the analysis and server crates.

pub mod game_data;
pub mod pgn;
pub mod rules;
pub mod variant;
