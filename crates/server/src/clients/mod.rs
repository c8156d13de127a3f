pub mod lichess;

use std::future::Future;

use chess_core::game_data::GameRecord;

use self::lichess::{LichessError, LichessUser};

/// Remote source of a player's game history.
pub trait GameSource {
    /// Canonical username and total rated/casual game counts.
    fn fetch_user(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<LichessUser, LichessError>> + Send;

    /// The `max` most recent games of one ratedness (all when `None`), oldest first.
    fn fetch_games(
        &self,
        username: &str,
        rated: bool,
        max: Option<usize>,
    ) -> impl Future<Output = Result<Vec<GameRecord>, LichessError>> + Send;
}
