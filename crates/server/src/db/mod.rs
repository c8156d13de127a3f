pub mod leaderboards;
pub mod pool;
pub mod store;
pub mod users;

use std::future::Future;

use en_passant::leaderboard::UserTotals;
use en_passant::{FreshReference, UserRecord};

use crate::error::AppError;

/// Persistence of per-user en passant statistics.
pub trait StatsStore {
    fn load_user(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<UserRecord>, AppError>> + Send;

    /// Persist counters and game counts, and add `fresh` references that are
    /// not stored yet. Either everything is written or nothing is.
    fn save_user(
        &self,
        record: &UserRecord,
        fresh: &[FreshReference],
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    fn user_totals(&self) -> impl Future<Output = Result<Vec<UserTotals>, AppError>> + Send;
}
