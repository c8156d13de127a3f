//! En passant opportunity detection and lifetime statistics.
//!
//! [`scanner::scan`] replays one game and reports each halfmove where the
//! tracked player could capture en passant, and whether they did.
//! [`stats::aggregate`] folds a batch of new games into a user's previous
//! statistics. [`leaderboard`] ranks users from their persisted totals.

pub mod leaderboard;
pub mod opportunity;
pub mod scanner;
pub mod stats;

pub use opportunity::{Decision, GameCategory, Opportunity, PositionRef};
pub use scanner::{scan, GameScan, ScanError};
pub use stats::{aggregate, Aggregation, FreshReference, ResultsSummary, UserRecord};
