//! Fetch → scan → merge → persist for one Lichess user.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chess_core::game_data::GameRecord;
use chess_core::rules::ShakmatyEngine;
use en_passant::{aggregate, ResultsSummary};
use tokio::sync::OwnedMutexGuard;

use crate::clients::lichess::LichessError;
use crate::clients::GameSource;
use crate::db::StatsStore;
use crate::error::AppError;

/// One async lock per username. The merge is read-modify-write, so two
/// analyses of the same user must not overlap.
#[derive(Clone, Default)]
pub struct UserLocks {
    inner: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl UserLocks {
    pub async fn lock(&self, username: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            // Drop locks nobody holds or waits on
            map.retain(|_, l| Arc::strong_count(l) > 1);
            map.entry(username.to_lowercase()).or_default().clone()
        };
        lock.lock_owned().await
    }
}

/// How many of the newest games to fetch, given what was seen last time.
fn new_game_count(stored: i64, upstream: i64) -> Option<usize> {
    (upstream > stored).then(|| (upstream - stored) as usize)
}

async fn fetch_new_games<G: GameSource>(
    source: &G,
    username: &str,
    rated: bool,
    stored: i64,
    upstream: i64,
) -> Result<Vec<GameRecord>, LichessError> {
    match new_game_count(stored, upstream) {
        Some(max) => source.fetch_games(username, rated, Some(max)).await,
        None => Ok(Vec::new()),
    }
}

/// Bring a user's statistics up to date with their Lichess history.
///
/// Upstream failures abort before anything is written.
pub async fn analyse_user<G: GameSource, S: StatsStore>(
    source: &G,
    store: &S,
    locks: &UserLocks,
    username: &str,
) -> Result<ResultsSummary, AppError> {
    let _guard = locks.lock(username).await;

    let upstream = source.fetch_user(username).await?;
    let name = upstream.username.clone();
    let existing = store.load_user(&name).await?;

    let (rated_games, casual_games) = match &existing {
        None => {
            tracing::info!("First analysis for {}, fetching all games", name);
            (
                source.fetch_games(&name, true, None).await?,
                source.fetch_games(&name, false, None).await?,
            )
        }
        Some(record) => (
            fetch_new_games(source, &name, true, record.rated_games, upstream.rated).await?,
            fetch_new_games(source, &name, false, record.casual_games, upstream.casual).await?,
        ),
    };

    let fetched = rated_games.len() + casual_games.len();
    let player = name.clone();
    let mut aggregation = tokio::task::spawn_blocking(move || {
        aggregate(&ShakmatyEngine, existing, &rated_games, &casual_games, &player)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Analysis task failed: {e}")))?;

    // Persist the upstream totals so the next run only fetches what is newer
    aggregation.record.rated_games = upstream.rated;
    aggregation.record.casual_games = upstream.casual;
    store.save_user(&aggregation.record, &aggregation.fresh).await?;

    tracing::info!(
        username = %name,
        fetched,
        new_opportunities = aggregation.fresh.len(),
        skipped = aggregation.skipped_games,
        "Analysis complete"
    );

    Ok(aggregation.summary)
}
