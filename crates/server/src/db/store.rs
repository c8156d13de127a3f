use chrono::{DateTime, Utc};
use en_passant::leaderboard::UserTotals;
use en_passant::{Decision, FreshReference, GameCategory, UserRecord};
use sqlx::PgPool;

use super::{leaderboards, users, StatsStore};
use crate::error::AppError;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn analyzed_at(&self, username: &str) -> Result<Option<DateTime<Utc>>, AppError> {
        let mut conn = self.pool.acquire().await?;
        users::get_analyzed_at(&mut conn, username).await
    }
}

impl StatsStore for PgStore {
    async fn load_user(&self, username: &str) -> Result<Option<UserRecord>, AppError> {
        let mut conn = self.pool.acquire().await?;

        if !users::user_exists(&mut conn, username).await? {
            return Ok(None);
        }
        let canonical = users::canonical_username(&mut conn, username)
            .await?
            .unwrap_or_else(|| username.to_string());

        let (rated_games, casual_games) = users::get_game_counts(&mut conn, &canonical).await?;
        let mut record = UserRecord {
            username: canonical,
            rated_games,
            casual_games,
            ..Default::default()
        };

        for category in GameCategory::ALL {
            let (accepted, declined) =
                users::get_category_stats(&mut conn, &record.username, category).await?;
            let accepted_list =
                users::get_reference_list(&mut conn, &record.username, category, Decision::Accepted)
                    .await?;
            let declined_list =
                users::get_reference_list(&mut conn, &record.username, category, Decision::Declined)
                    .await?;

            let stats = record.category_mut(category);
            stats.accepted = accepted;
            stats.declined = declined;
            stats.accepted_list = accepted_list;
            stats.declined_list = declined_list;
        }

        Ok(Some(record))
    }

    async fn save_user(&self, record: &UserRecord, fresh: &[FreshReference]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        users::upsert_game_counts(&mut tx, &record.username, record.rated_games, record.casual_games)
            .await?;

        for category in GameCategory::ALL {
            let stats = record.category(category);
            users::upsert_category_stats(&mut tx, &record.username, category, stats.accepted, stats.declined)
                .await?;
        }

        let mut inserted = 0usize;
        for f in fresh {
            if users::insert_reference_if_absent(
                &mut tx,
                &record.username,
                &f.reference.opponent,
                f.category,
                f.decision,
                &f.reference.url,
            )
            .await?
            {
                inserted += 1;
            }
        }

        tx.commit().await?;

        tracing::debug!(
            username = %record.username,
            inserted,
            duplicates = fresh.len() - inserted,
            "Saved user statistics"
        );
        Ok(())
    }

    async fn user_totals(&self) -> Result<Vec<UserTotals>, AppError> {
        let mut conn = self.pool.acquire().await?;
        leaderboards::get_user_totals(&mut conn).await
    }
}
