//! Per-user statistics queries. Reads match usernames case-insensitively;
//! writes always use the canonical Lichess capitalisation.

use chrono::{DateTime, Utc};
use en_passant::{Decision, GameCategory, PositionRef};
use sqlx::PgConnection;

use crate::error::AppError;

/// Stored capitalisation of a username, if the user has been analysed before.
pub async fn canonical_username(
    conn: &mut PgConnection,
    username: &str,
) -> Result<Option<String>, AppError> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT username FROM users WHERE LOWER(username) = LOWER($1)")
            .bind(username)
            .fetch_optional(conn)
            .await?;
    Ok(row.map(|r| r.0))
}

pub async fn user_exists(conn: &mut PgConnection, username: &str) -> Result<bool, AppError> {
    Ok(canonical_username(conn, username).await?.is_some())
}

/// Last-seen (rated, casual) game counts.
pub async fn get_game_counts(
    conn: &mut PgConnection,
    username: &str,
) -> Result<(i64, i64), AppError> {
    let row: (i64, i64) = sqlx::query_as(
        "SELECT rated_games, casual_games FROM users WHERE LOWER(username) = LOWER($1)",
    )
    .bind(username)
    .fetch_one(conn)
    .await?;
    Ok(row)
}

/// Cumulative (accepted, declined) counts; zero when nothing was stored yet.
pub async fn get_category_stats(
    conn: &mut PgConnection,
    username: &str,
    category: GameCategory,
) -> Result<(i64, i64), AppError> {
    let row: Option<(i64, i64)> = sqlx::query_as(
        "SELECT accepted, declined FROM user_stats
         WHERE LOWER(username) = LOWER($1) AND game_type = $2",
    )
    .bind(username)
    .bind(category.as_str())
    .fetch_optional(conn)
    .await?;
    Ok(row.unwrap_or((0, 0)))
}

pub async fn get_reference_list(
    conn: &mut PgConnection,
    username: &str,
    category: GameCategory,
    decision: Decision,
) -> Result<Vec<PositionRef>, AppError> {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT url, opponent FROM user_urls
         WHERE LOWER(username) = LOWER($1) AND game_type = $2 AND accepted = $3
         ORDER BY id",
    )
    .bind(username)
    .bind(category.as_str())
    .bind(decision.is_accepted())
    .fetch_all(conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(url, opponent)| PositionRef { url, opponent })
        .collect())
}

pub async fn get_analyzed_at(
    conn: &mut PgConnection,
    username: &str,
) -> Result<Option<DateTime<Utc>>, AppError> {
    let row: Option<(DateTime<Utc>,)> =
        sqlx::query_as("SELECT analyzed_at FROM users WHERE LOWER(username) = LOWER($1)")
            .bind(username)
            .fetch_optional(conn)
            .await?;
    Ok(row.map(|r| r.0))
}

/// Insert or overwrite the user's game counts and stamp the analysis time.
pub async fn upsert_game_counts(
    conn: &mut PgConnection,
    username: &str,
    rated_games: i64,
    casual_games: i64,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO users (username, rated_games, casual_games, analyzed_at)
         VALUES ($1, $2, $3, NOW())
         ON CONFLICT (username) DO UPDATE SET
            rated_games = EXCLUDED.rated_games,
            casual_games = EXCLUDED.casual_games,
            analyzed_at = NOW()",
    )
    .bind(username)
    .bind(rated_games)
    .bind(casual_games)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn upsert_category_stats(
    conn: &mut PgConnection,
    username: &str,
    category: GameCategory,
    accepted: i64,
    declined: i64,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO user_stats (username, game_type, accepted, declined)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (username, game_type) DO UPDATE SET
            accepted = EXCLUDED.accepted,
            declined = EXCLUDED.declined",
    )
    .bind(username)
    .bind(category.as_str())
    .bind(accepted)
    .bind(declined)
    .execute(conn)
    .await?;
    Ok(())
}

/// Record an opportunity. A URL that is already stored is left untouched.
/// Returns whether a row was written.
pub async fn insert_reference_if_absent(
    conn: &mut PgConnection,
    username: &str,
    opponent: &str,
    category: GameCategory,
    decision: Decision,
    url: &str,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        "INSERT INTO user_urls (username, opponent, game_type, accepted, url)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (url) DO NOTHING",
    )
    .bind(username)
    .bind(opponent)
    .bind(category.as_str())
    .bind(decision.is_accepted())
    .bind(url)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() == 1)
}
