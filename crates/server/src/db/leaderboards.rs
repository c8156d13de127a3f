use en_passant::leaderboard::UserTotals;
use sqlx::PgConnection;

use crate::error::AppError;

/// Totals across both game types for every analysed user.
pub async fn get_user_totals(conn: &mut PgConnection) -> Result<Vec<UserTotals>, AppError> {
    let rows: Vec<(String, i64, i64, i64)> = sqlx::query_as(
        "SELECT u.username,
                (u.rated_games + u.casual_games) AS total_games,
                COALESCE(SUM(s.accepted), 0)::BIGINT AS accepted,
                COALESCE(SUM(s.declined), 0)::BIGINT AS declined
         FROM users u
         LEFT JOIN user_stats s ON s.username = u.username
         GROUP BY u.username, u.rated_games, u.casual_games",
    )
    .fetch_all(conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(username, total_games, accepted, declined)| UserTotals {
            username,
            total_games,
            accepted,
            declined,
        })
        .collect())
}
