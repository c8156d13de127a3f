use axum::{Extension, Json};
use en_passant::leaderboard::{declined_leaderboard, percentage_leaderboard, DeclinedEntry, PercentageEntry};
use serde::Serialize;

use crate::db::store::PgStore;
use crate::db::StatsStore;
use crate::error::AppError;

#[derive(Serialize)]
pub struct LeaderboardsResponse {
    pub percentage: Vec<PercentageEntry>,
    pub declined: Vec<DeclinedEntry>,
}

/// GET /api/leaderboards
pub async fn get_leaderboards(
    Extension(store): Extension<PgStore>,
) -> Result<Json<LeaderboardsResponse>, AppError> {
    let totals = store.user_totals().await?;

    Ok(Json(LeaderboardsResponse {
        percentage: percentage_leaderboard(&totals),
        declined: declined_leaderboard(&totals),
    }))
}
