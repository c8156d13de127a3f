use std::sync::LazyLock;

use axum::{extract::Path, Extension, Json};
use en_passant::ResultsSummary;
use regex::Regex;
use serde::Serialize;

use crate::analysis::{analyse_user, UserLocks};
use crate::clients::lichess::LichessClient;
use crate::db::store::PgStore;
use crate::db::StatsStore;
use crate::error::AppError;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{2,30}$").expect("valid username regex"));

fn validate_username(raw: &str) -> Result<&str, AppError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(AppError::BadRequest("Username cannot be blank".into()));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(AppError::BadRequest(format!("Invalid Lichess username: {username}")));
    }
    Ok(username)
}

/// GET /api/results/{username}
pub async fn get_results(
    Extension(store): Extension<PgStore>,
    Extension(lichess): Extension<LichessClient>,
    Extension(locks): Extension<UserLocks>,
    Path(username): Path<String>,
) -> Result<Json<ResultsSummary>, AppError> {
    let username = validate_username(&username)?;
    let summary = analyse_user(&lichess, &store, &locks, username).await?;
    Ok(Json(summary))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredStatsResponse {
    #[serde(flatten)]
    pub summary: ResultsSummary,
    pub analyzed_at: Option<String>,
}

/// GET /api/users/{username}/stats
pub async fn get_stored_stats(
    Extension(store): Extension<PgStore>,
    Path(username): Path<String>,
) -> Result<Json<StoredStatsResponse>, AppError> {
    let username = validate_username(&username)?;

    let record = store
        .load_user(username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No statistics stored for {username}")))?;
    let analyzed_at = store.analyzed_at(&record.username).await?;

    Ok(Json(StoredStatsResponse {
        summary: record.summary(),
        analyzed_at: analyzed_at.map(|t| t.to_rfc3339()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert_eq!(validate_username(" DrNykterstein ").unwrap(), "DrNykterstein");
        assert_eq!(validate_username("a-b_c").unwrap(), "a-b_c");
        assert!(matches!(validate_username("   "), Err(AppError::BadRequest(m)) if m == "Username cannot be blank"));
        assert!(validate_username("x").is_err());
        assert!(validate_username("bad/name").is_err());
        assert!(validate_username(&"a".repeat(31)).is_err());
    }
}
