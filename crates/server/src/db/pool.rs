use sqlx::postgres::{PgPool, PgPoolOptions};

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Run the full Postgres schema migration inline.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Analysed users and their last-seen Lichess game counts
CREATE TABLE IF NOT EXISTS users (
    username     TEXT PRIMARY KEY,
    rated_games  BIGINT NOT NULL DEFAULT 0,
    casual_games BIGINT NOT NULL DEFAULT 0,
    analyzed_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_users_username_lower
    ON users (LOWER(username));

-- Cumulative accepted/declined counts per game type ('rated', 'casual')
CREATE TABLE IF NOT EXISTS user_stats (
    username  TEXT NOT NULL REFERENCES users(username) ON DELETE CASCADE,
    game_type TEXT NOT NULL,
    accepted  BIGINT NOT NULL DEFAULT 0,
    declined  BIGINT NOT NULL DEFAULT 0,
    PRIMARY KEY (username, game_type)
);

-- One row per en passant opportunity, deduplicated by position URL
CREATE TABLE IF NOT EXISTS user_urls (
    id        BIGSERIAL PRIMARY KEY,
    username  TEXT NOT NULL REFERENCES users(username) ON DELETE CASCADE,
    opponent  TEXT NOT NULL,
    game_type TEXT NOT NULL,
    accepted  BOOLEAN NOT NULL,
    url       TEXT NOT NULL UNIQUE
);

CREATE INDEX IF NOT EXISTS idx_user_urls_lookup
    ON user_urls (username, game_type, accepted);
"#;
