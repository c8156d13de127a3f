use std::time::Duration;

use chess_core::game_data::GameRecord;
use chess_core::pgn;
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use super::GameSource;

#[derive(Debug, thiserror::Error)]
pub enum LichessError {
    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("{0} Lichess server error")]
    Server(u16),

    #[error("{status} Failed to retrieve games for '{username}'")]
    Api { status: u16, username: String },

    #[error("Lichess sent nothing for {0}s")]
    Stalled(u64),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}

impl LichessError {
    fn from_status(username: &str, status: StatusCode) -> Self {
        if status == StatusCode::NOT_FOUND {
            LichessError::UserNotFound(username.to_string())
        } else if status.is_server_error() {
            LichessError::Server(status.as_u16())
        } else {
            LichessError::Api {
                status: status.as_u16(),
                username: username.to_string(),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LichessUser {
    /// Username with Lichess' canonical capitalisation.
    pub username: String,
    pub rated: i64,
    pub casual: i64,
}

#[derive(Deserialize)]
struct UserResponse {
    username: String,
    count: Option<GameCounts>,
}

#[derive(Deserialize)]
struct GameCounts {
    all: i64,
    rated: i64,
}

#[derive(Clone)]
pub struct LichessClient {
    client: Client,
    base_url: String,
    /// Whole-request limit for user lookups, idle limit for game exports.
    timeout: Duration,
}

impl LichessClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LichessError> {
        let client = Client::builder()
            .user_agent("EnPassantStats/1.0")
            .connect_timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn stalled(&self) -> LichessError {
        LichessError::Stalled(self.timeout.as_secs())
    }
}

impl GameSource for LichessClient {
    async fn fetch_user(&self, username: &str) -> Result<LichessUser, LichessError> {
        let url = format!("{}/api/user/{}", self.base_url, username);

        let resp = self.client.get(&url).timeout(self.timeout).send().await?;
        if !resp.status().is_success() {
            return Err(LichessError::from_status(username, resp.status()));
        }

        let body: UserResponse = resp.json().await?;
        // Closed and unknown accounts can still answer 200, just without counts
        let count = body
            .count
            .ok_or_else(|| LichessError::UserNotFound(username.to_string()))?;

        Ok(LichessUser {
            username: body.username,
            rated: count.rated,
            casual: count.all - count.rated,
        })
    }

    async fn fetch_games(
        &self,
        username: &str,
        rated: bool,
        max: Option<usize>,
    ) -> Result<Vec<GameRecord>, LichessError> {
        let url = format!("{}/api/games/user/{}", self.base_url, username);

        let mut params = vec![
            ("pgnInJson", "true".to_string()),
            ("rated", rated.to_string()),
        ];
        if let Some(max) = max {
            params.push(("max", max.to_string()));
        }

        let request = self
            .client
            .get(&url)
            .query(&params)
            .header("Accept", "application/x-ndjson")
            .send();
        let resp = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| self.stalled())??;

        if !resp.status().is_success() {
            return Err(LichessError::from_status(username, resp.status()));
        }

        // Long histories take minutes to export, so only a silent stream is an error
        let mut body = resp.bytes_stream();
        let mut lines = NdjsonLines::default();
        let mut games = Vec::new();
        loop {
            let chunk = match tokio::time::timeout(self.timeout, body.next()).await {
                Ok(Some(chunk)) => chunk?,
                Ok(None) => break,
                Err(_) => return Err(self.stalled()),
            };
            games.extend(lines.push(&chunk).iter().filter_map(|l| parse_game_line(l)));
        }
        games.extend(lines.finish().as_deref().and_then(parse_game_line));
        // Lichess streams newest first
        games.reverse();

        tracing::info!(
            username,
            rated,
            count = games.len(),
            "Fetched games from Lichess"
        );
        Ok(games)
    }
}

/// Splits an NDJSON byte stream into lines, whatever the chunk boundaries.
#[derive(Default)]
struct NdjsonLines {
    buf: Vec<u8>,
}

impl NdjsonLines {
    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Trailing line without a newline, if any.
    fn finish(self) -> Option<String> {
        (!self.buf.is_empty()).then(|| String::from_utf8_lossy(&self.buf).into_owned())
    }
}

/// One exported game; `None` for blank or unreadable lines.
fn parse_game_line(line: &str) -> Option<GameRecord> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let game_data = match serde_json::from_str::<Value>(line) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("Failed to parse Lichess game JSON: {e}");
            return None;
        }
    };

    let pgn_text = game_data.get("pgn").and_then(|v| v.as_str())?;

    match pgn::parse_pgn(pgn_text) {
        Ok(game) => Some(game),
        Err(e) => {
            let id = game_data.get("id").and_then(|v| v.as_str()).unwrap_or("?");
            tracing::warn!(game_id = id, "Failed to parse game PGN: {e}");
            None
        }
    }
}
