//! Cross-user rankings, computed from persisted per-user totals.

use serde::Serialize;

use crate::stats::percentage;

/// Per-user totals across both game categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserTotals {
    pub username: String,
    pub total_games: i64,
    pub accepted: i64,
    pub declined: i64,
}

impl UserTotals {
    pub fn opportunities(&self) -> i64 {
        self.accepted + self.declined
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentageEntry {
    pub username: String,
    pub opportunities: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclinedEntry {
    pub username: String,
    pub total_games: i64,
    pub total_declined: i64,
}

/// Users with at least one opportunity, lowest acceptance rate first.
pub fn percentage_leaderboard(rows: &[UserTotals]) -> Vec<PercentageEntry> {
    let mut entries: Vec<PercentageEntry> = rows
        .iter()
        .filter(|r| r.opportunities() > 0)
        .map(|r| PercentageEntry {
            username: r.username.clone(),
            opportunities: r.opportunities(),
            percentage: percentage(r.accepted, r.opportunities()),
        })
        .collect();

    entries.sort_by(|a, b| {
        a.percentage
            .total_cmp(&b.percentage)
            .then_with(|| a.username.cmp(&b.username))
    });
    entries
}

/// All users, most declined en passants first.
pub fn declined_leaderboard(rows: &[UserTotals]) -> Vec<DeclinedEntry> {
    let mut entries: Vec<DeclinedEntry> = rows
        .iter()
        .map(|r| DeclinedEntry {
            username: r.username.clone(),
            total_games: r.total_games,
            total_declined: r.declined,
        })
        .collect();

    entries.sort_by(|a, b| {
        b.total_declined
            .cmp(&a.total_declined)
            .then_with(|| a.username.cmp(&b.username))
    });
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(username: &str, total_games: i64, accepted: i64, declined: i64) -> UserTotals {
        UserTotals {
            username: username.to_string(),
            total_games,
            accepted,
            declined,
        }
    }

    #[test]
    fn test_percentage_leaderboard() {
        let rows = vec![
            totals("carol", 50, 1, 1),
            totals("nobody", 10, 0, 0),
            totals("alice", 100, 9, 1),
            totals("bob", 20, 0, 3),
        ];
        let board = percentage_leaderboard(&rows);

        let names: Vec<&str> = board.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, vec!["bob", "carol", "alice"]);
        assert_eq!(board[0].percentage, 0.0);
        assert_eq!(board[1].opportunities, 2);
        assert_eq!(board[2].percentage, 90.0);
    }

    #[test]
    fn test_declined_leaderboard() {
        let rows = vec![
            totals("alice", 100, 9, 1),
            totals("nobody", 10, 0, 0),
            totals("bob", 20, 0, 3),
            totals("aaron", 5, 2, 3),
        ];
        let board = declined_leaderboard(&rows);

        let names: Vec<&str> = board.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, vec!["aaron", "bob", "alice", "nobody"]);
        assert_eq!(board[1].total_games, 20);
        assert_eq!(board[3].total_declined, 0);
    }
}
