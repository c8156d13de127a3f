//! Lifetime en passant statistics and the incremental merge of new games.

use std::collections::HashSet;

use chess_core::game_data::GameRecord;
use chess_core::rules::RulesEngine;
use serde::{Deserialize, Serialize};

use crate::opportunity::{Decision, GameCategory, PositionRef};
use crate::scanner::scan;

/// Accepted share as a percentage rounded to 2 decimals; 0 when nothing to divide.
///
/// Exact halves round to even (1/32 is 3.12, not 3.13).
pub fn percentage(numerator: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        return 0.0;
    }
    let raw = numerator as f64 / denominator as f64 * 100.0;
    (raw * 100.0).round_ties_even() / 100.0
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub accepted: i64,
    pub declined: i64,
    pub accepted_list: Vec<PositionRef>,
    pub declined_list: Vec<PositionRef>,
}

impl CategoryStats {
    pub fn opportunities(&self) -> i64 {
        self.accepted + self.declined
    }

    fn add(&mut self, decision: Decision, reference: PositionRef) {
        match decision {
            Decision::Accepted => {
                self.accepted += 1;
                self.accepted_list.push(reference);
            }
            Decision::Declined => {
                self.declined += 1;
                self.declined_list.push(reference);
            }
        }
    }
}

/// Everything persisted for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub username: String,
    pub rated_games: i64,
    pub casual_games: i64,
    pub rated: CategoryStats,
    pub casual: CategoryStats,
}

impl UserRecord {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            ..Default::default()
        }
    }

    pub fn category(&self, category: GameCategory) -> &CategoryStats {
        match category {
            GameCategory::Rated => &self.rated,
            GameCategory::Casual => &self.casual,
        }
    }

    pub fn category_mut(&mut self, category: GameCategory) -> &mut CategoryStats {
        match category {
            GameCategory::Rated => &mut self.rated,
            GameCategory::Casual => &mut self.casual,
        }
    }

    /// Position references already recorded in any list.
    fn known_refs(&self) -> HashSet<String> {
        [&self.rated, &self.casual]
            .into_iter()
            .flat_map(|stats| stats.accepted_list.iter().chain(&stats.declined_list))
            .map(|r| r.url.clone())
            .collect()
    }

    pub fn summary(&self) -> ResultsSummary {
        let accepted = self.rated.accepted + self.casual.accepted;
        let declined = self.rated.declined + self.casual.declined;
        let opportunities = accepted + declined;

        ResultsSummary {
            username: self.username.clone(),
            rated: CategorySummary::new(self.rated_games, &self.rated),
            casual: CategorySummary::new(self.casual_games, &self.casual),
            total: TotalSummary {
                games: self.rated_games + self.casual_games,
                accepted,
                declined,
                opportunities,
                percentage: percentage(accepted, opportunities),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub games: i64,
    pub accepted: i64,
    pub declined: i64,
    pub opportunities: i64,
    pub percentage: f64,
    pub accepted_list: Vec<PositionRef>,
    pub declined_list: Vec<PositionRef>,
}

impl CategorySummary {
    fn new(games: i64, stats: &CategoryStats) -> Self {
        Self {
            games,
            accepted: stats.accepted,
            declined: stats.declined,
            opportunities: stats.opportunities(),
            percentage: percentage(stats.accepted, stats.opportunities()),
            accepted_list: stats.accepted_list.clone(),
            declined_list: stats.declined_list.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalSummary {
    pub games: i64,
    pub accepted: i64,
    pub declined: i64,
    pub opportunities: i64,
    pub percentage: f64,
}

/// Presentation view of a user's statistics. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsSummary {
    pub username: String,
    pub rated: CategorySummary,
    pub casual: CategorySummary,
    pub total: TotalSummary,
}

/// A reference discovered in this run, still to be written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreshReference {
    pub category: GameCategory,
    pub decision: Decision,
    pub reference: PositionRef,
}

#[derive(Debug, Clone)]
pub struct Aggregation {
    pub record: UserRecord,
    pub summary: ResultsSummary,
    pub fresh: Vec<FreshReference>,
    /// Games that could not be scanned at all.
    pub skipped_games: usize,
}

/// Fold newly fetched games into a user's previous statistics.
///
/// Counters are added to, never replaced. An opportunity whose position
/// reference is already on record is not counted a second time, so feeding
/// overlapping batches cannot inflate the totals.
pub fn aggregate<E: RulesEngine>(
    engine: &E,
    existing: Option<UserRecord>,
    rated_games: &[GameRecord],
    casual_games: &[GameRecord],
    player: &str,
) -> Aggregation {
    let mut record = existing.unwrap_or_else(|| UserRecord::new(player));
    let mut known = record.known_refs();
    let mut fresh = Vec::new();
    let mut skipped_games = 0;

    for (category, games) in [
        (GameCategory::Rated, rated_games),
        (GameCategory::Casual, casual_games),
    ] {
        for game in games {
            let game_scan = match scan(engine, game, player) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!(site = %game.headers.site, "skipping game: {e}");
                    skipped_games += 1;
                    continue;
                }
            };

            for opportunity in game_scan.opportunities {
                if !known.insert(opportunity.position_ref.clone()) {
                    continue;
                }
                let reference = opportunity.reference();
                record
                    .category_mut(category)
                    .add(opportunity.decision, reference.clone());
                fresh.push(FreshReference {
                    category,
                    decision: opportunity.decision,
                    reference,
                });
            }
        }
    }

    record.rated_games += rated_games.len() as i64;
    record.casual_games += casual_games.len() as i64;

    tracing::debug!(
        username = %record.username,
        new_games = rated_games.len() + casual_games.len(),
        new_opportunities = fresh.len(),
        skipped_games,
        "aggregated en passant statistics"
    );

    let summary = record.summary();
    Aggregation {
        record,
        summary,
        fresh,
        skipped_games,
    }
}
