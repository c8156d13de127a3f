/// Incremental merging of new games into stored statistics.

mod common;

use chess_core::rules::ShakmatyEngine;
use common::{game, WHITE_CHANCE};
use en_passant::stats::CategoryStats;
use en_passant::{aggregate, Decision, GameCategory, PositionRef, UserRecord};

fn reference(url: &str) -> PositionRef {
    PositionRef {
        url: url.to_string(),
        opponent: "Bob".to_string(),
    }
}

fn accepted(id: &str) -> chess_core::game_data::GameRecord {
    game(&format!("https://lichess.org/{id}"), "Alice", "Bob", &format!("{WHITE_CHANCE} 3. exd6"))
}

fn declined(id: &str) -> chess_core::game_data::GameRecord {
    game(&format!("https://lichess.org/{id}"), "Alice", "Bob", &format!("{WHITE_CHANCE} 3. Nf3"))
}

/// Rated: 3 accepted, 1 declined over 10 games.
fn existing_record() -> UserRecord {
    UserRecord {
        username: "Alice".into(),
        rated_games: 10,
        casual_games: 2,
        rated: CategoryStats {
            accepted: 3,
            declined: 1,
            accepted_list: vec![
                reference("https://lichess.org/old1/white#4"),
                reference("https://lichess.org/old2/white#4"),
                reference("https://lichess.org/old3/white#4"),
            ],
            declined_list: vec![reference("https://lichess.org/old4/white#4")],
        },
        casual: CategoryStats::default(),
    }
}

#[test]
fn test_new_user() {
    let agg = aggregate(&ShakmatyEngine, None, &[accepted("g1"), declined("g2")], &[], "Alice");

    assert_eq!(agg.record.username, "Alice");
    assert_eq!(agg.summary.rated.games, 2);
    assert_eq!(agg.summary.rated.accepted, 1);
    assert_eq!(agg.summary.rated.declined, 1);
    assert_eq!(agg.summary.rated.percentage, 50.0);
    assert_eq!(agg.summary.casual.games, 0);
    assert_eq!(agg.fresh.len(), 2);
    assert_eq!(agg.skipped_games, 0);
}

#[test]
fn test_merge_adds_to_existing_counts() {
    let agg = aggregate(&ShakmatyEngine, Some(existing_record()), &[accepted("g1")], &[], "Alice");

    assert_eq!(agg.summary.rated.accepted, 4);
    assert_eq!(agg.summary.rated.declined, 1);
    assert_eq!(agg.summary.rated.percentage, 80.0);
    assert_eq!(agg.summary.rated.games, 11);
    assert_eq!(agg.summary.rated.accepted_list.len(), 4);
    assert_eq!(agg.summary.total.games, 13);

    assert_eq!(agg.fresh.len(), 1);
    assert_eq!(agg.fresh[0].category, GameCategory::Rated);
    assert_eq!(agg.fresh[0].decision, Decision::Accepted);
    assert_eq!(agg.fresh[0].reference.url, "https://lichess.org/g1/white#4");
}

#[test]
fn test_empty_batch_changes_nothing() {
    let before = existing_record();
    let agg = aggregate(&ShakmatyEngine, Some(before.clone()), &[], &[], "Alice");

    assert_eq!(agg.record, before);
    assert_eq!(agg.summary, before.summary());
    assert!(agg.fresh.is_empty());
}

#[test]
fn test_categories_are_kept_apart() {
    let agg = aggregate(&ShakmatyEngine, None, &[declined("r1")], &[accepted("c1")], "Alice");

    assert_eq!(agg.summary.rated.declined, 1);
    assert_eq!(agg.summary.rated.accepted, 0);
    assert_eq!(agg.summary.casual.accepted, 1);
    assert_eq!(agg.summary.casual.percentage, 100.0);
    assert_eq!(agg.summary.total.opportunities, 2);
    assert_eq!(agg.summary.total.percentage, 50.0);
}

#[test]
fn test_counts_match_lists() {
    let agg = aggregate(
        &ShakmatyEngine,
        Some(existing_record()),
        &[accepted("g1"), declined("g2"), declined("g3")],
        &[accepted("g4")],
        "Alice",
    );

    for summary in [&agg.summary.rated, &agg.summary.casual] {
        assert_eq!(summary.accepted + summary.declined, summary.opportunities);
        assert_eq!(summary.accepted as usize, summary.accepted_list.len());
        assert_eq!(summary.declined as usize, summary.declined_list.len());
    }
    assert_eq!(
        agg.summary.total.opportunities,
        agg.summary.rated.opportunities + agg.summary.casual.opportunities
    );
}

#[test]
fn test_known_positions_are_not_counted_twice() {
    let first = aggregate(&ShakmatyEngine, None, &[accepted("g1")], &[], "Alice");

    // Same game fed again, and twice within one batch
    let again = aggregate(
        &ShakmatyEngine,
        Some(first.record.clone()),
        &[accepted("g1"), accepted("g2"), accepted("g2")],
        &[],
        "Alice",
    );

    assert_eq!(again.summary.rated.accepted, 2);
    assert_eq!(again.fresh.len(), 1);
    assert_eq!(again.fresh[0].reference.url, "https://lichess.org/g2/white#4");
}

#[test]
fn test_unplayable_game_is_skipped() {
    let stranger = game("https://lichess.org/x1", "Bob", "Carol", "1. e4 e5");
    let agg = aggregate(&ShakmatyEngine, None, &[stranger, accepted("g1")], &[], "Alice");

    assert_eq!(agg.skipped_games, 1);
    assert_eq!(agg.summary.rated.accepted, 1);
    assert_eq!(agg.summary.rated.games, 2);
}
