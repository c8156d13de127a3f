//! Per-game en passant opportunity scanner.
//!
//! Replays a game halfmove by halfmove. Whenever the move just played leaves a
//! capturable en passant target and the tracked player is the one to move, the
//! opportunity is held open until their reply decides it: an en passant capture
//! accepts it, anything else (including the game ending) declines it.

use chess_core::game_data::{GameHeaders, GameRecord};
use chess_core::rules::{RulesEngine, RulesError};
use shakmaty::Color;

use crate::opportunity::{position_ref, Decision, Opportunity};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("{player} is not a player in this game ({white} vs {black})")]
    PlayerNotInGame {
        player: String,
        white: String,
        black: String,
    },

    #[error("cannot set up starting position: {0}")]
    InvalidStartingPosition(#[source] RulesError),
}

/// Result of scanning one game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameScan {
    pub opportunities: Vec<Opportunity>,
    /// Halfmove the engine could not play; replay stopped there.
    pub stopped_at: Option<usize>,
}

struct Pending {
    halfmove: usize,
    position_ref: String,
}

/// State machine fed one halfmove at a time.
struct OpportunityTracker<'a> {
    site: &'a str,
    opponent: &'a str,
    color: Color,
    pending: Option<Pending>,
    found: Vec<Opportunity>,
}

impl<'a> OpportunityTracker<'a> {
    fn new(site: &'a str, opponent: &'a str, color: Color) -> Self {
        Self {
            site,
            opponent,
            color,
            pending: None,
            found: Vec::new(),
        }
    }

    fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Decide the open opportunity with the move about to be played.
    fn resolve(&mut self, is_en_passant: bool) {
        if let Some(pending) = self.pending.take() {
            let decision = if is_en_passant {
                Decision::Accepted
            } else {
                Decision::Declined
            };
            self.record(pending, decision);
        }
    }

    /// Look at the position left by `halfmove`.
    fn observe(&mut self, halfmove: usize, ep_target: Option<String>, to_move: Color) {
        if ep_target.is_none() || to_move != self.color {
            return;
        }
        self.pending = Some(Pending {
            halfmove,
            position_ref: position_ref(self.site, self.color, halfmove),
        });
    }

    fn finish(mut self) -> Vec<Opportunity> {
        // The tracked player never got to reply
        if let Some(pending) = self.pending.take() {
            self.record(pending, Decision::Declined);
        }
        self.found
    }

    fn record(&mut self, pending: Pending, decision: Decision) {
        self.found.push(Opportunity {
            halfmove: pending.halfmove,
            decision,
            position_ref: pending.position_ref,
            opponent: self.opponent.to_string(),
        });
    }
}

fn player_side<'h>(headers: &'h GameHeaders, player: &str) -> Result<(Color, &'h str), ScanError> {
    if player == headers.white {
        Ok((Color::White, headers.black.as_str()))
    } else if player == headers.black {
        Ok((Color::Black, headers.white.as_str()))
    } else {
        Err(ScanError::PlayerNotInGame {
            player: player.to_string(),
            white: headers.white.clone(),
            black: headers.black.clone(),
        })
    }
}

fn starting_position<E: RulesEngine>(engine: &E, headers: &GameHeaders) -> Result<E::Board, ScanError> {
    match headers.starting_fen.as_deref() {
        Some(fen) => engine
            .position_from_fen(headers.variant, fen)
            .map_err(ScanError::InvalidStartingPosition),
        None => Ok(engine.initial_position_for(headers.variant)),
    }
}

/// Find every en passant opportunity `player` had in `game`, in halfmove order.
pub fn scan<E: RulesEngine>(engine: &E, game: &GameRecord, player: &str) -> Result<GameScan, ScanError> {
    let headers = &game.headers;
    let (color, opponent) = player_side(headers, player)?;
    let mut board = starting_position(engine, headers)?;
    let mut tracker = OpportunityTracker::new(&headers.site, opponent, color);
    let mut stopped_at = None;

    for (idx, san) in game.moves.iter().enumerate() {
        let halfmove = idx + 1;

        let mv = match engine.parse_move(&board, san) {
            Ok(mv) => mv,
            Err(e) => {
                tracing::debug!(site = %headers.site, halfmove, "replay stopped: {e}");
                stopped_at = Some(halfmove);
                break;
            }
        };

        if tracker.is_pending() {
            tracker.resolve(engine.is_en_passant_capture(&board, &mv));
        }

        if let Err(e) = engine.apply_move(&mut board, mv) {
            tracing::debug!(site = %headers.site, halfmove, "replay stopped: {e}");
            stopped_at = Some(halfmove);
            break;
        }

        tracker.observe(
            halfmove,
            engine.en_passant_target(&board),
            engine.side_to_move(&board),
        );
    }

    Ok(GameScan {
        opportunities: tracker.finish(),
        stopped_at,
    })
}
