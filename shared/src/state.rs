//! Game state machine: score, level, multiplier and token progression.
//!
//! Fields are private; the session mutates them only through
//! [`GameState::add_score`], [`GameState::consume_token`],
//! [`GameState::reset`], [`GameState::record_player_name`] and the
//! terminal [`GameState::finish`]. Everyone else reads a [`GameSnapshot`].

use crate::{MAX_NAME_LEN, MULTIPLIER_STEP, TOKENS_PER_LEVEL};
use log::info;
use serde::{Deserialize, Serialize};

/// Points a single catch is worth before the multiplier, used to turn a
/// score back into a catch count.
const POINTS_PER_CATCH_FOR_TOKENS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenOutcome {
    /// Not enough catches yet for this level's token threshold; nothing changed.
    BelowThreshold,
    Spent { remaining: u32 },
    LevelUp { level: u32 },
}

/// Read-only view handed to renderers and the HUD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub score: f64,
    pub level: u32,
    pub tokens_to_next_level: u32,
    pub multiplier: f64,
    pub entities_needed_per_token: u32,
    pub escaped_count: u32,
    pub is_game_over: bool,
    pub show_level_up: bool,
    pub player_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GameState {
    score: f64,
    level: u32,
    tokens_to_next_level: u32,
    multiplier: f64,
    entities_needed_per_token: u32,
    game_over: bool,
    player_name: Option<String>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            score: 0.0,
            level: 1,
            tokens_to_next_level: TOKENS_PER_LEVEL,
            multiplier: 1.0,
            entities_needed_per_token: 1,
            game_over: false,
            player_name: None,
        }
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Score as submitted to the leaderboard.
    pub fn final_score(&self) -> i64 {
        self.score.floor() as i64
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn tokens_to_next_level(&self) -> u32 {
        self.tokens_to_next_level
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn entities_needed_per_token(&self) -> u32 {
        self.entities_needed_per_token
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn player_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }

    /// Adds `points * multiplier` and returns the amount awarded.
    pub fn add_score(&mut self, points: f64) -> f64 {
        if self.game_over || points <= 0.0 {
            return 0.0;
        }
        let awarded = points * self.multiplier;
        self.score += awarded;
        awarded
    }

    pub fn consume_token(&mut self) -> TokenOutcome {
        if self.game_over {
            return TokenOutcome::BelowThreshold;
        }

        let caught = (self.score / POINTS_PER_CATCH_FOR_TOKENS).floor() as u64;
        if caught < self.entities_needed_per_token as u64 {
            return TokenOutcome::BelowThreshold;
        }

        self.tokens_to_next_level = self.tokens_to_next_level.saturating_sub(1);
        if self.tokens_to_next_level > 0 {
            return TokenOutcome::Spent {
                remaining: self.tokens_to_next_level,
            };
        }

        self.level += 1;
        self.tokens_to_next_level = TOKENS_PER_LEVEL;
        self.multiplier += MULTIPLIER_STEP;
        self.entities_needed_per_token += 1;
        info!(
            "Level up! Now level {} with multiplier x{:.1}",
            self.level, self.multiplier
        );

        TokenOutcome::LevelUp { level: self.level }
    }

    /// Terminal transition into game over; only `reset` leaves it.
    pub fn finish(&mut self) {
        if !self.game_over {
            self.game_over = true;
            info!(
                "Game over at level {} with score {}",
                self.level,
                self.final_score()
            );
        }
    }

    /// Restores the initial state, player name included.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn record_player_name(&mut self, name: &str) {
        let name: String = name.trim().chars().take(MAX_NAME_LEN).collect();
        self.player_name = if name.is_empty() { None } else { Some(name) };
    }

    pub fn snapshot(&self, escaped_count: u32, show_level_up: bool) -> GameSnapshot {
        GameSnapshot {
            score: self.score,
            level: self.level,
            tokens_to_next_level: self.tokens_to_next_level,
            multiplier: self.multiplier,
            entities_needed_per_token: self.entities_needed_per_token,
            escaped_count,
            is_game_over: self.game_over,
            show_level_up,
            player_name: self.player_name.clone(),
        }
    }
}
