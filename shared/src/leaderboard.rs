//! Leaderboard wire format and the score checks both sides agree on.

use crate::{MAX_NAME_LEN, MAX_POSSIBLE_SCORE, POINTS_PER_LEVEL};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must be between 1 and {} characters", MAX_NAME_LEN)]
    Name,
    #[error("score must be a positive integer")]
    Score,
    #[error("level must be a positive integer")]
    Level,
    #[error("score {score} exceeds the maximum of {max} for level {level}")]
    Implausible { score: i64, level: i64, max: i64 },
}

/// Body of `POST /leaderboard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub name: String,
    pub score: i64,
    pub level: i64,
}

impl ScoreSubmission {
    pub fn new(name: impl Into<String>, score: i64, level: i64) -> Self {
        Self {
            name: name.into(),
            score,
            level,
        }
    }

    pub fn validate_schema(&self) -> Result<(), ValidationError> {
        let name_len = self.name.trim().chars().count();
        if name_len == 0 || name_len > MAX_NAME_LEN {
            return Err(ValidationError::Name);
        }
        if self.score <= 0 {
            return Err(ValidationError::Score);
        }
        if self.level <= 0 {
            return Err(ValidationError::Level);
        }
        Ok(())
    }

    /// Rejects scores a player could not have reached at the claimed level.
    pub fn validate_plausibility(&self) -> Result<(), ValidationError> {
        let max = theoretical_max_score(self.level);
        if self.score > MAX_POSSIBLE_SCORE || self.score > max {
            return Err(ValidationError::Implausible {
                score: self.score,
                level: self.level,
                max,
            });
        }
        Ok(())
    }
}

pub fn theoretical_max_score(level: i64) -> i64 {
    level
        .saturating_mul(POINTS_PER_LEVEL)
        .saturating_mul(2)
        .min(MAX_POSSIBLE_SCORE)
}

/// Response to an accepted `POST /leaderboard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub rank: u64,
    pub name: String,
    pub score: i64,
    pub level: i64,
    /// Row creation time, epoch milliseconds.
    pub timestamp: u64,
}

/// One row of `GET /leaderboard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u64,
    pub name: String,
    pub score: i64,
    pub level: i64,
    pub timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
