//! Simulation core shared by the session runner and the leaderboard server.
//!
//! Everything here is deterministic given a seed: sprites are spawned,
//! moved and caught inside fixed `TICK_MS` steps driven by [`Session`],
//! and score bookkeeping goes through [`GameState`]. The leaderboard wire
//! types live here too so both ends of the HTTP boundary validate scores
//! with the same rules.

pub mod collision;
pub mod config;
pub mod leaderboard;
pub mod math;
pub mod motion;
pub mod player;
pub mod session;
pub mod spawn;
pub mod sprite;
pub mod state;

use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub use config::{ConfigError, SimConfig};
pub use leaderboard::{
    ErrorBody, LeaderboardEntry, ScoreSubmission, SubmitResponse, ValidationError,
};
pub use math::Vec2;
pub use player::{Player, PlayerInput};
pub use session::{GameEvent, Phase, ScoreSink, Session};
pub use sprite::{Lifecycle, Sprite, SpriteId};
pub use state::{GameSnapshot, GameState, TokenOutcome};

pub const TICK_MS: u64 = 16;
pub const MAX_TICKS_PER_ADVANCE: u32 = 8;

pub const VIEWPORT_WIDTH: f32 = 1024.0;
pub const VIEWPORT_HEIGHT: f32 = 768.0;

pub const SPRITE_SIZE: f32 = 48.0;
pub const ESCAPE_MARGIN: f32 = 100.0;
pub const LEFT_SPAWN_X: f32 = -50.0;
pub const SPAWN_Y_MARGIN: f32 = 100.0;

pub const CATCH_RADIUS: f32 = 25.0;
pub const CATCH_POINTS: f64 = 10.0;
pub const CATCH_DISPLAY_MS: u64 = 1000;

pub const TOKENS_PER_LEVEL: u32 = 5;
pub const MULTIPLIER_STEP: f64 = 0.2;
pub const MAX_ESCAPES: u32 = 5;
pub const LEVEL_UP_DISPLAY_MS: u64 = 2000;

pub const STICK_SPEED: f32 = 5.0;

pub const POINTS_PER_LEVEL: i64 = 100;
pub const MAX_POSSIBLE_SCORE: i64 = 100_000;
pub const MAX_NAME_LEN: usize = 20;
pub const LEADERBOARD_LIMIT: usize = 10;

/// Milliseconds since the unix epoch, saturating to zero if the clock is behind it.
pub fn timestamp_ms() -> u64 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_millis();
    (millis.min(u64::MAX as u128)) as u64
}
