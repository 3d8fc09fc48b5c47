//! Entity generator: new sprites enter from either side of the viewport,
//! getting faster and twitchier as the level rises.

use crate::{SimConfig, Sprite, SpriteId, Vec2, LEFT_SPAWN_X, SPAWN_Y_MARGIN};
use rand::Rng;

const BASE_SPEED: f32 = 2.0;
const BASE_SPEED_PER_LEVEL: f32 = 0.5;
const MAX_BASE_SPEED: f32 = 8.0;

const REDIRECT_BASE_MS: u64 = 2000;
const REDIRECT_STEP_MS: u64 = 200;
const REDIRECT_FLOOR_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Horizontal direction pointing into the viewport.
    pub fn inward(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }
}

/// Horizontal speed before jitter, capped at `MAX_BASE_SPEED`.
pub fn base_speed(level: u32) -> f32 {
    (BASE_SPEED + level as f32 * BASE_SPEED_PER_LEVEL).min(MAX_BASE_SPEED)
}

/// Upper bound of the random horizontal speed added on top of `base_speed`.
pub fn speed_jitter(level: u32) -> f32 {
    1.0 + level as f32 * 0.2
}

/// Width of the zero-mean vertical speed distribution.
pub fn vertical_spread(level: u32) -> f32 {
    2.0 + level as f32 * 0.3
}

pub fn redirect_interval_ms(level: u32) -> u64 {
    REDIRECT_BASE_MS
        .saturating_sub(level as u64 * REDIRECT_STEP_MS)
        .max(REDIRECT_FLOOR_MS)
}

pub fn generate<R: Rng + ?Sized>(
    id: SpriteId,
    level: u32,
    config: &SimConfig,
    spawned_at_ms: u64,
    rng: &mut R,
) -> Sprite {
    let side = if rng.gen_bool(0.5) {
        Side::Left
    } else {
        Side::Right
    };

    let position = Vec2::new(
        match side {
            Side::Left => LEFT_SPAWN_X,
            Side::Right => config.viewport_width,
        },
        rng.gen::<f32>() * (config.viewport_height - SPAWN_Y_MARGIN),
    );

    let velocity = Vec2::new(
        side.inward() * (base_speed(level) + rng.gen::<f32>() * speed_jitter(level)),
        (rng.gen::<f32>() - 0.5) * vertical_spread(level),
    );

    Sprite::new(
        id,
        position,
        velocity,
        redirect_interval_ms(level),
        spawned_at_ms,
    )
}
