//! Sprite motion model: per-tick integration, timed redirection and the
//! escape check.

use crate::{SimConfig, Sprite, ESCAPE_MARGIN, SPRITE_SIZE};
use log::debug;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionOutcome {
    /// Sprite is resolved and was left untouched.
    Idle,
    Moved,
    /// Sprite left the play area during this tick. Reported once.
    Escaped,
}

/// Random vertical nudge applied on each redirect.
pub fn redirect_spread(level: u32) -> f32 {
    1.0 + level as f32 * 0.2
}

/// `position += velocity`, with `y` clamped to the viewport (no bounce).
pub fn integrate(sprite: &mut Sprite, config: &SimConfig) {
    sprite.position.x += sprite.velocity.x;
    sprite.position.y = (sprite.position.y + sprite.velocity.y)
        .clamp(0.0, config.viewport_height - SPRITE_SIZE);
}

/// Applies a redirect if one is due. Returns true if the velocity changed.
pub fn redirect_if_due<R: Rng + ?Sized>(
    sprite: &mut Sprite,
    level: u32,
    now_ms: u64,
    rng: &mut R,
) -> bool {
    if now_ms < sprite.next_redirect_ms {
        return false;
    }

    sprite.velocity.x *= rng.gen_range(0.8f32..=1.2);
    sprite.velocity.y += (rng.gen::<f32>() - 0.5) * redirect_spread(level);

    // Catch up in whole intervals so a long stall doesn't fire a burst.
    while sprite.next_redirect_ms <= now_ms {
        sprite.next_redirect_ms += sprite.redirect_interval_ms.max(1);
    }
    true
}

pub fn is_out_of_bounds(x: f32, config: &SimConfig) -> bool {
    x < -ESCAPE_MARGIN || x > config.viewport_width + ESCAPE_MARGIN
}

/// Runs one motion tick for a sprite.
pub fn step_sprite<R: Rng + ?Sized>(
    sprite: &mut Sprite,
    level: u32,
    now_ms: u64,
    config: &SimConfig,
    rng: &mut R,
) -> MotionOutcome {
    if !sprite.is_alive() {
        return MotionOutcome::Idle;
    }

    if redirect_if_due(sprite, level, now_ms, rng) {
        debug!(
            "Sprite {} redirected to ({:.2}, {:.2})",
            sprite.id, sprite.velocity.x, sprite.velocity.y
        );
    }

    integrate(sprite, config);

    if is_out_of_bounds(sprite.position.x, config) && sprite.mark_escaped() {
        return MotionOutcome::Escaped;
    }

    MotionOutcome::Moved
}
