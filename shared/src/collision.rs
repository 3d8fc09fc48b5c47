use crate::{Sprite, Vec2, CATCH_DISPLAY_MS, CATCH_POINTS, CATCH_RADIUS};

pub fn within_reach(sprite: &Sprite, player: &Vec2) -> bool {
    sprite.position.distance(player) < CATCH_RADIUS
}

/// Checks and latches a catch in one step.
///
/// Returns the base points to award only on the `Alive -> Caught` edge; a
/// sprite that is already resolved, or out of reach, yields `None`.
pub fn try_catch(sprite: &mut Sprite, player: &Vec2, now_ms: u64) -> Option<f64> {
    if !sprite.is_alive() || !within_reach(sprite, player) {
        return None;
    }

    sprite
        .mark_caught(now_ms, CATCH_DISPLAY_MS)
        .then_some(CATCH_POINTS)
}
