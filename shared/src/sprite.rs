use crate::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque sprite handle, unique within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpriteId(pub u32);

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a sprite is in its life.
///
/// `Alive` is the only state that moves, redirects or can be caught.
/// `Caught` and `Escaped` are terminal; the session drops the sprite from
/// its list once it is resolved (for caught sprites, after the catch
/// animation), which is the `Removed` step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    Alive,
    Caught { remove_at_ms: u64 },
    Escaped,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub id: SpriteId,
    pub position: Vec2,
    /// Pixels per simulation tick.
    pub velocity: Vec2,
    pub redirect_interval_ms: u64,
    pub next_redirect_ms: u64,
    lifecycle: Lifecycle,
}

impl Sprite {
    pub fn new(
        id: SpriteId,
        position: Vec2,
        velocity: Vec2,
        redirect_interval_ms: u64,
        spawned_at_ms: u64,
    ) -> Self {
        Self {
            id,
            position,
            velocity,
            redirect_interval_ms,
            next_redirect_ms: spawned_at_ms + redirect_interval_ms,
            lifecycle: Lifecycle::Alive,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_alive(&self) -> bool {
        self.lifecycle == Lifecycle::Alive
    }

    pub fn is_caught(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Caught { .. })
    }

    /// `Alive -> Caught`. Returns false if the sprite was already resolved.
    pub fn mark_caught(&mut self, now_ms: u64, display_ms: u64) -> bool {
        if self.lifecycle != Lifecycle::Alive {
            return false;
        }
        self.lifecycle = Lifecycle::Caught {
            remove_at_ms: now_ms + display_ms,
        };
        true
    }

    /// `Alive -> Escaped`. Returns false if the sprite was already resolved.
    pub fn mark_escaped(&mut self) -> bool {
        if self.lifecycle != Lifecycle::Alive {
            return false;
        }
        self.lifecycle = Lifecycle::Escaped;
        true
    }

    /// True once the sprite should leave the session's list.
    pub fn is_removable(&self, now_ms: u64) -> bool {
        match self.lifecycle {
            Lifecycle::Alive => false,
            Lifecycle::Caught { remove_at_ms } => now_ms >= remove_at_ms,
            Lifecycle::Escaped => true,
        }
    }

    /// Restarts the redirect timer from `now_ms`, used after a level change.
    pub fn rearm_redirect(&mut self, now_ms: u64) {
        self.next_redirect_ms = now_ms + self.redirect_interval_ms;
    }
}
