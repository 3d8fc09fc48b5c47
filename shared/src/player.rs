use crate::{SimConfig, Vec2, STICK_SPEED};
use serde::{Deserialize, Serialize};

/// Movement produced by the active input device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayerInput {
    /// Raw pointer movement in pixels (pointer-lock style).
    PointerDelta { dx: f32, dy: f32 },
    /// Virtual stick deflection, roughly `[-1, 1]` per axis.
    Stick { x: f32, y: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec2,
}

impl Player {
    pub fn centered(config: &SimConfig) -> Self {
        Self {
            position: config.center(),
        }
    }

    pub fn recenter(&mut self, config: &SimConfig) {
        self.position = config.center();
    }

    pub fn apply_input(&mut self, input: PlayerInput, config: &SimConfig) {
        let delta = match input {
            PlayerInput::PointerDelta { dx, dy } => Vec2::new(dx, dy),
            PlayerInput::Stick { x, y } => {
                Vec2::new(x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0)).scale(STICK_SPEED)
            }
        };

        let next = self.position.add(&delta);
        self.position = Vec2::new(
            next.x.clamp(0.0, config.viewport_width),
            next.y.clamp(0.0, config.viewport_height),
        );
    }
}
