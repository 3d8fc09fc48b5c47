//! Headless input devices: virtual stick shaping and the autopilot that plays the game

use clap::ValueEnum;
use shared::{PlayerInput, Session, Vec2};

/// Travel of the on-screen stick knob in pixels (base radius minus knob radius)
pub const STICK_MAX_DISTANCE: f32 = 40.0;

const RAMP_THRESHOLD: f32 = 0.3;
const SATURATION: f32 = 0.5;
const RESPONSE_EXPONENT: f32 = 1.1;

/// Turns a stick drag offset in pixels into a stick deflection
///
/// The drag is clamped to `max_distance`, then each axis ramps linearly up to
/// the saturation value at 30% deflection and stays there. A slight power
/// curve is applied last so small corrections stay small.
pub fn stick_vector(offset: Vec2, max_distance: f32) -> Vec2 {
    if max_distance <= 0.0 {
        return Vec2::ZERO;
    }

    let clamped = if offset.magnitude() > max_distance {
        offset.normalize().scale(max_distance)
    } else {
        offset
    };

    Vec2::new(
        response_curve(shape_axis(clamped.x / max_distance)),
        response_curve(shape_axis(clamped.y / max_distance)),
    )
}

fn shape_axis(normalized: f32) -> f32 {
    if normalized.abs() < RAMP_THRESHOLD {
        normalized / RAMP_THRESHOLD * SATURATION
    } else {
        normalized.signum() * SATURATION
    }
}

fn response_curve(value: f32) -> f32 {
    value.signum() * value.abs().powf(RESPONSE_EXPONENT)
}

/// Which device the autopilot pretends to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Device {
    /// Pointer-lock mouse: raw pixel deltas
    Pointer,
    /// Touch virtual stick
    Stick,
}

/// Chases the nearest live sprite
#[derive(Debug, Clone)]
pub struct Autopilot {
    device: Device,
    max_step: f32,
}

impl Autopilot {
    /// `max_step` caps pointer movement per tick; the stick has its own speed limit
    pub fn new(device: Device, max_step: f32) -> Self {
        Self {
            device,
            max_step: max_step.max(0.0),
        }
    }

    pub fn device(&self) -> Device {
        self.device
    }

    /// Where the nearest live sprite will be after its next move
    pub fn target(&self, session: &Session) -> Option<Vec2> {
        let player = session.player().position;
        session
            .sprites()
            .iter()
            .filter(|sprite| sprite.is_alive())
            .map(|sprite| sprite.position.add(&sprite.velocity))
            .min_by(|a, b| a.distance(&player).total_cmp(&b.distance(&player)))
    }

    pub fn next_input(&self, session: &Session) -> PlayerInput {
        let Some(target) = self.target(session) else {
            return match self.device {
                Device::Pointer => PlayerInput::PointerDelta { dx: 0.0, dy: 0.0 },
                Device::Stick => PlayerInput::Stick { x: 0.0, y: 0.0 },
            };
        };

        let player = session.player().position;
        let offset = Vec2::new(target.x - player.x, target.y - player.y);

        match self.device {
            Device::Pointer => {
                let delta = if offset.magnitude() > self.max_step {
                    offset.normalize().scale(self.max_step)
                } else {
                    offset
                };
                PlayerInput::PointerDelta {
                    dx: delta.x,
                    dy: delta.y,
                }
            }
            Device::Stick => {
                let stick = stick_vector(offset, STICK_MAX_DISTANCE);
                PlayerInput::Stick {
                    x: stick.x,
                    y: stick.y,
                }
            }
        }
    }
}
