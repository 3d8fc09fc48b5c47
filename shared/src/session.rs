//! Session controller: owns the game state, the live sprites and the
//! player, and advances all of them in fixed `TICK_MS` steps.
//!
//! Motion, redirection and spawning are driven from one step function
//! using the session clock, so pausing simply stops the clock and every
//! timer stays where it was.

use crate::collision::try_catch;
use crate::motion::{step_sprite, MotionOutcome};
use crate::spawn::generate;
use crate::{
    ConfigError, GameSnapshot, GameState, Player, PlayerInput, ScoreSubmission, SimConfig, Sprite, SpriteId,
    TokenOutcome, LEVEL_UP_DISPLAY_MS, MAX_ESCAPES, MAX_TICKS_PER_ADVANCE, TICK_MS,
};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

const SPAWN_BASE_MS: u64 = 2000;
const SPAWN_STEP_MS: u64 = 100;
const SPAWN_FLOOR_MS: u64 = 500;
const BASE_MAX_ENTITIES: usize = 5;

/// Receives the final score when a session ends.
///
/// Submission is fire-and-forget: implementations must not block, and a
/// failed submission is theirs to report.
pub trait ScoreSink {
    fn submit(&mut self, submission: ScoreSubmission);
}

impl ScoreSink for Vec<ScoreSubmission> {
    fn submit(&mut self, submission: ScoreSubmission) {
        self.push(submission);
    }
}

/// Feedback hooks for audio/visual layers. Nothing flows back into the simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Spawned { id: SpriteId },
    Caught { id: SpriteId, points: f64 },
    Escaped { id: SpriteId, escaped_count: u32 },
    LevelUp { level: u32 },
    GameOver { score: i64, level: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    /// Level-up banner is showing; gameplay continues underneath.
    LevelingUp,
    Paused,
    GameOver,
}

pub fn spawn_interval_ms(level: u32) -> u64 {
    SPAWN_BASE_MS
        .saturating_sub(level as u64 * SPAWN_STEP_MS)
        .max(SPAWN_FLOOR_MS)
}

pub fn max_entities(level: u32) -> usize {
    BASE_MAX_ENTITIES + level as usize
}

pub struct Session {
    config: SimConfig,
    state: GameState,
    sprites: Vec<Sprite>,
    player: Player,
    rng: StdRng,

    clock_ms: u64,
    accumulator_ms: u64,
    next_spawn_ms: u64,
    level_up_until_ms: Option<u64>,
    escaped_count: u32,
    paused: bool,
    next_sprite_id: u32,
}

impl Session {
    /// Starts a session, rejecting viewports the spawn and motion rules can't fit in.
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            state: GameState::new(),
            sprites: Vec::new(),
            player: Player::centered(&config),
            rng: StdRng::seed_from_u64(seed),
            clock_ms: 0,
            accumulator_ms: 0,
            next_spawn_ms: spawn_interval_ms(1),
            level_up_until_ms: None,
            escaped_count: 0,
            paused: false,
            next_sprite_id: 1,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn escaped_count(&self) -> u32 {
        self.escaped_count
    }

    pub fn alive_count(&self) -> usize {
        self.sprites.iter().filter(|s| s.is_alive()).count()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn phase(&self) -> Phase {
        if self.state.is_game_over() {
            Phase::GameOver
        } else if self.paused {
            Phase::Paused
        } else if self.level_up_until_ms.is_some() {
            Phase::LevelingUp
        } else {
            Phase::Playing
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.state
            .snapshot(self.escaped_count, self.level_up_until_ms.is_some())
    }

    pub fn record_player_name(&mut self, name: &str) {
        self.state.record_player_name(name);
    }

    pub fn apply_input(&mut self, input: PlayerInput) {
        if self.paused || self.state.is_game_over() {
            return;
        }
        self.player.apply_input(input, &self.config);
    }

    pub fn pause(&mut self) {
        if !self.paused && !self.state.is_game_over() {
            self.paused = true;
            info!("Session paused at {}ms", self.clock_ms);
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            info!("Session resumed at {}ms", self.clock_ms);
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Feeds wall-clock time into the fixed-step simulation.
    ///
    /// Runs as many whole ticks as have accumulated, up to
    /// `MAX_TICKS_PER_ADVANCE`; any backlog beyond that is dropped.
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.paused || self.state.is_game_over() {
            return events;
        }

        self.accumulator_ms += elapsed_ms;
        let mut ticks = 0;
        while self.accumulator_ms >= TICK_MS && ticks < MAX_TICKS_PER_ADVANCE {
            self.accumulator_ms -= TICK_MS;
            events.extend(self.step());
            ticks += 1;
        }

        if self.accumulator_ms >= TICK_MS {
            warn!(
                "Dropping {}ms of simulation backlog after {} ticks",
                self.accumulator_ms, ticks
            );
            self.accumulator_ms = 0;
        }

        events
    }

    /// Runs exactly one simulation tick.
    pub fn step(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.paused || self.state.is_game_over() {
            return events;
        }

        self.clock_ms += TICK_MS;
        let now = self.clock_ms;

        if self.level_up_until_ms.is_some_and(|until| now >= until) {
            self.level_up_until_ms = None;
        }

        self.sprites.retain(|s| !s.is_removable(now));

        if now >= self.next_spawn_ms {
            self.spawn(&mut events);
        }

        let level = self.state.level();
        let mut escaped = Vec::new();
        for sprite in &mut self.sprites {
            if step_sprite(sprite, level, now, &self.config, &mut self.rng)
                == MotionOutcome::Escaped
            {
                escaped.push(sprite.id);
            }
        }

        // Escaped sprites are no longer alive, so they can't be caught below.
        let player = self.player.position;
        let caught: Vec<(SpriteId, f64)> = self
            .sprites
            .iter_mut()
            .filter_map(|sprite| try_catch(sprite, &player, now).map(|points| (sprite.id, points)))
            .collect();

        for (id, points) in caught {
            self.handle_catch(id, points, &mut events);
        }

        for id in escaped {
            self.handle_escape(id, &mut events);
        }

        events
    }

    /// Ends the session: hands the final score to `sink`, then starts a fresh one.
    ///
    /// The reset never depends on the submission outcome.
    pub fn restart(&mut self, sink: &mut dyn ScoreSink) {
        match self.final_submission() {
            Some(submission) => {
                info!(
                    "Submitting final score: {} (level {}) for {}",
                    submission.score, submission.level, submission.name
                );
                sink.submit(submission);
            }
            None => info!("Final score not submitted: no player name or zero score"),
        }

        self.state.reset();
        self.sprites.clear();
        self.escaped_count = 0;
        self.level_up_until_ms = None;
        self.accumulator_ms = 0;
        self.paused = false;
        self.next_spawn_ms = self.clock_ms + spawn_interval_ms(self.state.level());
        self.player.recenter(&self.config);
    }

    pub fn final_submission(&self) -> Option<ScoreSubmission> {
        let name = self.state.player_name()?;
        let score = self.state.final_score();
        (score > 0).then(|| ScoreSubmission::new(name, score, self.state.level() as i64))
    }

    fn spawn(&mut self, events: &mut Vec<GameEvent>) {
        let level = self.state.level();
        self.next_spawn_ms = self.clock_ms + spawn_interval_ms(level);

        if self.alive_count() >= max_entities(level) {
            return;
        }

        let id = SpriteId(self.next_sprite_id);
        self.next_sprite_id += 1;

        let sprite = generate(id, level, &self.config, self.clock_ms, &mut self.rng);
        debug!(
            "Spawned sprite {} at ({:.1}, {:.1}) moving ({:.2}, {:.2})",
            id, sprite.position.x, sprite.position.y, sprite.velocity.x, sprite.velocity.y
        );
        self.sprites.push(sprite);
        events.push(GameEvent::Spawned { id });
    }

    fn handle_catch(&mut self, id: SpriteId, points: f64, events: &mut Vec<GameEvent>) {
        let awarded = self.state.add_score(points);
        events.push(GameEvent::Caught {
            id,
            points: awarded,
        });

        match self.state.consume_token() {
            TokenOutcome::LevelUp { level } => self.handle_level_up(level, events),
            TokenOutcome::Spent { remaining } => {
                debug!("Caught sprite {}, {} tokens to next level", id, remaining)
            }
            TokenOutcome::BelowThreshold => {
                debug!("Caught sprite {} below the token threshold", id)
            }
        }
    }

    fn handle_level_up(&mut self, level: u32, events: &mut Vec<GameEvent>) {
        let now = self.clock_ms;
        self.level_up_until_ms = Some(now + LEVEL_UP_DISPLAY_MS);
        self.next_spawn_ms = now + spawn_interval_ms(level);
        for sprite in self.sprites.iter_mut().filter(|s| s.is_alive()) {
            sprite.rearm_redirect(now);
        }
        events.push(GameEvent::LevelUp { level });
    }

    fn handle_escape(&mut self, id: SpriteId, events: &mut Vec<GameEvent>) {
        if self.state.is_game_over() {
            return;
        }

        self.escaped_count += 1;
        debug!("Sprite {} escaped ({}/{})", id, self.escaped_count, MAX_ESCAPES);
        events.push(GameEvent::Escaped {
            id,
            escaped_count: self.escaped_count,
        });

        if self.escaped_count >= MAX_ESCAPES {
            self.state.finish();
            events.push(GameEvent::GameOver {
                score: self.state.final_score(),
                level: self.state.level(),
            });
        }
    }
}
