//! Headless game loop: the autopilot plays rounds against the shared simulation

use crate::input::Autopilot;
use log::{debug, info, warn};
use shared::{GameEvent, ScoreSink, Session};
use std::time::Duration;
use tokio::time::{interval, Instant, MissedTickBehavior};

/// Outcome of one finished round
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    pub round: u32,
    pub score: i64,
    pub level: u32,
    pub catches: u32,
    pub escapes: u32,
    /// Simulated time the round lasted
    pub duration_ms: u64,
    /// Round stopped at the time limit instead of by game over
    pub timed_out: bool,
}

pub struct Runner {
    session: Session,
    /// Name recorded on the session at the start of every round
    player_name: Option<String>,
    autopilot: Autopilot,
    tick: Duration,
    round_limit_ms: u64,
}

impl Runner {
    pub fn new(session: Session, autopilot: Autopilot, tick: Duration, round_limit_ms: u64) -> Self {
        Self {
            player_name: session.state().player_name().map(str::to_string),
            session,
            autopilot,
            tick,
            round_limit_ms,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Applies one autopilot input and advances the simulation by `elapsed_ms`
    pub fn play_tick(&mut self, elapsed_ms: u64) -> Vec<GameEvent> {
        let input = self.autopilot.next_input(&self.session);
        self.session.apply_input(input);

        let events = self.session.advance(elapsed_ms);
        for event in &events {
            log_event(event);
        }
        events
    }

    /// Plays `rounds` rounds, handing each final score to `sink`
    pub async fn run(&mut self, rounds: u32, sink: &mut dyn ScoreSink) -> Vec<RoundSummary> {
        let mut ticker = interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // First tick fires immediately
        ticker.tick().await;

        let mut summaries = Vec::with_capacity(rounds as usize);
        for round in 1..=rounds {
            info!("Starting round {}/{}", round, rounds);
            if let Some(name) = &self.player_name {
                self.session.record_player_name(name);
            }
            let started_at = self.session.clock_ms();
            let mut catches = 0;
            let mut last_tick = Instant::now();

            let timed_out = loop {
                ticker.tick().await;
                let now = Instant::now();
                let elapsed_ms = now.duration_since(last_tick).as_millis() as u64;
                last_tick = now;

                let events = self.play_tick(elapsed_ms);
                catches += events
                    .iter()
                    .filter(|e| matches!(e, GameEvent::Caught { .. }))
                    .count() as u32;

                if self.session.state().is_game_over() {
                    break false;
                }
                if self.session.clock_ms() - started_at >= self.round_limit_ms {
                    info!("Round {} hit the time limit", round);
                    break true;
                }
            };

            let summary = RoundSummary {
                round,
                score: self.session.state().final_score(),
                level: self.session.state().level(),
                catches,
                escapes: self.session.escaped_count(),
                duration_ms: self.session.clock_ms() - started_at,
                timed_out,
            };
            info!(
                "Round {} finished: score {}, level {}, {} catches",
                summary.round, summary.score, summary.level, summary.catches
            );
            summaries.push(summary);

            self.session.restart(sink);
        }

        summaries
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::Spawned { id } => debug!("Sprite {} spawned", id),
        GameEvent::Escaped { id, escaped_count } => {
            debug!("Sprite {} escaped ({} total)", id, escaped_count)
        }
        GameEvent::Caught { id, points } => info!("Caught {} for {} points", id, points),
        GameEvent::LevelUp { level } => info!("Level up! Now at level {}", level),
        GameEvent::GameOver { score, level } => {
            warn!("Game over with score {} at level {}", score, level)
        }
    }
}
