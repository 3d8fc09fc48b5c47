//! # Game Client Library
//!
//! Headless client for the catching game. The simulation itself lives in
//! `shared`; this crate drives it in real time, plays it with an autopilot and
//! reports finished rounds to the leaderboard server.
//!
//! ## Module Organization
//!
//! ### Game Module (`game`)
//! The real-time loop:
//! - Fixed 16 ms interval feeding measured elapsed time into the session
//! - One autopilot input per tick
//! - Event logging (catches and level-ups at `info`, game over at `warn`)
//! - Round bookkeeping and restart through a score sink
//!
//! ### Input Module (`input`)
//! Input devices without a window:
//! - Virtual stick shaping (clamp, ramp, saturation, response curve)
//! - Autopilot that chases the nearest live sprite as pointer or stick
//!
//! ### Network Module (`network`)
//! Leaderboard access over HTTP:
//! - `LeaderboardClient` for submitting scores and fetching the top ten
//! - `HttpScoreSink`, which submits in background tasks so the loop never waits
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::game::Runner;
//! use client::input::{Autopilot, Device};
//! use client::network::{HttpScoreSink, LeaderboardClient};
//! use shared::{Session, SimConfig};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = Session::new(SimConfig::default(), 42)?;
//!     session.record_player_name("Al");
//!
//!     let client = Arc::new(LeaderboardClient::new("http://127.0.0.1:8080")?);
//!     let mut sink = HttpScoreSink::new(Arc::clone(&client), tokio::runtime::Handle::current());
//!
//!     let mut runner = Runner::new(
//!         session,
//!         Autopilot::new(Device::Pointer, 12.0),
//!         Duration::from_millis(16),
//!         120_000,
//!     );
//!     runner.run(1, &mut sink).await;
//!     sink.flush().await;
//!
//!     for entry in client.top().await? {
//!         println!("{}. {} {}", entry.rank, entry.name, entry.score);
//!     }
//!     Ok(())
//! }
//! ```

pub mod game;
pub mod input;
pub mod network;
