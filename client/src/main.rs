use clap::Parser;
use client::game::Runner;
use client::input::{Autopilot, Device};
use client::network::{HttpScoreSink, LeaderboardClient};
use log::{error, info};
use shared::{Session, SimConfig, TICK_MS};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Leaderboard server base URL
    #[arg(short = 's', long, default_value = "http://127.0.0.1:8080")]
    server: String,

    /// Player name submitted with each score
    #[arg(short = 'n', long, default_value = "autopilot")]
    name: String,

    /// Number of rounds to play
    #[arg(short = 'r', long, default_value = "1")]
    rounds: u32,

    /// RNG seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with simulation settings
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Viewport width, overrides the config file
    #[arg(short = 'w', long)]
    width: Option<f32>,

    /// Viewport height (no short flag to avoid conflict with --help)
    #[arg(long)]
    height: Option<f32>,

    /// Loop interval in milliseconds
    #[arg(short = 't', long, default_value_t = TICK_MS)]
    tick_ms: u64,

    /// Input device the autopilot drives
    #[arg(short = 'd', long, value_enum, default_value = "pointer")]
    device: Device,

    /// Maximum pointer movement per tick in pixels
    #[arg(long, default_value = "12.0")]
    speed: f32,

    /// Stop a round after this many seconds of game time
    #[arg(long, default_value = "120")]
    round_limit_secs: u64,

    /// Origin header to send with requests
    #[arg(long)]
    origin: Option<String>,
}

fn round_limit_ms(secs: u64) -> u64 {
    secs.saturating_mul(1000)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimConfig::from_json_file(path)?,
        None => SimConfig::default(),
    };
    if let Some(width) = args.width {
        config.viewport_width = width;
    }
    if let Some(height) = args.height {
        config.viewport_height = height;
    }
    config.validate()?;

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Starting client...");
    info!("Leaderboard: {}", args.server);
    info!(
        "Viewport {}x{}, seed {}, {:?} autopilot",
        config.viewport_width, config.viewport_height, seed, args.device
    );

    let mut session = Session::new(config, seed)?;
    session.record_player_name(&args.name);

    let client = Arc::new(match &args.origin {
        Some(origin) => LeaderboardClient::with_origin(&args.server, origin)?,
        None => LeaderboardClient::new(&args.server)?,
    });
    let mut sink = HttpScoreSink::new(Arc::clone(&client), tokio::runtime::Handle::current());

    let mut runner = Runner::new(
        session,
        Autopilot::new(args.device, args.speed),
        Duration::from_millis(args.tick_ms.max(1)),
        round_limit_ms(args.round_limit_secs),
    );

    tokio::select! {
        summaries = runner.run(args.rounds, &mut sink) => {
            for summary in summaries {
                println!(
                    "Round {}: score {} level {} ({} catches, {} escapes{})",
                    summary.round,
                    summary.score,
                    summary.level,
                    summary.catches,
                    summary.escapes,
                    if summary.timed_out { ", time limit" } else { "" }
                );
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    sink.flush().await;

    match client.top().await {
        Ok(entries) if entries.is_empty() => println!("Leaderboard is empty"),
        Ok(entries) => {
            println!("Leaderboard:");
            for entry in entries {
                println!(
                    "{:>3}. {:<20} {:>6}  (level {})",
                    entry.rank, entry.name, entry.score, entry.level
                );
            }
        }
        Err(e) => error!("Failed to fetch leaderboard: {}", e),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_limit_ms_saturates() {
        assert_eq!(round_limit_ms(120), 120_000);
        assert_eq!(round_limit_ms(u64::MAX), u64::MAX);
    }
}
