use clap::Parser;
use log::{error, info};
use server::network::{Server, ServerConfig};
use server::store::ScoreStore;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Snapshot file for the leaderboard; rows are kept in memory only when omitted
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Only accept submissions carrying this Origin header
    #[arg(long)]
    allowed_origin: Option<String>,

    /// Accept scores above the per-level maximum
    #[arg(long)]
    no_plausibility_check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    let store = match &args.store {
        None => ScoreStore::in_memory(),
        Some(path) => match ScoreStore::open(path) {
            Ok(store) => store,
            Err(e) => {
                error!("Failed to open leaderboard store {:?}: {}", path, e);
                ScoreStore::unavailable()
            }
        },
    };

    let config = ServerConfig {
        plausibility_check: !args.no_plausibility_check,
        allowed_origin: args.allowed_origin,
    };

    let address = format!("{}:{}", args.host, args.port);
    let server = Server::new(&address, store, config).await?;

    info!("Starting leaderboard server on {}", address);
    info!("Use RUST_LOG=debug for detailed logging");

    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                error!("Server error: {}", e);
                return Err(e.into());
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
