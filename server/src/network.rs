//! HTTP layer of the leaderboard server
//!
//! Exposes `GET /leaderboard` and `POST /leaderboard` over a shared
//! [`ScoreStore`]. Submissions are parsed from the raw body so malformed
//! JSON and non-integer numbers get the same 400 as schema failures.

use crate::error::ApiError;
use crate::store::ScoreStore;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::ORIGIN;
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use log::{debug, info};
use shared::{timestamp_ms, LeaderboardEntry, ScoreSubmission, SubmitResponse, LEADERBOARD_LIMIT};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

/// Request policy knobs set from the command line
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Reject scores that exceed what the claimed level allows
    pub plausibility_check: bool,
    /// When set, submissions must carry this exact `Origin` header
    pub allowed_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            plausibility_check: true,
            allowed_origin: None,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    store: Arc<RwLock<ScoreStore>>,
    config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: ScoreStore, config: ServerConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/leaderboard", get(get_leaderboard).post(submit_score))
        .with_state(state)
}

/// Leaderboard server bound to a TCP listener
pub struct Server {
    listener: TcpListener,
    app: Router,
}

impl Server {
    pub async fn new(
        addr: &str,
        store: ScoreStore,
        config: ServerConfig,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(addr).await?;
        info!("Leaderboard server listening on {}", listener.local_addr()?);

        if config.plausibility_check {
            info!("Plausibility check enabled");
        }
        if let Some(origin) = &config.allowed_origin {
            info!("Accepting submissions from origin {}", origin);
        }

        Ok(Server {
            listener,
            app: router(AppState::new(store, config)),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves requests until the listener fails
    pub async fn run(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.app).await
    }
}

fn check_origin(config: &ServerConfig, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(allowed) = &config.allowed_origin else {
        return Ok(());
    };

    let origin = headers.get(ORIGIN).and_then(|value| value.to_str().ok());
    match origin {
        Some(origin) if origin.trim_end_matches('/') == allowed.trim_end_matches('/') => Ok(()),
        _ => Err(ApiError::Forbidden),
    }
}

pub async fn submit_score(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SubmitResponse>, ApiError> {
    check_origin(&state.config, &headers)?;

    let submission: ScoreSubmission =
        serde_json::from_slice(&body).map_err(ApiError::Malformed)?;
    submission.validate_schema()?;
    if state.config.plausibility_check {
        submission.validate_plausibility()?;
    }

    let name = submission.name.trim();
    let mut store = state.store.write().await;
    let row = store
        .insert(name, submission.score, submission.level, timestamp_ms())
        .map_err(|e| ApiError::store(e, ApiError::Insert))?;
    let rank = store
        .count_above(row.score)
        .map_err(|e| ApiError::store(e, ApiError::Rank))?
        + 1;

    info!(
        "Accepted score {} (level {}) from {} at rank {}",
        row.score, row.level, row.name, rank
    );

    Ok(Json(SubmitResponse {
        success: true,
        rank,
        name: row.name,
        score: row.score,
        level: row.level,
        timestamp: row.created_at_ms,
    }))
}

pub async fn get_leaderboard(
    State(state): State<AppState>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let store = state.store.read().await;
    let rows = store
        .top(LEADERBOARD_LIMIT)
        .map_err(|e| ApiError::store(e, ApiError::Query))?;
    debug!("Serving {} leaderboard rows", rows.len());

    let entries = rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| LeaderboardEntry {
            rank: index as u64 + 1,
            name: row.name,
            score: row.score,
            level: row.level,
            timestamp: row.created_at_ms,
        })
        .collect();

    Ok(Json(entries))
}
