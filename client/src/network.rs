//! Leaderboard HTTP client and the score sink that feeds it

use log::{error, info};
use reqwest::header::{HeaderMap, HeaderValue, ORIGIN};
use serde::de::DeserializeOwned;
use shared::{ErrorBody, LeaderboardEntry, ScoreSink, ScoreSubmission, SubmitResponse};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid origin header value: {0}")]
    InvalidOrigin(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

#[derive(Debug, Clone)]
pub struct LeaderboardClient {
    http: reqwest::Client,
    base_url: String,
}

impl LeaderboardClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::build(base_url, HeaderMap::new())
    }

    /// Client that sends `origin` as the `Origin` header on every request
    pub fn with_origin(base_url: &str, origin: &str) -> Result<Self, ClientError> {
        let value = HeaderValue::from_str(origin)
            .map_err(|_| ClientError::InvalidOrigin(origin.to_string()))?;
        let mut headers = HeaderMap::new();
        headers.insert(ORIGIN, value);
        Self::build(base_url, headers)
    }

    fn build(base_url: &str, headers: HeaderMap) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/leaderboard", self.base_url)
    }

    pub async fn submit(&self, submission: &ScoreSubmission) -> Result<SubmitResponse, ClientError> {
        let response = self.http.post(self.endpoint()).json(submission).send().await?;
        decode(response).await
    }

    pub async fn top(&self) -> Result<Vec<LeaderboardEntry>, ClientError> {
        let response = self.http.get(self.endpoint()).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    Err(ClientError::Rejected {
        status: status.as_u16(),
        message,
    })
}

/// Submits final scores in the background
///
/// Each submission runs as its own task on `handle`, so the game loop never
/// waits on the network. Outcomes are only logged.
pub struct HttpScoreSink {
    client: Arc<LeaderboardClient>,
    handle: Handle,
    pending: Vec<JoinHandle<()>>,
}

impl HttpScoreSink {
    pub fn new(client: Arc<LeaderboardClient>, handle: Handle) -> Self {
        Self {
            client,
            handle,
            pending: Vec::new(),
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.iter().filter(|task| !task.is_finished()).count()
    }

    /// Waits for every in-flight submission to finish
    pub async fn flush(&mut self) {
        for task in self.pending.drain(..) {
            if let Err(e) = task.await {
                error!("Score submission task failed: {}", e);
            }
        }
    }
}

impl ScoreSink for HttpScoreSink {
    fn submit(&mut self, submission: ScoreSubmission) {
        let client = Arc::clone(&self.client);
        self.pending.retain(|task| !task.is_finished());

        let task = self.handle.spawn(async move {
            match client.submit(&submission).await {
                Ok(response) => info!(
                    "Score {} for {} recorded at rank {}",
                    response.score, response.name, response.rank
                ),
                Err(e) => error!(
                    "Failed to submit score {} for {}: {}",
                    submission.score, submission.name, e
                ),
            }
        });
        self.pending.push(task);
    }
}
