//! Clients for the remote scoring service: result submission and team balancing.

use crate::models::{Player, SubmissionPayload, SubmissionReceipt, Teams};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

pub const SUBMIT_GAME_ENDPOINT: &str = "/submit_game";
pub const BALANCE_ENDPOINT: &str = "/balance";
pub const USERS_ENDPOINT: &str = "/users";

/// Failure of a call to the scoring service. `Display` is the message shown to the operator.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SubmissionError {
    /// Network failure or timeout before a response arrived.
    #[error("{0}")]
    Transport(String),
    /// Non-2xx status, application-level `error` field, or an unreadable body.
    #[error("{message}")]
    Server { status: Option<u16>, message: String },
}

/// Sends match results. Exactly one call is made per confirmed outcome.
pub trait SubmissionGateway {
    fn submit(
        &self,
        payload: &SubmissionPayload,
    ) -> impl Future<Output = Result<SubmissionReceipt, SubmissionError>> + Send;
}

/// Turn a raw response into a typed result.
///
/// The body is read as JSON whatever the status; an `error` field wins even on 2xx.
pub fn interpret_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, SubmissionError> {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) if (200..300).contains(&status) => {
            return Err(SubmissionError::Server {
                status: Some(status),
                message: format!("failed to process response: {e}"),
            })
        }
        Err(_) => return Err(generic_failure(status)),
    };

    if let Some(err) = value.get("error").filter(|v| !v.is_null()) {
        let message = match err.as_str() {
            Some(s) if !s.trim().is_empty() => s.to_string(),
            Some(_) => return Err(generic_failure(status)),
            None => err.to_string(),
        };
        return Err(SubmissionError::Server {
            status: Some(status),
            message,
        });
    }

    if !(200..300).contains(&status) {
        return Err(generic_failure(status));
    }

    serde_json::from_value(value).map_err(|e| SubmissionError::Server {
        status: Some(status),
        message: format!("failed to process response: {e}"),
    })
}

fn generic_failure(status: u16) -> SubmissionError {
    SubmissionError::Server {
        status: Some(status),
        message: format!("submission failed (HTTP {status})"),
    }
}

fn transport_error(e: reqwest::Error, timeout: Duration) -> SubmissionError {
    if e.is_timeout() {
        SubmissionError::Transport(format!("request timed out after {} seconds", timeout.as_secs()))
    } else {
        SubmissionError::Transport(e.to_string())
    }
}

/// Shared HTTP plumbing for the scoring service.
#[derive(Clone, Debug)]
pub struct ScoringApi {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ScoringApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SubmissionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SubmissionError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn finish<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T, SubmissionError> {
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| transport_error(e, self.timeout))?;
        interpret_response(status, &body)
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> Result<T, SubmissionError> {
        let response = self
            .client
            .post(self.url(endpoint))
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;
        self.finish(response).await
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, SubmissionError> {
        let response = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;
        self.finish(response).await
    }
}

/// Posts results to `<base>/submit_game`.
#[derive(Clone, Debug)]
pub struct HttpSubmissionGateway {
    api: ScoringApi,
}

impl HttpSubmissionGateway {
    pub fn new(api: ScoringApi) -> Self {
        Self { api }
    }
}

impl SubmissionGateway for HttpSubmissionGateway {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt, SubmissionError> {
        log::info!(
            "submitting result '{}' (winner {}) to scoring service",
            payload.match_name,
            payload.winning_team
        );
        self.api.post(SUBMIT_GAME_ENDPOINT, payload).await
    }
}

/// Read-only nickname → score lookup fetched from the service and passed around explicitly.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ScoreSnapshot {
    #[serde(default)]
    pub scores: HashMap<String, f64>,
}

impl ScoreSnapshot {
    pub fn score_of(&self, nickname: &str) -> Option<f64> {
        self.scores.get(nickname).copied()
    }
}

#[derive(Serialize)]
struct BalanceRequest {
    users: HashMap<String, f64>,
    randomness: u32,
}

/// Client of the external balancing algorithm; only its output is consumed.
#[derive(Clone, Debug)]
pub struct BalanceClient {
    api: ScoringApi,
}

impl BalanceClient {
    pub fn new(api: ScoringApi) -> Self {
        Self { api }
    }

    /// Ask the service to split `players` into two teams. `randomness` is a 0-100 percentage.
    pub async fn balance(&self, players: &[Player], randomness: u32) -> Result<Teams, SubmissionError> {
        let request = BalanceRequest {
            users: players.iter().map(|p| (p.nickname.clone(), p.score)).collect(),
            randomness: randomness.min(100),
        };
        log::info!("requesting balance for {} player(s)", players.len());
        self.api.post(BALANCE_ENDPOINT, &request).await
    }

    pub async fn score_snapshot(&self) -> Result<ScoreSnapshot, SubmissionError> {
        self.api.get(USERS_ENDPOINT).await
    }
}
