//! Outcome confirmation: declare a winner, resolve the admin credential, submit once.
//!
//! Entry actions run synchronously inside every public call, so callers only ever
//! observe `Idle`, `AwaitingSecret`, `Submitting`, `Success` or `Error`. The network
//! call is the only suspension point: take the payload with [`OutcomeController::take_submission`],
//! send it without holding the controller, then hand the result to
//! [`OutcomeController::complete_submission`].

use crate::gateway::{SubmissionError, SubmissionGateway};
use crate::logic::feedback::DisplayTimer;
use crate::models::{
    Credential, CredentialError, MatchOutcome, OutcomeRecorded, Side, SubmissionPayload,
    SubmissionReceipt, Teams,
};
use crate::store::{system_clock, Clock, CredentialStore, DEFAULT_TTL_DAYS};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Shown when the service gave no usable message.
pub const GENERIC_SUBMIT_FAILURE: &str = "submission failed";

/// Rejections of controller calls. The state is left untouched.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum OutcomeError {
    #[error("Both teams need at least one player")]
    EmptyTeam,
    #[error("A player cannot be on both teams")]
    OverlappingTeams,
    #[error("Cannot {action} while {state}")]
    InvalidAction {
        action: &'static str,
        state: &'static str,
    },
    #[error("A submission is in progress")]
    Busy,
    #[error("Could not clear the cached credential: {0}")]
    CredentialCache(String),
}

/// Timing and caching knobs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutcomeConfig {
    pub credential_ttl_days: u32,
    /// How long `Success` is shown before returning to `Idle`.
    pub success_display: Duration,
    /// Celebration length; never longer than `success_display`.
    pub confetti: Duration,
    /// Idle time after which the displayed result is dimmed.
    pub inactivity_dim: Duration,
}

impl Default for OutcomeConfig {
    fn default() -> Self {
        Self {
            credential_ttl_days: DEFAULT_TTL_DAYS,
            success_display: Duration::from_millis(3000),
            confetti: Duration::from_millis(3000),
            inactivity_dim: Duration::from_secs(60),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SecretSource {
    Cache,
    Prompt,
}

#[derive(Clone, Debug, PartialEq)]
pub enum OutcomeState {
    Idle,
    TeamSelected {
        side: Side,
    },
    /// Prompting; `error` is the reason the previous attempt was rejected.
    AwaitingSecret {
        side: Side,
        error: Option<CredentialError>,
    },
    ValidatingSecret {
        side: Side,
        secret: String,
        source: SecretSource,
    },
    Submitting {
        side: Side,
        credential: Credential,
    },
    Success,
    Error {
        side: Side,
        message: String,
    },
}

impl OutcomeState {
    pub fn name(&self) -> &'static str {
        match self {
            OutcomeState::Idle => "idle",
            OutcomeState::TeamSelected { .. } => "team_selected",
            OutcomeState::AwaitingSecret { .. } => "awaiting_secret",
            OutcomeState::ValidatingSecret { .. } => "validating_secret",
            OutcomeState::Submitting { .. } => "submitting",
            OutcomeState::Success => "success",
            OutcomeState::Error { .. } => "error",
        }
    }

    pub fn selected_side(&self) -> Option<Side> {
        match self {
            OutcomeState::TeamSelected { side }
            | OutcomeState::AwaitingSecret { side, .. }
            | OutcomeState::ValidatingSecret { side, .. }
            | OutcomeState::Submitting { side, .. }
            | OutcomeState::Error { side, .. } => Some(*side),
            OutcomeState::Idle | OutcomeState::Success => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerKind {
    Validation,
    Error,
    Success,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

/// What the screen renders for the outcome area.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutcomeView {
    pub state: &'static str,
    pub selected: Option<Side>,
    pub prompt_open: bool,
    pub banner: Option<Banner>,
    pub confetti_active: bool,
    pub dimmed: bool,
    /// False while a submission is in flight.
    pub interaction_enabled: bool,
    /// A credential is cached, so selecting a team submits without prompting.
    pub logged_in: bool,
}

struct InFlight {
    outcome: MatchOutcome,
    dispatched: bool,
}

pub struct OutcomeController<S> {
    state: OutcomeState,
    teams: Teams,
    store: S,
    config: OutcomeConfig,
    clock: Clock,
    in_flight: Option<InFlight>,
    success_timer: DisplayTimer,
    confetti_timer: DisplayTimer,
    dim_timer: DisplayTimer,
    dimmed: bool,
    credential_cached: bool,
}

impl<S: CredentialStore> OutcomeController<S> {
    pub fn new(store: S, config: OutcomeConfig) -> Self {
        Self::with_clock(store, config, system_clock())
    }

    /// `clock` stamps `occurred_at` on submitted outcomes.
    pub fn with_clock(store: S, config: OutcomeConfig, clock: Clock) -> Self {
        let mut controller = Self {
            state: OutcomeState::Idle,
            teams: Teams::default(),
            store,
            config,
            clock,
            in_flight: None,
            success_timer: DisplayTimer::default(),
            confetti_timer: DisplayTimer::default(),
            dim_timer: DisplayTimer::default(),
            dimmed: false,
            credential_cached: false,
        };
        controller.refresh_login();
        controller
    }

    pub fn state(&self) -> &OutcomeState {
        &self.state
    }

    pub fn teams(&self) -> &Teams {
        &self.teams
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, OutcomeState::Submitting { .. })
    }

    /// Replace the displayed teams. Any pending selection is dropped.
    pub fn set_teams(&mut self, teams: Teams) -> Result<(), OutcomeError> {
        if self.is_submitting() {
            return Err(OutcomeError::Busy);
        }
        self.teams = teams;
        if self.state != OutcomeState::Success {
            self.enter(OutcomeState::Idle);
        }
        self.touch();
        Ok(())
    }

    /// Declare `side` the winner, or deselect it if it is already the active choice.
    pub fn select_team(&mut self, side: Side) -> Result<(), OutcomeError> {
        self.touch();
        match self.state {
            OutcomeState::Submitting { .. } | OutcomeState::Success => {
                log::debug!("ignoring selection of team {side} while {}", self.state.name());
                return Ok(());
            }
            OutcomeState::TeamSelected { side: current }
            | OutcomeState::AwaitingSecret { side: current, .. }
            | OutcomeState::Error { side: current, .. }
                if current == side =>
            {
                self.enter(OutcomeState::Idle);
                return Ok(());
            }
            _ => {}
        }
        self.check_teams()?;
        self.enter(OutcomeState::TeamSelected { side });
        Ok(())
    }

    /// Answer the credential prompt.
    pub fn provide_credential(&mut self, secret: &str) -> Result<(), OutcomeError> {
        self.touch();
        match self.state {
            OutcomeState::AwaitingSecret { side, .. } => {
                self.enter(OutcomeState::ValidatingSecret {
                    side,
                    secret: secret.to_string(),
                    source: SecretSource::Prompt,
                });
                Ok(())
            }
            _ => Err(self.invalid("provide a credential")),
        }
    }

    pub fn cancel_credential_prompt(&mut self) -> Result<(), OutcomeError> {
        self.touch();
        match self.state {
            OutcomeState::AwaitingSecret { .. } => {
                self.enter(OutcomeState::Idle);
                Ok(())
            }
            _ => Err(self.invalid("cancel the credential prompt")),
        }
    }

    /// Run credential resolution again for the team that failed.
    pub fn retry(&mut self) -> Result<(), OutcomeError> {
        self.touch();
        match self.state {
            OutcomeState::Error { side, .. } => {
                self.check_teams()?;
                self.enter(OutcomeState::TeamSelected { side });
                Ok(())
            }
            _ => Err(self.invalid("retry")),
        }
    }

    /// The payload to send, handed out once per entry into `Submitting`.
    pub fn take_submission(&mut self) -> Option<SubmissionPayload> {
        if !self.is_submitting() {
            return None;
        }
        let flight = self.in_flight.as_mut()?;
        if flight.dispatched {
            return None;
        }
        flight.dispatched = true;
        Some(flight.outcome.payload())
    }

    /// Apply the gateway's answer. Returns the notification for the roster owner on success.
    pub fn complete_submission(
        &mut self,
        result: Result<SubmissionReceipt, SubmissionError>,
    ) -> Option<OutcomeRecorded> {
        let side = match self.state {
            OutcomeState::Submitting { side, .. } => side,
            _ => {
                log::warn!("dropping submission result received while {}", self.state.name());
                return None;
            }
        };
        let flight = match self.in_flight.take() {
            Some(f) if f.dispatched => f,
            other => {
                self.in_flight = other;
                log::warn!("dropping submission result for an outcome that was never sent");
                return None;
            }
        };

        match result {
            Ok(receipt) => {
                log::info!(
                    "result '{}' recorded{}",
                    flight.outcome.match_name,
                    receipt.message.map(|m| format!(": {m}")).unwrap_or_default()
                );
                let recorded = flight.outcome.recorded();
                self.enter(OutcomeState::Success);
                Some(recorded)
            }
            Err(e) => {
                let message = e.to_string();
                log::warn!("submitting result '{}' failed: {message}", flight.outcome.match_name);
                let message = if message.trim().is_empty() {
                    GENERIC_SUBMIT_FAILURE.to_string()
                } else {
                    message
                };
                self.enter(OutcomeState::Error { side, message });
                None
            }
        }
    }

    /// Send the pending outcome (if any) and apply the result.
    pub async fn submit_pending<G: SubmissionGateway>(&mut self, gateway: &G) -> Option<OutcomeRecorded> {
        let payload = self.take_submission()?;
        let result = gateway.submit(&payload).await;
        self.complete_submission(result)
    }

    /// Log out: drop the cached credential so the next selection prompts again.
    ///
    /// A submission already in flight keeps the credential it captured.
    pub fn forget_credential(&mut self) -> Result<(), OutcomeError> {
        self.touch();
        let cleared = self.store.delete();
        self.refresh_login();
        match cleared {
            Ok(()) => {
                log::info!("cached credential cleared");
                Ok(())
            }
            Err(e) => Err(OutcomeError::CredentialCache(e.to_string())),
        }
    }

    /// Fire due timers and re-check the credential cache, which can expire on its own. Call periodically.
    pub fn tick(&mut self) {
        self.refresh_login();
        if self.success_timer.fire_if_due() && self.state == OutcomeState::Success {
            self.enter(OutcomeState::Idle);
        }
        self.confetti_timer.fire_if_due();
        if self.dim_timer.fire_if_due() {
            log::debug!("no activity, dimming the result");
            self.dimmed = true;
        }
    }

    pub fn view(&self) -> OutcomeView {
        let banner = match &self.state {
            OutcomeState::AwaitingSecret { error: Some(e), .. } => Some(Banner {
                kind: BannerKind::Validation,
                message: e.to_string(),
            }),
            OutcomeState::Error { message, .. } => Some(Banner {
                kind: BannerKind::Error,
                message: message.clone(),
            }),
            OutcomeState::Success => Some(Banner {
                kind: BannerKind::Success,
                message: "Match result recorded".to_string(),
            }),
            _ => None,
        };
        OutcomeView {
            state: self.state.name(),
            selected: self.state.selected_side(),
            prompt_open: matches!(self.state, OutcomeState::AwaitingSecret { .. }),
            banner,
            confetti_active: self.confetti_timer.is_armed(),
            dimmed: self.dimmed,
            interaction_enabled: !self.is_submitting(),
            logged_in: self.credential_cached,
        }
    }

    fn check_teams(&self) -> Result<(), OutcomeError> {
        if !self.teams.both_filled() {
            return Err(OutcomeError::EmptyTeam);
        }
        if self.teams.overlap() {
            return Err(OutcomeError::OverlappingTeams);
        }
        Ok(())
    }

    fn refresh_login(&mut self) {
        self.credential_cached = match self.store.exists() {
            Ok(cached) => cached,
            Err(e) => {
                log::warn!("could not read cached credential: {e}");
                false
            }
        };
    }

    fn invalid(&self, action: &'static str) -> OutcomeError {
        OutcomeError::InvalidAction {
            action,
            state: self.state.name(),
        }
    }

    /// Operator activity: undim and restart the inactivity countdown.
    fn touch(&mut self) {
        self.dimmed = false;
        if self.teams.is_empty() {
            self.dim_timer.cancel();
        } else {
            self.dim_timer.arm(self.config.inactivity_dim);
        }
    }

    /// Move to `next` and run entry actions until a state that waits for input.
    fn enter(&mut self, next: OutcomeState) {
        let mut next = Some(next);
        while let Some(state) = next.take() {
            log::debug!("outcome: {} -> {}", self.state.name(), state.name());
            self.state = state;
            next = self.on_entry();
        }
    }

    fn on_entry(&mut self) -> Option<OutcomeState> {
        match self.state.clone() {
            OutcomeState::Idle => {
                self.in_flight = None;
                self.success_timer.cancel();
                None
            }
            OutcomeState::TeamSelected { side } => Some(self.resolve_cached(side)),
            OutcomeState::ValidatingSecret { side, secret, source } => {
                let next = self.validate(side, &secret, source);
                self.refresh_login();
                Some(next)
            }
            OutcomeState::Submitting { side, credential } => self.prepare(side, credential),
            OutcomeState::Success => {
                self.success_timer.arm(self.config.success_display);
                self.confetti_timer
                    .arm(self.config.confetti.min(self.config.success_display));
                None
            }
            OutcomeState::AwaitingSecret { .. } | OutcomeState::Error { .. } => None,
        }
    }

    fn resolve_cached(&mut self, side: Side) -> OutcomeState {
        match self.store.get() {
            Ok(Some(secret)) => OutcomeState::ValidatingSecret {
                side,
                secret,
                source: SecretSource::Cache,
            },
            Ok(None) => OutcomeState::AwaitingSecret { side, error: None },
            Err(e) => {
                log::warn!("could not read cached credential: {e}");
                OutcomeState::AwaitingSecret { side, error: None }
            }
        }
    }

    fn validate(&mut self, side: Side, secret: &str, source: SecretSource) -> OutcomeState {
        match Credential::parse(secret) {
            Ok(credential) => {
                if let Err(e) = self.store.set(credential.as_str(), self.config.credential_ttl_days) {
                    log::warn!("could not cache credential: {e}");
                }
                OutcomeState::Submitting { side, credential }
            }
            Err(error) => {
                if source == SecretSource::Cache {
                    log::info!("cached credential is invalid ({error}), clearing it");
                    if let Err(e) = self.store.delete() {
                        log::warn!("could not clear cached credential: {e}");
                    }
                }
                OutcomeState::AwaitingSecret {
                    side,
                    error: Some(error),
                }
            }
        }
    }

    fn prepare(&mut self, side: Side, credential: Credential) -> Option<OutcomeState> {
        match MatchOutcome::new(self.teams.clone(), side, (self.clock)(), credential) {
            Some(outcome) => {
                self.in_flight = Some(InFlight {
                    outcome,
                    dispatched: false,
                });
                None
            }
            None => Some(OutcomeState::Error {
                side,
                message: OutcomeError::EmptyTeam.to_string(),
            }),
        }
    }
}
