//! The operator console: displayed teams, the roster tally and the outcome controller.

use crate::gateway::{SubmissionError, SubmissionGateway};
use crate::logic::{
    assign_nations, score_teams, BalanceReport, NationAssignment, NationError, OutcomeConfig,
    OutcomeController, OutcomeError, OutcomeView, TierThresholds,
};
use crate::models::{OutcomeRecorded, Player, Side, SubmissionReceipt, Teams};
use crate::store::CredentialStore;
use rand::Rng;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// A console shared between request handlers and background tasks.
pub type SharedConsole<S> = Arc<Mutex<Console<S>>>;

/// Everything the screen needs in one response.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConsoleSnapshot {
    pub teams: Teams,
    pub fairness: Option<BalanceReport>,
    pub outcome: OutcomeView,
    pub roster: Vec<Player>,
}

pub struct Console<S> {
    roster: Vec<Player>,
    thresholds: TierThresholds,
    controller: OutcomeController<S>,
}

impl<S: CredentialStore> Console<S> {
    pub fn new(store: S, config: OutcomeConfig, thresholds: TierThresholds) -> Self {
        Self::with_controller(OutcomeController::new(store, config), thresholds)
    }

    pub fn with_controller(controller: OutcomeController<S>, thresholds: TierThresholds) -> Self {
        Self {
            roster: Vec::new(),
            thresholds,
            controller,
        }
    }

    pub fn roster(&self) -> &[Player] {
        &self.roster
    }

    pub fn teams(&self) -> &Teams {
        self.controller.teams()
    }

    pub fn controller(&self) -> &OutcomeController<S> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut OutcomeController<S> {
        &mut self.controller
    }

    /// Display a new split (e.g. the balancing service's answer). Rejected while submitting.
    ///
    /// Players not yet on the roster are added so their results can be tallied.
    pub fn show_teams(&mut self, teams: Teams) -> Result<(), OutcomeError> {
        self.controller.set_teams(teams)?;
        let incoming: Vec<Player> = self
            .controller
            .teams()
            .team_a
            .iter()
            .chain(self.controller.teams().team_b.iter())
            .filter(|p| !self.roster.iter().any(|r| r.key() == p.key()))
            .cloned()
            .collect();
        self.roster.extend(incoming);
        Ok(())
    }

    /// `None` when no teams are displayed.
    pub fn fairness(&self) -> Option<BalanceReport> {
        let teams = self.controller.teams();
        if teams.is_empty() {
            None
        } else {
            Some(score_teams(teams, &self.thresholds))
        }
    }

    pub fn nations<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<NationAssignment, NationError> {
        assign_nations(self.controller.teams(), rng)
    }

    /// Hand a submission result to the controller and, on success, refresh the tally.
    pub fn complete_submission(
        &mut self,
        result: Result<SubmissionReceipt, SubmissionError>,
    ) -> Option<OutcomeRecorded> {
        let recorded = self.controller.complete_submission(result)?;
        self.apply(&recorded);
        Some(recorded)
    }

    pub async fn submit_pending<G: SubmissionGateway>(&mut self, gateway: &G) -> Option<OutcomeRecorded> {
        let payload = self.controller.take_submission()?;
        let result = gateway.submit(&payload).await;
        self.complete_submission(result)
    }

    /// Winners +1 win, losers +1 loss, then clear the displayed teams.
    fn apply(&mut self, recorded: &OutcomeRecorded) {
        let (winners, losers) = match recorded.winner {
            Side::A => (&recorded.team_a, &recorded.team_b),
            Side::B => (&recorded.team_b, &recorded.team_a),
        };
        for p in self.roster.iter_mut() {
            if winners.contains(&p.nickname) {
                p.add_win();
            } else if losers.contains(&p.nickname) {
                p.add_loss();
            }
        }
        if let Err(e) = self.controller.set_teams(Teams::default()) {
            log::warn!("could not clear teams after recording the result: {e}");
        }
    }

    pub fn snapshot(&self) -> ConsoleSnapshot {
        ConsoleSnapshot {
            teams: self.controller.teams().clone(),
            fairness: self.fairness(),
            outcome: self.controller.view(),
            roster: self.roster.clone(),
        }
    }
}

/// Send the pending outcome (if any) on a detached task and apply the answer to `console`.
///
/// The task owns everything it needs, so the result still lands when whoever asked for the
/// submission goes away. The console lock is only held to take the payload and to apply the
/// result, never across the network call.
pub fn spawn_submission<S, G>(
    console: SharedConsole<S>,
    gateway: Arc<G>,
) -> Option<JoinHandle<Option<OutcomeRecorded>>>
where
    S: CredentialStore + Send + 'static,
    G: SubmissionGateway + Send + Sync + 'static,
{
    let payload = {
        let mut c = console.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        c.controller_mut().take_submission()?
    };
    Some(tokio::spawn(async move {
        let result = gateway.submit(&payload).await;
        let mut c = console.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let recorded = c.complete_submission(result)?;
        log::info!(
            "team {} won: {} vs {}",
            recorded.winner,
            recorded.team_a.join(", "),
            recorded.team_b.join(", ")
        );
        Some(recorded)
    }))
}
