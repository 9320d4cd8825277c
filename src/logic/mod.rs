//! Console logic: fairness, nations, and the outcome confirmation state machine.

mod controller;
mod fairness;
mod feedback;
mod nations;

pub use controller::{
    Banner, BannerKind, OutcomeConfig, OutcomeController, OutcomeError, OutcomeState, OutcomeView,
    SecretSource, GENERIC_SUBMIT_FAILURE,
};
pub use fairness::{balance_percentage, score_sums, score_teams, BalanceReport, BalanceTier, TierThresholds};
pub use feedback::DisplayTimer;
pub use nations::{
    assign_nations, assign_nations_from, NationAssignment, NationError, NationPairing, NATION_POOL,
};
