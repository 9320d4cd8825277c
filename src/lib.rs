//! Team balancer match console: library with models, fairness/nation logic and outcome confirmation.

pub mod config;
pub mod console;
pub mod gateway;
pub mod logic;
pub mod models;
pub mod store;

pub use config::AppConfig;
pub use console::{spawn_submission, Console, ConsoleSnapshot, SharedConsole};
pub use gateway::{
    BalanceClient, HttpSubmissionGateway, ScoreSnapshot, ScoringApi, SubmissionError, SubmissionGateway,
};
pub use logic::{
    assign_nations, balance_percentage, score_teams, BalanceReport, BalanceTier, NationAssignment,
    NationError, OutcomeConfig, OutcomeController, OutcomeError, OutcomeState, OutcomeView,
    TierThresholds,
};
pub use models::{
    Credential, CredentialError, MatchOutcome, OutcomeRecorded, Player, PlayerId, PlayerKey, Side,
    SubmissionPayload, SubmissionReceipt, Teams,
};
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore, StoreError};
