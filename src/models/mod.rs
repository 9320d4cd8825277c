//! Data structures for the match console: players, teams, credentials, outcomes.

mod credential;
mod outcome;
mod player;
mod team;

pub use credential::{Credential, CredentialError};
pub use outcome::{
    match_name, MatchOutcome, OutcomeRecorded, SubmissionPayload, SubmissionReceipt,
    NICKNAME_SEPARATOR, OCCURRED_AT_FORMAT, SIDES_SEPARATOR,
};
pub use player::{Player, PlayerId, PlayerKey, UNREGISTERED_ID};
pub use team::{Side, Teams};
