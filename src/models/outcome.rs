//! MatchOutcome and the wire types exchanged with the scoring service.

use crate::models::credential::Credential;
use crate::models::player::{Player, PlayerId};
use crate::models::team::{Side, Teams};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Joins nicknames within one side of a match name.
pub const NICKNAME_SEPARATOR: &str = ", ";

/// Joins the two sides of a match name. Not expected inside any nickname.
pub const SIDES_SEPARATOR: &str = " ⚔ ";

/// Timestamp layout expected by the scoring service (UTC).
pub const OCCURRED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A winner declaration waiting to be submitted. Never persisted.
#[derive(Clone, Debug)]
pub struct MatchOutcome {
    pub teams: Teams,
    pub winner: Side,
    pub match_name: String,
    pub occurred_at: DateTime<Utc>,
    pub credential: Credential,
}

impl MatchOutcome {
    /// Returns None when either side is empty.
    pub fn new(teams: Teams, winner: Side, occurred_at: DateTime<Utc>, credential: Credential) -> Option<Self> {
        if !teams.both_filled() {
            return None;
        }
        let match_name = match_name(&teams);
        Some(Self {
            teams,
            winner,
            match_name,
            occurred_at,
            credential,
        })
    }

    pub fn payload(&self) -> SubmissionPayload {
        SubmissionPayload {
            team_a: self.teams.team_a.iter().map(|p| p.id).collect(),
            team_b: self.teams.team_b.iter().map(|p| p.id).collect(),
            winning_team: self.winner,
            match_name: self.match_name.clone(),
            occurred_at: self.occurred_at.format(OCCURRED_AT_FORMAT).to_string(),
            credential: self.credential.as_str().to_string(),
        }
    }

    pub fn recorded(&self) -> OutcomeRecorded {
        OutcomeRecorded {
            team_a: self.teams.nicknames(Side::A),
            team_b: self.teams.nicknames(Side::B),
            winner: self.winner,
        }
    }
}

/// `"Ann, Bo ⚔ Cy, Dee"`
pub fn match_name(teams: &Teams) -> String {
    let side = |players: &[Player]| {
        players
            .iter()
            .map(|p| p.nickname.as_str())
            .collect::<Vec<_>>()
            .join(NICKNAME_SEPARATOR)
    };
    format!("{}{}{}", side(&teams.team_a), SIDES_SEPARATOR, side(&teams.team_b))
}

/// Body of `POST /submit_game`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub team_a: Vec<PlayerId>,
    pub team_b: Vec<PlayerId>,
    pub winning_team: Side,
    pub match_name: String,
    pub occurred_at: String,
    pub credential: String,
}

/// Parsed success body of the scoring service. All fields optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub event_ids: Vec<i64>,
}

/// Sent to the roster owner after a successful submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeRecorded {
    pub team_a: Vec<String>,
    pub team_b: Vec<String>,
    pub winner: Side,
}
