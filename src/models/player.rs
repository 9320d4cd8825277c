//! Player and PlayerKey data structures.

use serde::{Deserialize, Serialize};

/// Identifier assigned by the scoring service. `UNREGISTERED_ID` marks a player it does not know yet.
pub type PlayerId = i64;

/// Id carried by players that have no record on the scoring service.
pub const UNREGISTERED_ID: PlayerId = -1;

/// Stable identity of a player, independent of where they sit in a team list.
///
/// Registered players are keyed by id; unregistered ones (id == -1) by nickname.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKey {
    Id(PlayerId),
    Nickname(String),
}

/// A player on the roster snapshot handed to the console.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(default = "unregistered")]
    pub id: PlayerId,
    pub nickname: String,
    pub score: f64,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
}

fn unregistered() -> PlayerId {
    UNREGISTERED_ID
}

impl Player {
    /// Create a registered player with the given id. Win/loss counts start at zero.
    pub fn new(id: PlayerId, nickname: impl Into<String>, score: f64) -> Self {
        Self {
            id,
            nickname: nickname.into(),
            score,
            wins: 0,
            losses: 0,
        }
    }

    /// Create a player the scoring service has not registered yet.
    pub fn unregistered(nickname: impl Into<String>, score: f64) -> Self {
        Self::new(UNREGISTERED_ID, nickname, score)
    }

    pub fn is_registered(&self) -> bool {
        self.id != UNREGISTERED_ID
    }

    pub fn key(&self) -> PlayerKey {
        if self.is_registered() {
            PlayerKey::Id(self.id)
        } else {
            PlayerKey::Nickname(self.nickname.clone())
        }
    }

    /// Record a win for this player.
    pub fn add_win(&mut self) {
        self.wins += 1;
    }

    /// Record a loss for this player.
    pub fn add_loss(&mut self) {
        self.losses += 1;
    }
}
