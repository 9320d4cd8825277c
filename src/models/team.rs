//! Side and Teams for one two-sided match.

use crate::models::player::{Player, PlayerKey};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which side of the match (also which side won).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::A => "A",
            Side::B => "B",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two displayed teams. The first entry of each list is the team leader.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Teams {
    #[serde(rename = "teamA", default)]
    pub team_a: Vec<Player>,
    #[serde(rename = "teamB", default)]
    pub team_b: Vec<Player>,
}

impl Teams {
    pub fn new(team_a: Vec<Player>, team_b: Vec<Player>) -> Self {
        Self { team_a, team_b }
    }

    pub fn side(&self, side: Side) -> &[Player] {
        match side {
            Side::A => &self.team_a,
            Side::B => &self.team_b,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.team_a.is_empty() && self.team_b.is_empty()
    }

    /// Both sides have at least one player.
    pub fn both_filled(&self) -> bool {
        !self.team_a.is_empty() && !self.team_b.is_empty()
    }

    /// True when some player appears on both sides.
    pub fn overlap(&self) -> bool {
        let a: HashSet<PlayerKey> = self.team_a.iter().map(Player::key).collect();
        self.team_b.iter().any(|p| a.contains(&p.key()))
    }

    pub fn score_total(&self, side: Side) -> f64 {
        self.side(side).iter().map(|p| p.score).sum()
    }

    pub fn nicknames(&self, side: Side) -> Vec<String> {
        self.side(side).iter().map(|p| p.nickname.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_serializes_as_letter() {
        assert_eq!(serde_json::to_string(&Side::A).unwrap(), "\"A\"");
        assert_eq!(serde_json::from_str::<Side>("\"B\"").unwrap(), Side::B);
        assert_eq!(Side::A.other(), Side::B);
    }

    #[test]
    fn overlap_detects_shared_player() {
        let ann = Player::new(1, "Ann", 3.0);
        let teams = Teams::new(vec![ann.clone()], vec![Player::new(2, "Bo", 3.0), ann]);
        assert!(teams.overlap());
        let disjoint = Teams::new(vec![Player::new(1, "Ann", 3.0)], vec![Player::new(2, "Bo", 3.0)]);
        assert!(!disjoint.overlap());
    }

    #[test]
    fn teams_read_balancer_field_names() {
        let teams: Teams = serde_json::from_str(
            r#"{"teamA":[{"id":1,"nickname":"Ann","score":2.5}],"teamB":[]}"#,
        )
        .unwrap();
        assert_eq!(teams.nicknames(Side::A), vec!["Ann".to_string()]);
        assert!(!teams.both_filled());
    }
}
