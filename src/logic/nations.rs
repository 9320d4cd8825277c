//! Cosmetic nation assignment: mirrored nations for the i-th player of each team.

use crate::models::{Player, PlayerKey, Teams};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Nations playable in a match, in display order.
pub const NATION_POOL: &[&str] = &[
    "Algeria", "Austria", "Bavaria", "Denmark", "England", "France", "Hungary", "Netherlands",
    "Piedmont", "Poland", "Portugal", "Prussia", "Russia", "Saxony", "Spain", "Sweden",
    "Switzerland", "Turkey", "Ukraine", "Venice",
];

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum NationError {
    #[error("Need {needed} distinct nations but the pool only has {available}")]
    PoolExhausted { needed: usize, available: usize },
}

/// One drawn nation and the player from each side that plays it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NationPairing {
    pub nation: &'static str,
    pub team_a: Option<String>,
    pub team_b: Option<String>,
}

/// Result of one assignment call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NationAssignment {
    pub pairings: Vec<NationPairing>,
    by_player: HashMap<PlayerKey, &'static str>,
}

impl NationAssignment {
    pub fn nation_of(&self, player: &Player) -> Option<&'static str> {
        self.by_player.get(&player.key()).copied()
    }

    pub fn len(&self) -> usize {
        self.by_player.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_player.is_empty()
    }
}

/// Assign nations from [`NATION_POOL`].
pub fn assign_nations<R: Rng + ?Sized>(teams: &Teams, rng: &mut R) -> Result<NationAssignment, NationError> {
    assign_nations_from(teams, NATION_POOL, rng)
}

/// Shuffle each team, draw `max(|A|, |B|)` distinct nations and pair them by position.
///
/// The mapping is keyed by player identity, so it survives later reordering of the teams.
pub fn assign_nations_from<R: Rng + ?Sized>(
    teams: &Teams,
    pool: &[&'static str],
    rng: &mut R,
) -> Result<NationAssignment, NationError> {
    let needed = teams.team_a.len().max(teams.team_b.len());
    if needed > pool.len() {
        return Err(NationError::PoolExhausted {
            needed,
            available: pool.len(),
        });
    }

    let mut team_a: Vec<&Player> = teams.team_a.iter().collect();
    let mut team_b: Vec<&Player> = teams.team_b.iter().collect();
    team_a.shuffle(rng);
    team_b.shuffle(rng);

    let nations: Vec<&'static str> = pool.choose_multiple(rng, needed).copied().collect();

    let mut assignment = NationAssignment::default();
    for (i, &nation) in nations.iter().enumerate() {
        let a = team_a.get(i).copied();
        let b = team_b.get(i).copied();
        for p in a.iter().chain(b.iter()) {
            assignment.by_player.insert(p.key(), nation);
        }
        assignment.pairings.push(NationPairing {
            nation,
            team_a: a.map(|p| p.nickname.clone()),
            team_b: b.map(|p| p.nickname.clone()),
        });
    }
    log::debug!("assigned {} nation(s) to {} player(s)", nations.len(), assignment.len());
    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn empty_teams_draw_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = assign_nations(&Teams::default(), &mut rng).unwrap();
        assert!(a.is_empty());
        assert!(a.pairings.is_empty());
    }

    #[test]
    fn small_pool_is_an_error() {
        let teams = Teams::new(
            vec![Player::new(1, "Ann", 1.0), Player::new(2, "Bo", 1.0), Player::new(3, "Cy", 1.0)],
            vec![Player::new(4, "Dee", 1.0)],
        );
        let mut rng = StdRng::seed_from_u64(1);
        let err = assign_nations_from(&teams, &["France", "Spain"], &mut rng).unwrap_err();
        assert_eq!(err, NationError::PoolExhausted { needed: 3, available: 2 });
    }
}
