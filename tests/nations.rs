//! Integration tests for nation assignment.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use team_balancer_web::logic::{assign_nations_from, NATION_POOL};
use team_balancer_web::{assign_nations, Player, Teams};

fn teams(n: usize, m: usize) -> Teams {
    let a = (0..n).map(|i| Player::new(i as i64, format!("A{i}"), 1.0)).collect();
    let b = (0..m).map(|i| Player::unregistered(format!("B{i}"), 1.0)).collect();
    Teams::new(a, b)
}

#[test]
fn draws_max_size_distinct_nations_and_labels_everyone() {
    for (n, m) in [(1, 1), (3, 2), (2, 5), (6, 6), (0, 4)] {
        let t = teams(n, m);
        let mut rng = StdRng::seed_from_u64(42);
        let a = assign_nations(&t, &mut rng).unwrap();

        assert_eq!(a.pairings.len(), n.max(m));
        let distinct: HashSet<_> = a.pairings.iter().map(|p| p.nation).collect();
        assert_eq!(distinct.len(), n.max(m), "{n}v{m}");

        for p in t.team_a.iter().chain(t.team_b.iter()) {
            let nation = a.nation_of(p).unwrap();
            assert!(NATION_POOL.contains(&nation));
        }
        assert_eq!(a.len(), n + m);
    }
}

#[test]
fn mirrored_players_share_a_nation() {
    let t = teams(3, 3);
    let mut rng = StdRng::seed_from_u64(7);
    let a = assign_nations(&t, &mut rng).unwrap();
    for pairing in &a.pairings {
        let pa = t.team_a.iter().find(|p| Some(&p.nickname) == pairing.team_a.as_ref()).unwrap();
        let pb = t.team_b.iter().find(|p| Some(&p.nickname) == pairing.team_b.as_ref()).unwrap();
        assert_eq!(a.nation_of(pa), Some(pairing.nation));
        assert_eq!(a.nation_of(pb), Some(pairing.nation));
    }
}

#[test]
fn same_seed_gives_same_assignment() {
    let t = teams(4, 3);
    let first = assign_nations(&t, &mut StdRng::seed_from_u64(99)).unwrap();
    let second = assign_nations(&t, &mut StdRng::seed_from_u64(99)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn mapping_survives_reordering() {
    let t = teams(3, 2);
    let a = assign_nations(&t, &mut StdRng::seed_from_u64(3)).unwrap();
    let mut reordered = t.clone();
    reordered.team_a.reverse();
    for (before, after) in t.team_a.iter().zip(reordered.team_a.iter().rev()) {
        assert_eq!(a.nation_of(before), a.nation_of(after));
    }
}

#[test]
fn extra_players_on_the_larger_side_have_no_mirror() {
    let t = teams(4, 2);
    let a = assign_nations_from(&t, NATION_POOL, &mut StdRng::seed_from_u64(5)).unwrap();
    let unmatched = a.pairings.iter().filter(|p| p.team_b.is_none()).count();
    assert_eq!(unmatched, 2);
    assert!(a.pairings.iter().all(|p| p.team_a.is_some()));
}
