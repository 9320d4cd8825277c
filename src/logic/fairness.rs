//! Fairness of a team split: balance percentage and qualitative tier.

use crate::models::{Side, Teams};
use serde::{Deserialize, Serialize};

/// Qualitative balance, best first.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceTier {
    Perfect,
    Good,
    Fair,
    Poor,
}

impl BalanceTier {
    pub fn description(self) -> &'static str {
        match self {
            BalanceTier::Perfect => "Perfect balance",
            BalanceTier::Good => "Good balance",
            BalanceTier::Fair => "Fair balance",
            BalanceTier::Poor => "Poor balance",
        }
    }
}

/// Minimum percentage for each tier above `Poor`. Must be descending.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub perfect: f64,
    pub good: f64,
    pub fair: f64,
}

impl TierThresholds {
    pub const CURRENT: TierThresholds = TierThresholds {
        perfect: 99.0,
        good: 96.0,
        fair: 93.0,
    };

    /// Looser thresholds used by earlier versions of the console.
    pub const LEGACY: TierThresholds = TierThresholds {
        perfect: 95.0,
        good: 85.0,
        fair: 70.0,
    };

    pub fn classify(&self, percentage: f64) -> BalanceTier {
        if percentage >= self.perfect {
            BalanceTier::Perfect
        } else if percentage >= self.good {
            BalanceTier::Good
        } else if percentage >= self.fair {
            BalanceTier::Fair
        } else {
            BalanceTier::Poor
        }
    }
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self::CURRENT
    }
}

/// Derived view of a split; recomputed whenever the teams change.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BalanceReport {
    pub percentage: f64,
    pub tier: BalanceTier,
    pub diff: f64,
    pub score_a: f64,
    pub score_b: f64,
    /// Side with the higher total, None when equal.
    pub leader: Option<Side>,
    pub description: &'static str,
}

/// `100 - diff/total*100`, clamped at 0; an empty split counts as perfectly balanced.
pub fn balance_percentage(score_a: f64, score_b: f64) -> f64 {
    let diff = (score_a - score_b).abs();
    let total = score_a + score_b;
    if total == 0.0 {
        return 100.0;
    }
    (100.0 - diff / total * 100.0).max(0.0)
}

pub fn score_sums(score_a: f64, score_b: f64, thresholds: &TierThresholds) -> BalanceReport {
    let percentage = balance_percentage(score_a, score_b);
    let tier = thresholds.classify(percentage);
    let leader = if score_a > score_b {
        Some(Side::A)
    } else if score_b > score_a {
        Some(Side::B)
    } else {
        None
    };
    BalanceReport {
        percentage,
        tier,
        diff: (score_a - score_b).abs(),
        score_a,
        score_b,
        leader,
        description: tier.description(),
    }
}

pub fn score_teams(teams: &Teams, thresholds: &TierThresholds) -> BalanceReport {
    score_sums(teams.score_total(Side::A), teams.score_total(Side::B), thresholds)
}
