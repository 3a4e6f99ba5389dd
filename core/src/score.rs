use serde::{Deserialize, Serialize};

use crate::*;

/// Points awarded for cleared candies.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreRules {
    pub points_per_candy: u32,
    /// Each chain after the first pays half the base points on top: x1, x1.5, x2 and so on.
    pub chain_multiplier: bool,
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self {
            points_per_candy: 10,
            chain_multiplier: true,
        }
    }
}

impl ScoreRules {
    /// Points for clearing `cleared` candies in chain number `chain` (1-based). Half points are
    /// rounded down.
    pub fn chain_points(&self, chain: u32, cleared: CellCount) -> u64 {
        let base = u64::from(cleared) * u64::from(self.points_per_candy);
        if self.chain_multiplier {
            base * (u64::from(chain) + 1) / 2
        } else {
            base
        }
    }
}

impl Resolution {
    pub fn score(&self, rules: &ScoreRules) -> u64 {
        self.matched_steps()
            .map(|step| rules.chain_points(step.chain(), matched_cell_count(step.groups())))
            .sum()
    }
}
