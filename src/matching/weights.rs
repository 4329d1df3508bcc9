use serde::{Deserialize, Serialize};

use crate::profile::DEFAULT_AGE;

/// Share of the hybrid score carried by embedding similarity.
pub const W_SEMANTIC: f64 = 0.70;
/// Share carried by age proximity.
pub const W_AGE: f64 = 0.15;
/// Share carried by the candidate's rating.
pub const W_REPUTATION: f64 = 0.15;
/// Age gap (years) at which the age score reaches zero.
pub const MAX_AGE_DIFF: f64 = 15.0;
/// Search results must score strictly above this percentage.
pub const SEARCH_THRESHOLD: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub semantic: f64,
    pub age: f64,
    pub reputation: f64,
}

impl Weights {
    pub const DEFAULT: Weights = Weights {
        semantic: W_SEMANTIC,
        age: W_AGE,
        reputation: W_REPUTATION,
    };

    pub fn sum(&self) -> f64 {
        self.semantic + self.age + self.reputation
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Immutable ranking parameters handed to a [`super::Matchmaker`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub max_age_diff: f64,
    /// Age assumed when a profile has none
    pub default_age: i32,
    /// Exclusive lower bound for search scores (0..=100)
    pub search_threshold: f64,
    pub weights: Weights,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            max_age_diff: MAX_AGE_DIFF,
            default_age: DEFAULT_AGE,
            search_threshold: SEARCH_THRESHOLD,
            weights: Weights::DEFAULT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        assert!((Weights::DEFAULT.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn defaults_match_constants() {
        let config = RankingConfig::default();
        assert_eq!(config.max_age_diff, 15.0);
        assert_eq!(config.default_age, 25);
        assert_eq!(config.search_threshold, 10.0);
        assert_eq!(config.weights, Weights::DEFAULT);
    }
}
