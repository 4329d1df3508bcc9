use super::RankingConfig;
use crate::embed::cosine_similarity;
use crate::profile::Profile;

const MAX_RATING: f64 = 5.0;

/// 1.0 for equal ages, falling linearly to 0.0 at `max_age_diff` apart.
pub fn age_score(requester: &Profile, candidate: &Profile, config: &RankingConfig) -> f64 {
    let a = requester.age_or(config.default_age) as f64;
    let b = candidate.age_or(config.default_age) as f64;
    if config.max_age_diff <= 0.0 {
        return if a == b { 1.0 } else { 0.0 };
    }
    (1.0 - (a - b).abs() / config.max_age_diff).max(0.0)
}

/// Candidate rating normalised from the 0..=5 scale.
pub fn reputation_score(candidate: &Profile) -> f64 {
    candidate.rating_or_default() / MAX_RATING
}

/// Hybrid match score in 0..=100, two decimals.
pub fn hybrid_score(
    requester: &Profile,
    requester_vec: &[f32],
    candidate: &Profile,
    candidate_vec: &[f32],
    config: &RankingConfig,
) -> f64 {
    let w = &config.weights;
    let semantic = cosine_similarity(requester_vec, candidate_vec);
    let total = semantic * w.semantic
        + age_score(requester, candidate, config) * w.age
        + reputation_score(candidate) * w.reputation;
    to_percent(total)
}

/// Pure similarity as a 0..=100 score, two decimals.
pub fn semantic_score(query_vec: &[f32], candidate_vec: &[f32]) -> f64 {
    to_percent(cosine_similarity(query_vec, candidate_vec))
}

// NaN would slip through `clamp`, so non-finite input scores 0.
fn to_percent(fraction: f64) -> f64 {
    if !fraction.is_finite() {
        return 0.0;
    }
    round2(fraction * 100.0).clamp(0.0, 100.0)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
