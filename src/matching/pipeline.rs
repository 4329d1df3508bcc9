use tracing::{debug, error};

use super::scoring::{hybrid_score, semantic_score};
use super::RankingConfig;
use crate::embed::{Embedding, EmbeddingClient};
use crate::profile::text::query_text;
use crate::profile::{synthesize, Profile, ScoredCandidate};

/// Ranks candidate profiles against a requester or a free-text query.
///
/// Each call makes exactly one batched embedding request; everything else is
/// synchronous. Holds no per-request state, so one instance can serve any
/// number of concurrent requests.
#[derive(Clone)]
pub struct Matchmaker {
    embedder: EmbeddingClient,
    config: RankingConfig,
}

impl Matchmaker {
    pub fn new(embedder: EmbeddingClient, config: RankingConfig) -> Self {
        Self { embedder, config }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Every candidate comes back exactly once, best match first. The caller
    /// is expected to have removed the requester from `candidates`.
    pub async fn rank_collaborators(
        &self,
        requester: &Profile,
        candidates: &[Profile],
    ) -> Vec<ScoredCandidate> {
        let texts = std::iter::once(synthesize(requester))
            .chain(candidates.iter().map(synthesize))
            .collect();
        let embeddings = self.embedder.embed(texts).await;
        rank_with_vectors(requester, candidates, embeddings.vectors(), &self.config)
    }

    /// Pure semantic ranking against `query`; candidates at or below the
    /// search threshold are dropped.
    pub async fn search(&self, query: &str, candidates: &[Profile]) -> Vec<ScoredCandidate> {
        let texts = std::iter::once(query_text(query))
            .chain(candidates.iter().map(synthesize))
            .collect();
        let embeddings = self.embedder.embed(texts).await;
        search_with_vectors(candidates, embeddings.vectors(), &self.config)
    }
}

/// Score `candidates` given the vectors of one embed call: the requester's
/// first, then one per candidate in order.
pub fn rank_with_vectors(
    requester: &Profile,
    candidates: &[Profile],
    vectors: &[Embedding],
    config: &RankingConfig,
) -> Vec<ScoredCandidate> {
    let requester_vec = vectors.first().map(Vec::as_slice).unwrap_or_default();
    let candidate_vecs = vectors.get(1..).unwrap_or_default();

    let mut ranked: Vec<ScoredCandidate> = candidates
        .iter()
        .enumerate()
        .map(|(i, candidate)| {
            let score = match candidate_vecs.get(i) {
                Some(vec) => hybrid_score(requester, requester_vec, candidate, vec, config),
                None => 0.0,
            };
            ScoredCandidate::new(candidate.clone(), score)
        })
        .collect();

    sort_descending(&mut ranked);
    debug!(candidates = ranked.len(), "ranked collaborators");
    ranked
}

/// Search counterpart of [`rank_with_vectors`]: the first vector is the query.
pub fn search_with_vectors(
    candidates: &[Profile],
    vectors: &[Embedding],
    config: &RankingConfig,
) -> Vec<ScoredCandidate> {
    let Some(query_vec) = vectors.first() else {
        error!("no embedding for search query");
        return Vec::new();
    };
    let candidate_vecs = &vectors[1..];

    let mut results: Vec<ScoredCandidate> = candidates
        .iter()
        .enumerate()
        .map(|(i, candidate)| {
            let vec = candidate_vecs.get(i).map(Vec::as_slice).unwrap_or_default();
            ScoredCandidate::new(candidate.clone(), semantic_score(query_vec, vec))
        })
        .filter(|scored| scored.match_score > config.search_threshold)
        .collect();

    sort_descending(&mut results);
    debug!(
        candidates = candidates.len(),
        matched = results.len(),
        "searched collaborators"
    );
    results
}

// Stable, so equal scores keep input order.
fn sort_descending(scored: &mut [ScoredCandidate]) {
    scored.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::testing::{FailingEmbedder, FixedEmbedder};
    use std::sync::Arc;

    fn person(id: &str, skills: &[&str], age: Option<i32>, rating: Option<f64>) -> Profile {
        let mut p = Profile::new(id);
        p.skills_known = skills.iter().map(|s| s.to_string()).collect();
        p.age = age;
        p.rating = rating;
        p
    }

    fn matchmaker(embedder: impl crate::embed::Embedder + 'static) -> Matchmaker {
        Matchmaker::new(
            EmbeddingClient::new(Arc::new(embedder)),
            RankingConfig::default(),
        )
    }

    fn assert_sorted(results: &[ScoredCandidate]) {
        assert!(results
            .windows(2)
            .all(|w| w[0].match_score >= w[1].match_score));
        assert!(results
            .iter()
            .all(|r| (0.0..=100.0).contains(&r.match_score)));
    }

    #[tokio::test]
    async fn identical_semantics_and_profile_scores_hundred() {
        let requester = person("me", &["Rust"], Some(25), None);
        let candidate = person("a", &["Go"], Some(25), Some(5.0));
        let mm = matchmaker(FixedEmbedder::uniform(vec![0.5, 0.5, 0.5]));

        let ranked = mm.rank_collaborators(&requester, &[candidate]).await;

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].user_id(), "a");
        assert_eq!(ranked[0].match_score, 100.0);
    }

    #[tokio::test]
    async fn ranks_every_candidate_best_first() {
        let requester = person("me", &["Rust"], Some(30), None);
        let close = person("close", &["Rust"], Some(30), Some(4.0));
        let far = person("far", &["Knitting"], Some(60), Some(1.0));
        let mid = person("mid", &["C"], Some(35), Some(3.0));

        let embedder = FixedEmbedder::uniform(vec![0.0, 1.0])
            .with(synthesize(&requester), vec![1.0, 0.0])
            .with(synthesize(&close), vec![1.0, 0.1])
            .with(synthesize(&mid), vec![1.0, 1.0]);
        let mm = matchmaker(embedder);

        let ranked = mm
            .rank_collaborators(&requester, &[far.clone(), mid.clone(), close.clone()])
            .await;

        let order: Vec<&str> = ranked.iter().map(|r| r.user_id()).collect();
        assert_eq!(order, vec!["close", "mid", "far"]);
        assert_sorted(&ranked);
        assert_eq!(ranked[2].match_score, 3.0);
    }

    #[tokio::test]
    async fn provider_failure_falls_back_to_profile_signals() {
        let requester = person("me", &[], Some(25), None);
        let a = person("a", &[], Some(25), Some(5.0));
        let b = person("b", &[], Some(40), Some(0.0));
        let mm = matchmaker(FailingEmbedder);

        let ranked = mm.rank_collaborators(&requester, &[b, a]).await;

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].user_id(), "a");
        assert_eq!(ranked[0].match_score, 30.0);
        assert_eq!(ranked[1].match_score, 0.0);
    }

    #[tokio::test]
    async fn offline_client_still_ranks_everyone() {
        let requester = person("me", &["Rust"], None, None);
        let candidates: Vec<Profile> = (0..5)
            .map(|i| person(&format!("c{i}"), &["Python"], Some(20 + i * 3), Some(i as f64)))
            .collect();
        let mm = Matchmaker::new(EmbeddingClient::offline(64), RankingConfig::default());

        let first = mm.rank_collaborators(&requester, &candidates).await;
        let second = mm.rank_collaborators(&requester, &candidates).await;

        assert_eq!(first.len(), candidates.len());
        assert_sorted(&first);
        assert_eq!(first, second);
    }

    #[test]
    fn missing_candidate_vector_scores_zero() {
        let requester = person("me", &[], Some(25), None);
        let a = person("a", &[], Some(25), Some(5.0));
        let b = person("b", &[], Some(25), Some(5.0));
        let vectors = vec![vec![1.0, 0.0], vec![1.0, 0.0]];

        let ranked = rank_with_vectors(&requester, &[a, b], &vectors, &RankingConfig::default());

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].user_id(), "a");
        assert_eq!(ranked[0].match_score, 100.0);
        assert_eq!(ranked[1].user_id(), "b");
        assert_eq!(ranked[1].match_score, 0.0);
    }

    #[test]
    fn ties_keep_input_order() {
        let requester = person("me", &[], None, None);
        let candidates: Vec<Profile> = ["x", "y", "z"]
            .iter()
            .map(|id| person(id, &[], None, None))
            .collect();
        let vectors = vec![vec![1.0]; 4];

        let ranked = rank_with_vectors(&requester, &candidates, &vectors, &RankingConfig::default());

        let order: Vec<&str> = ranked.iter().map(|r| r.user_id()).collect();
        assert_eq!(order, vec!["x", "y", "z"]);
    }

    #[test]
    fn huge_vector_components_keep_scores_defined() {
        let requester = person("me", &[], Some(25), None);
        let a = person("a", &[], Some(25), Some(5.0));
        let b = person("b", &[], Some(40), None);
        let big = vec![3e19f32, 1e19];
        let vectors = vec![big.clone(), big.clone(), big];

        let ranked = rank_with_vectors(&requester, &[b, a], &vectors, &RankingConfig::default());

        assert_sorted(&ranked);
        assert_eq!(ranked[0].user_id(), "a");
        assert_eq!(ranked[0].match_score, 100.0);
        assert_eq!(ranked[1].match_score, 70.0);
        let json = serde_json::to_value(&ranked[0]).unwrap();
        assert_eq!(json["matchScore"], 100.0);
    }

    #[test]
    fn empty_candidate_set() {
        let requester = person("me", &[], None, None);
        let ranked = rank_with_vectors(&requester, &[], &[vec![1.0]], &RankingConfig::default());
        assert!(ranked.is_empty());
    }

    #[test]
    fn search_threshold_is_exclusive() {
        let at = person("at", &[], None, None);
        let above = person("above", &[], None, None);
        let y_at = (1.0f32 - 0.1 * 0.1).sqrt();
        let y_above = (1.0f32 - 0.1001 * 0.1001).sqrt();
        let vectors = vec![vec![1.0, 0.0], vec![0.1, y_at], vec![0.1001, y_above]];

        let results = search_with_vectors(&[at, above], &vectors, &RankingConfig::default());

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].user_id(), "above");
        assert_eq!(results[0].match_score, 10.01);
    }

    #[test]
    fn search_without_query_vector_is_empty() {
        let results = search_with_vectors(
            &[person("a", &[], None, None)],
            &[],
            &RankingConfig::default(),
        );
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn search_ignores_age_and_rating() {
        let query = "rust mentor";
        let rustacean = person("rust", &["Rust"], Some(70), Some(0.0));
        let painter = person("paint", &["Painting"], Some(25), Some(5.0));
        let embedder = FixedEmbedder::uniform(vec![0.0, 1.0])
            .with(query_text(query), vec![1.0, 0.0])
            .with(synthesize(&rustacean), vec![1.0, 0.0]);
        let mm = matchmaker(embedder);

        let results = mm.search(query, &[painter, rustacean]).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].user_id(), "rust");
        assert_eq!(results[0].match_score, 100.0);
    }

    #[tokio::test]
    async fn search_with_failed_provider_returns_nothing() {
        let mm = matchmaker(FailingEmbedder);
        let results = mm
            .search("anything", &[person("a", &["Rust"], None, Some(5.0))])
            .await;
        assert!(results.is_empty());
    }
}
