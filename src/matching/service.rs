use anyhow::anyhow;
use std::sync::Arc;
use tracing::info;

use super::Matchmaker;
use crate::error::MatchError;
use crate::profile::{Profile, ScoredCandidate};
use crate::store::ProfileStore;

/// Rank everyone else in the store against `user_id`'s profile.
pub async fn ranked_collaborators(
    store: &Arc<dyn ProfileStore>,
    matchmaker: &Matchmaker,
    user_id: &str,
) -> Result<Vec<ScoredCandidate>, MatchError> {
    let (requester, candidates) = split_requester(load_profiles(store).await?, user_id);
    let requester = requester.ok_or_else(|| MatchError::ProfileNotFound(user_id.to_string()))?;

    let ranked = matchmaker.rank_collaborators(&requester, &candidates).await;
    info!(user_id, candidates = ranked.len(), "ranked collaborators");
    Ok(ranked)
}

/// Semantic search over everyone except `user_id`. The requester doesn't
/// need a profile of their own to search.
pub async fn search_collaborators(
    store: &Arc<dyn ProfileStore>,
    matchmaker: &Matchmaker,
    user_id: Option<&str>,
    query: &str,
) -> Result<Vec<ScoredCandidate>, MatchError> {
    let profiles = load_profiles(store).await?;
    let candidates = match user_id {
        Some(id) => split_requester(profiles, id).1,
        None => profiles,
    };

    let results = matchmaker.search(query, &candidates).await;
    info!(
        user_id = user_id.unwrap_or(""),
        candidates = candidates.len(),
        matched = results.len(),
        "searched collaborators"
    );
    Ok(results)
}

/// Store reads block, so they run on the blocking pool.
async fn load_profiles(store: &Arc<dyn ProfileStore>) -> Result<Vec<Profile>, MatchError> {
    let store = Arc::clone(store);
    let profiles = tokio::task::spawn_blocking(move || store.all_profiles())
        .await
        .map_err(|e| anyhow!("profile read task failed: {e}"))??;
    Ok(profiles)
}

/// Pull the requester out of the pool, keeping everyone else in order.
fn split_requester(profiles: Vec<Profile>, user_id: &str) -> (Option<Profile>, Vec<Profile>) {
    let mut requester = None;
    let mut candidates = Vec::with_capacity(profiles.len());
    for profile in profiles {
        if profile.user_id == user_id {
            requester.get_or_insert(profile);
        } else {
            candidates.push(profile);
        }
    }
    (requester, candidates)
}
