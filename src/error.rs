use thiserror::Error;

/// Failures a ranking request can surface. Provider trouble never shows up
/// here; it is absorbed into zero or synthetic vectors.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The requester hasn't created a profile yet.
    #[error("no profile for user {0}")]
    ProfileNotFound(String),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
