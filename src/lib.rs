//! Collaborator matchmaking: rank people by how well their profiles fit a
//! requester (embedding similarity blended with age and rating) or a
//! free-text query.

pub mod api;
pub mod config;
pub mod embed;
pub mod error;
pub mod matching;
pub mod profile;
pub mod store;

pub use config::Config;
pub use embed::{EmbeddingClient, Embeddings};
pub use error::MatchError;
pub use matching::{Matchmaker, RankingConfig};
pub use profile::{Profile, ScoredCandidate};
