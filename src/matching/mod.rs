//! Hybrid collaborator ranking.
//!
//! ```text
//! profiles ──synthesize──▶ texts ──one embed call──▶ vectors
//!                                                     │
//!            requester vector ◀── index 0 ────────────┤
//!            candidate vectors ◀── 1..n ──────────────┘
//!                     │
//!      cosine · 0.70 + age proximity · 0.15 + rating · 0.15
//!                     │
//!               × 100, 2 dp, sort desc
//! ```
//!
//! Search skips the age and rating terms and drops anything at or below the
//! threshold.

pub mod pipeline;
pub mod scoring;
pub mod service;
pub mod weights;

pub use pipeline::Matchmaker;
pub use weights::{RankingConfig, Weights};
