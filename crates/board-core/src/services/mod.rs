//! Services - use cases composed from the ports.

mod posts;
mod recommendation;
mod voting;

use chrono::Duration;

pub use posts::{PostService, PostStores};
pub use recommendation::{RecommendationService, RefreshReport};
pub use voting::VotingService;

/// Limits and windows for the post listings.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub default_page_size: u64,
    /// Upper bound on a client-supplied `take`.
    pub max_page_size: u64,
    pub recent_limit: u64,
    pub popular_limit: u64,
    /// Trailing window for "popular" posts.
    pub popular_window: Duration,
    pub emphasized_limit: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
            recent_limit: 5,
            popular_limit: 5,
            popular_window: Duration::days(7),
            emphasized_limit: 5,
        }
    }
}

/// Tuning for the recommended-post ledger.
#[derive(Debug, Clone)]
pub struct RecommendationConfig {
    /// Trailing window in which a newly attached file qualifies its post.
    pub candidate_window: Duration,
    /// Number of qualifying posts (by likes, then recency) upserted per run.
    pub refresh_cap: u64,
    /// Number of ledger rows the read path considers and posts it returns.
    pub read_limit: u64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            candidate_window: Duration::days(10),
            refresh_cap: 6,
            read_limit: 6,
        }
    }
}
