use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ledger row marking a post as a recommendation candidate.
///
/// `post_id` is a plain attribute, not a relation: the ledger is a derived
/// index that the read path sorts by `updated_at`. There is at most one row
/// per `post_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedPost {
    pub id: i32,
    pub post_id: i32,
    pub updated_at: DateTime<Utc>,
}
