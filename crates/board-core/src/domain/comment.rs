use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment on a post. Authored elsewhere; loaded with a post's detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i32,
    pub post_id: i32,
    pub commenter_id: Option<i32>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
