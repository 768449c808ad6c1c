use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An uploaded file (image). Storage is owned by the upload service; posts
/// only attach and detach files by setting `post_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub id: i32,
    pub post_id: Option<i32>,
    pub url: String,
    pub created_at: DateTime<Utc>,
}
