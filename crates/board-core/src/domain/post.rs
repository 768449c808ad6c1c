use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Comment, File, User, Vote};

/// Post entity - a board article with its aggregate vote counters.
///
/// `like_count` and `dislike_count` mirror the number of votes on this post
/// whose `is_like` is `Some(true)` and `Some(false)` respectively. Only the
/// vote path changes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub poster_id: Option<i32>,
    pub title: String,
    pub content: String,
    pub category: String,
    pub views: i32,
    pub like_count: i32,
    pub dislike_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Input for creating a post.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub poster_id: Option<i32>,
    pub title: String,
    pub content: String,
    pub category: String,
    pub hashtags: Vec<String>,
    pub file_ids: Vec<i32>,
}

/// Replacement values for an existing post.
#[derive(Debug, Clone, Default)]
pub struct PostEdit {
    pub title: String,
    pub content: String,
    pub file_ids: Vec<i32>,
}

/// A post with its relations loaded.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: Post,
    pub poster: Option<User>,
    pub files: Vec<File>,
    pub votes: Vec<Vote>,
    pub comments: Vec<Comment>,
}
