//! Data Transfer Objects - request/response types for the API.
//!
//! Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to create a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    pub poster_id: Option<i32>,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default, alias = "fileId")]
    pub file_ids: Vec<i32>,
}

/// Request to replace a post's title, content and files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, alias = "fileId")]
    pub file_ids: Vec<i32>,
}

/// Query string for post listings and keyword search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPostsQuery {
    pub page: Option<u64>,
    pub take: Option<u64>,
    pub category: Option<String>,
    pub hashtag_id: Option<i32>,
    pub hashtag_title: Option<String>,
    pub keyword: Option<String>,
}

/// Like/dislike request. Every field is optional on the wire so that a
/// missing one is reported as a validation error rather than a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLikeRequest {
    pub target_id: Option<i32>,
    pub user_id: Option<i32>,
    pub is_like: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
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
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub poster: Option<UserResponse>,
    pub files: Vec<FileResponse>,
    pub likes: Vec<LikeResponse>,
    pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub nickname: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    pub id: i32,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// A user's vote on a post. `isLike` is `null` once the vote was toggled off.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub id: i32,
    pub post_id: i32,
    pub user_id: i32,
    pub is_like: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i32,
    pub commenter_id: Option<i32>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_post_accepts_legacy_file_id_key() {
        let req: CreatePostRequest =
            serde_json::from_str(r#"{"title":"t","fileId":[3,4],"hashtags":["a"]}"#).unwrap();
        assert_eq!(req.file_ids, vec![3, 4]);
        assert_eq!(req.category, "");
        assert!(req.poster_id.is_none());
    }

    #[test]
    fn like_request_tolerates_missing_fields() {
        let req: CreateLikeRequest = serde_json::from_str(r#"{"targetId":1}"#).unwrap();
        assert_eq!(req.target_id, Some(1));
        assert!(req.user_id.is_none());
        assert!(req.is_like.is_none());
    }

    #[test]
    fn neutral_like_serializes_as_null() {
        let like = LikeResponse {
            id: 1,
            post_id: 2,
            user_id: 3,
            is_like: None,
            updated_at: Utc::now(),
        };
        let body = serde_json::to_value(like).unwrap();
        assert!(body["isLike"].is_null());
        assert_eq!(body["postId"], 2);
    }
}
