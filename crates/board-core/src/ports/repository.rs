use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Comment, File, HashtagFilter, NewPost, Pagination, Post, PostEdit, PostFilter, PostSort,
    RecommendedPost, User, Vote, VoteOutcome,
};
use crate::error::RepoError;

/// Generic repository trait shared by every entity store.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;
}

/// User lookup. Users are managed by the account service.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i32> {}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    /// Insert a post with zeroed counters, link its hashtags (created by title
    /// when missing) and attach its files, all in one atomic unit.
    ///
    /// `post.hashtags` must already be normalized. An unknown file id fails
    /// with `InvalidReference` and leaves nothing behind.
    async fn create(&self, post: &NewPost, now: DateTime<Utc>) -> Result<Post, RepoError>;

    /// Find a post that has not been soft-deleted.
    async fn find_active(&self, id: i32) -> Result<Option<Post>, RepoError>;

    /// Filtered, ordered, paginated listing of active posts.
    async fn find_many(
        &self,
        filter: &PostFilter,
        sort: PostSort,
        page: Pagination,
    ) -> Result<Vec<Post>, RepoError>;

    /// Atomically add one view. Fails with `NotFound` for missing or deleted posts.
    async fn increment_views(&self, id: i32) -> Result<(), RepoError>;

    /// Replace title, content and the exact set of attached files in one
    /// atomic unit. Counters are left untouched. Fails with `NotFound` for
    /// missing or deleted posts and `InvalidReference` for unknown file ids;
    /// either way nothing is written.
    async fn update(&self, id: i32, edit: &PostEdit, now: DateTime<Utc>) -> Result<Post, RepoError>;

    /// Stamp `deleted_at`.
    async fn soft_delete(&self, id: i32, now: DateTime<Utc>) -> Result<Post, RepoError>;
}

/// Vote repository.
#[async_trait]
pub trait VoteRepository: Send + Sync {
    async fn find_by_post(&self, post_id: i32) -> Result<Vec<Vote>, RepoError>;

    async fn find_one(&self, post_id: i32, user_id: i32) -> Result<Option<Vote>, RepoError>;

    /// Apply a vote and the matching post counter change as one atomic unit.
    ///
    /// Implementations read the current vote (locking it where the store
    /// supports row locks), compute the next state with
    /// [`VoteTransition::apply`](crate::domain::VoteTransition::apply), and
    /// persist the vote row and the post counters together. Returns
    /// `NotFound` when the post is missing or deleted, and `Constraint` when
    /// a concurrent first vote by the same user won the insert.
    async fn apply_vote(
        &self,
        post_id: i32,
        user_id: i32,
        is_like: bool,
        now: DateTime<Utc>,
    ) -> Result<VoteOutcome, RepoError>;
}

/// File index. Files are uploaded elsewhere; posts only attach them.
#[async_trait]
pub trait FileRepository: BaseRepository<File, i32> {
    async fn find_by_post(&self, post_id: i32) -> Result<Vec<File>, RepoError>;

    /// Distinct post ids referenced by files created in `[from, to]`.
    async fn post_ids_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<i32>, RepoError>;
}

/// Recommended-post ledger.
#[async_trait]
pub trait RecommendedPostRepository: Send + Sync {
    /// Insert or refresh the row for `post_id` in a single atomic statement.
    /// `updated_at` never moves backwards.
    async fn upsert(&self, post_id: i32, at: DateTime<Utc>) -> Result<(), RepoError>;

    async fn find_by_post_id(&self, post_id: i32) -> Result<Option<RecommendedPost>, RepoError>;

    /// Most recently touched rows, newest first.
    async fn latest(&self, limit: u64) -> Result<Vec<RecommendedPost>, RepoError>;
}

/// Hashtag links.
#[async_trait]
pub trait HashtagRepository: Send + Sync {
    async fn post_ids(&self, filter: &HashtagFilter) -> Result<Vec<i32>, RepoError>;
}

/// Read-only comment lookup.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_post(&self, post_id: i32) -> Result<Vec<Comment>, RepoError>;
}
