//! In-memory store implementing every board port.
//!
//! This is the fallback when no database is configured, and the store the
//! service-level tests run against. All tables live behind one async
//! `RwLock`, so every write method is atomic with respect to the others.
//! Note: Data is lost on process restart.

mod tables;

use std::cmp::Reverse;
use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use board_core::domain::{
    Comment, File, HashtagFilter, NewPost, Pagination, Post, PostEdit, PostFilter, PostSort,
    RecommendedPost, User, Vote, VoteOutcome, VoteTransition,
};
use board_core::error::RepoError;
use board_core::ports::{
    BaseRepository, CommentRepository, FileRepository, HashtagRepository, PostRepository,
    RecommendedPostRepository, UserRepository, VoteRepository,
};

use tables::Tables;

pub struct InMemoryBoardStore {
    tables: RwLock<Tables>,
}

impl InMemoryBoardStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    /// Register a user. Accounts are owned by another service; this exists
    /// for seeding.
    pub async fn add_user(&self, nickname: impl Into<String>, at: DateTime<Utc>) -> User {
        let mut tables = self.tables.write().await;
        let user = User {
            id: tables.next_id(),
            nickname: nickname.into(),
            created_at: at,
        };
        tables.users.insert(user.id, user.clone());
        user
    }

    /// Record an uploaded file, optionally already attached to a post.
    pub async fn add_file(
        &self,
        url: impl Into<String>,
        post_id: Option<i32>,
        at: DateTime<Utc>,
    ) -> File {
        let mut tables = self.tables.write().await;
        let file = File {
            id: tables.next_id(),
            post_id,
            url: url.into(),
            created_at: at,
        };
        tables.files.insert(file.id, file.clone());
        file
    }

    pub async fn add_comment(
        &self,
        post_id: i32,
        commenter_id: Option<i32>,
        content: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Comment {
        let mut tables = self.tables.write().await;
        let comment = Comment {
            id: tables.next_id(),
            post_id,
            commenter_id,
            content: content.into(),
            created_at: at,
            updated_at: at,
        };
        tables.comments.insert(comment.id, comment.clone());
        comment
    }

    /// Number of ledger rows, for invariant checks.
    pub async fn recommended_len(&self) -> usize {
        self.tables.read().await.recommended.len()
    }
}

impl Default for InMemoryBoardStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(post: &Post, filter: &PostFilter) -> bool {
    if post.is_deleted() {
        return false;
    }
    if let Some(ids) = &filter.ids {
        if !ids.contains(&post.id) {
            return false;
        }
    }
    if let Some(category) = &filter.category {
        if &post.category != category {
            return false;
        }
    }
    if let Some(keyword) = &filter.keyword {
        if !post.title.contains(keyword.as_str()) && !post.content.contains(keyword.as_str()) {
            return false;
        }
    }
    if filter.created_after.is_some_and(|after| post.created_at < after) {
        return false;
    }
    if filter.created_before.is_some_and(|before| post.created_at > before) {
        return false;
    }
    true
}

#[async_trait]
impl BaseRepository<User, i32> for InMemoryBoardStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }
}

#[async_trait]
impl UserRepository for InMemoryBoardStore {}

#[async_trait]
impl BaseRepository<Post, i32> for InMemoryBoardStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }
}

#[async_trait]
impl PostRepository for InMemoryBoardStore {
    async fn create(&self, new_post: &NewPost, now: DateTime<Utc>) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_files(&new_post.file_ids)?;

        let post = Post {
            id: tables.next_id(),
            poster_id: new_post.poster_id,
            title: new_post.title.clone(),
            content: new_post.content.clone(),
            category: new_post.category.clone(),
            views: 0,
            like_count: 0,
            dislike_count: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.posts.insert(post.id, post.clone());
        tables.link_hashtags(post.id, &new_post.hashtags);
        tables.replace_files(post.id, &new_post.file_ids);
        Ok(post)
    }

    async fn find_active(&self, id: i32) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.get(&id).filter(|p| !p.is_deleted()).cloned())
    }

    async fn find_many(
        &self,
        filter: &PostFilter,
        sort: PostSort,
        page: Pagination,
    ) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| matches(p, filter))
            .cloned()
            .collect();

        // Same ordering as the SQL path, with id DESC as the final tie-break.
        match sort {
            PostSort::Newest => posts.sort_by_key(|p| Reverse((p.created_at, p.id))),
            PostSort::MostViewed => posts.sort_by_key(|p| Reverse((p.views, p.id))),
            PostSort::MostLiked => posts.sort_by_key(|p| Reverse((p.like_count, p.id))),
            PostSort::MostLikedThenNewest => {
                posts.sort_by_key(|p| Reverse((p.like_count, p.created_at, p.id)))
            }
        }

        Ok(posts
            .into_iter()
            .skip(page.skip as usize)
            .take(page.take as usize)
            .collect())
    }

    async fn increment_views(&self, id: i32) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let post = tables.active_post_mut(id)?;
        post.views += 1;
        Ok(())
    }

    async fn update(&self, id: i32, edit: &PostEdit, now: DateTime<Utc>) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        tables.active_post_mut(id)?;
        tables.check_files(&edit.file_ids)?;

        tables.replace_files(id, &edit.file_ids);
        let post = tables.active_post_mut(id)?;
        post.title = edit.title.clone();
        post.content = edit.content.clone();
        post.updated_at = now;
        Ok(post.clone())
    }

    async fn soft_delete(&self, id: i32, now: DateTime<Utc>) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let post = tables.active_post_mut(id)?;
        post.deleted_at = Some(now);
        Ok(post.clone())
    }
}

#[async_trait]
impl VoteRepository for InMemoryBoardStore {
    async fn find_by_post(&self, post_id: i32) -> Result<Vec<Vote>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .votes
            .values()
            .filter(|v| v.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn find_one(&self, post_id: i32, user_id: i32) -> Result<Option<Vote>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .votes
            .values()
            .find(|v| v.post_id == post_id && v.user_id == user_id)
            .cloned())
    }

    async fn apply_vote(
        &self,
        post_id: i32,
        user_id: i32,
        is_like: bool,
        now: DateTime<Utc>,
    ) -> Result<VoteOutcome, RepoError> {
        let mut tables = self.tables.write().await;
        tables.active_post_mut(post_id)?;

        let existing = tables
            .votes
            .values()
            .find(|v| v.post_id == post_id && v.user_id == user_id)
            .map(|v| v.id);
        let previous = existing
            .and_then(|id| tables.votes.get(&id))
            .and_then(|v| v.is_like);
        let transition = VoteTransition::apply(previous, is_like);

        let created = match existing {
            Some(id) => {
                if let Some(vote) = tables.votes.get_mut(&id) {
                    vote.is_like = transition.next;
                    vote.updated_at = now;
                }
                false
            }
            None => {
                let vote = Vote {
                    id: tables.next_id(),
                    post_id,
                    user_id,
                    is_like: transition.next,
                    created_at: now,
                    updated_at: now,
                };
                tables.votes.insert(vote.id, vote);
                true
            }
        };

        let post = tables.active_post_mut(post_id)?;
        post.like_count += transition.delta.likes;
        post.dislike_count += transition.delta.dislikes;

        Ok(VoteOutcome {
            previous,
            transition,
            created,
        })
    }
}

#[async_trait]
impl BaseRepository<File, i32> for InMemoryBoardStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<File>, RepoError> {
        Ok(self.tables.read().await.files.get(&id).cloned())
    }
}

#[async_trait]
impl FileRepository for InMemoryBoardStore {
    async fn find_by_post(&self, post_id: i32) -> Result<Vec<File>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .files
            .values()
            .filter(|f| f.post_id == Some(post_id))
            .cloned()
            .collect())
    }

    async fn post_ids_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<i32>, RepoError> {
        let tables = self.tables.read().await;
        let ids: BTreeSet<i32> = tables
            .files
            .values()
            .filter(|f| f.created_at >= from && f.created_at <= to)
            .filter_map(|f| f.post_id)
            .collect();
        Ok(ids.into_iter().collect())
    }
}

#[async_trait]
impl RecommendedPostRepository for InMemoryBoardStore {
    async fn upsert(&self, post_id: i32, at: DateTime<Utc>) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if let Some(row) = tables.recommended.values_mut().find(|r| r.post_id == post_id) {
            row.updated_at = row.updated_at.max(at);
            return Ok(());
        }
        let row = RecommendedPost {
            id: tables.next_id(),
            post_id,
            updated_at: at,
        };
        tables.recommended.insert(row.id, row);
        Ok(())
    }

    async fn find_by_post_id(&self, post_id: i32) -> Result<Option<RecommendedPost>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .recommended
            .values()
            .find(|r| r.post_id == post_id)
            .cloned())
    }

    async fn latest(&self, limit: u64) -> Result<Vec<RecommendedPost>, RepoError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<RecommendedPost> = tables.recommended.values().cloned().collect();
        rows.sort_by_key(|r| Reverse((r.updated_at, r.id)));
        rows.truncate(limit as usize);
        Ok(rows)
    }
}

#[async_trait]
impl HashtagRepository for InMemoryBoardStore {
    async fn post_ids(&self, filter: &HashtagFilter) -> Result<Vec<i32>, RepoError> {
        let tables = self.tables.read().await;
        let hashtag_id = match filter {
            HashtagFilter::Id(id) => Some(*id),
            HashtagFilter::Title(title) => tables
                .hashtags
                .values()
                .find(|h| &h.title == title)
                .map(|h| h.id),
        };
        let Some(hashtag_id) = hashtag_id else {
            return Ok(Vec::new());
        };
        Ok(tables
            .post_hashtags
            .iter()
            .filter(|(_, tag)| *tag == hashtag_id)
            .map(|(post, _)| *post)
            .collect())
    }
}

#[async_trait]
impl CommentRepository for InMemoryBoardStore {
    async fn find_by_post(&self, post_id: i32) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn find_many_pages_newest_first_and_skips_deleted() {
        let store = InMemoryBoardStore::new();
        let base = Utc::now();
        let mut ids = Vec::new();
        for i in 0..5 {
            let post = PostRepository::create(
                &store,
                &NewPost {
                    title: format!("post {i}"),
                    category: "free".into(),
                    ..Default::default()
                },
                base + chrono::Duration::minutes(i),
            )
            .await
            .unwrap();
            ids.push(post.id);
        }
        store.soft_delete(ids[4], base).await.unwrap();

        let first = store
            .find_many(&PostFilter::default(), PostSort::Newest, Pagination::first(2))
            .await
            .unwrap();
        assert_eq!(
            first.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![ids[3], ids[2]]
        );

        let second = store
            .find_many(
                &PostFilter::default(),
                PostSort::Newest,
                Pagination { take: 2, skip: 2 },
            )
            .await
            .unwrap();
        assert_eq!(
            second.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![ids[1], ids[0]]
        );
    }

    #[tokio::test]
    async fn upsert_never_moves_timestamp_backwards() {
        let store = InMemoryBoardStore::new();
        let now = Utc::now();

        store.upsert(1, now).await.unwrap();
        store
            .upsert(1, now - chrono::Duration::hours(1))
            .await
            .unwrap();

        let row = store.find_by_post_id(1).await.unwrap().unwrap();
        assert_eq!(row.updated_at, now);
        assert_eq!(store.recommended_len().await, 1);
    }

    #[tokio::test]
    async fn update_detaches_unlisted_files() {
        let store = InMemoryBoardStore::new();
        let now = Utc::now();
        let a = store.add_file("a.png", None, now).await;
        let b = store.add_file("b.png", None, now).await;
        let post = PostRepository::create(
            &store,
            &NewPost {
                title: "gallery".into(),
                file_ids: vec![a.id],
                ..Default::default()
            },
            now,
        )
        .await
        .unwrap();

        store
            .update(
                post.id,
                &PostEdit {
                    title: "gallery".into(),
                    content: String::new(),
                    file_ids: vec![b.id],
                },
                now,
            )
            .await
            .unwrap();

        let attached = FileRepository::find_by_post(&store, post.id).await.unwrap();
        assert_eq!(attached.iter().map(|f| f.id).collect::<Vec<_>>(), vec![b.id]);
        let a = BaseRepository::<File, i32>::find_by_id(&store, a.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(a.post_id, None);
    }

    #[tokio::test]
    async fn create_with_unknown_file_stores_nothing() {
        let store = InMemoryBoardStore::new();

        let err = PostRepository::create(
            &store,
            &NewPost {
                title: "broken".into(),
                hashtags: vec!["rust".into()],
                file_ids: vec![404],
                ..Default::default()
            },
            Utc::now(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, RepoError::InvalidReference(_)));
        let tables = store.tables.read().await;
        assert!(tables.posts.is_empty());
        assert!(tables.hashtags.is_empty());
        assert!(tables.post_hashtags.is_empty());
    }
}
