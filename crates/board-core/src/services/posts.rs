//! Post CRUD and the listing endpoints built on it.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::{
    Hashtag, NewPost, Pagination, Post, PostDetail, PostEdit, PostFilter, PostListQuery, PostSort,
};
use crate::error::{DomainError, RepoError};
use crate::ports::{
    BaseRepository, Clock, CommentRepository, FileRepository, HashtagRepository, PostRepository,
    UserRepository, VoteRepository,
};

use super::FeedConfig;

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    files: Arc<dyn FileRepository>,
    votes: Arc<dyn VoteRepository>,
    users: Arc<dyn UserRepository>,
    hashtags: Arc<dyn HashtagRepository>,
    comments: Arc<dyn CommentRepository>,
    clock: Arc<dyn Clock>,
    config: FeedConfig,
}

/// Repositories a [`PostService`] reads and writes.
pub struct PostStores {
    pub posts: Arc<dyn PostRepository>,
    pub files: Arc<dyn FileRepository>,
    pub votes: Arc<dyn VoteRepository>,
    pub users: Arc<dyn UserRepository>,
    pub hashtags: Arc<dyn HashtagRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

impl PostService {
    pub fn new(stores: PostStores, clock: Arc<dyn Clock>, config: FeedConfig) -> Self {
        Self {
            posts: stores.posts,
            files: stores.files,
            votes: stores.votes,
            users: stores.users,
            hashtags: stores.hashtags,
            comments: stores.comments,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    fn page(&self, query: &PostListQuery) -> Pagination {
        Pagination::from_page(
            query.page,
            query.take,
            self.config.default_page_size,
            self.config.max_page_size,
        )
    }

    /// Insert a post together with its hashtags and attached files. Either all
    /// of it is stored or none of it.
    #[tracing::instrument(skip_all, fields(title = %new_post.title))]
    pub async fn create_post(&self, new_post: NewPost) -> Result<Post, DomainError> {
        if new_post.title.trim().is_empty() {
            return Err(DomainError::Validation("title must not be empty".into()));
        }

        let new_post = NewPost {
            hashtags: new_post
                .hashtags
                .iter()
                .filter_map(|raw| Hashtag::normalize(raw))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
            ..new_post
        };
        let post = self.posts.create(&new_post, self.clock.now()).await?;

        tracing::info!(
            post_id = post.id,
            hashtags = new_post.hashtags.len(),
            files = new_post.file_ids.len(),
            "Post created"
        );
        Ok(post)
    }

    /// Load a post with poster, files, votes and comments.
    pub async fn get_post(&self, id: i32) -> Result<PostDetail, DomainError> {
        let post = self
            .posts
            .find_active(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))?;

        let poster = match post.poster_id {
            Some(user_id) => self.users.find_by_id(user_id).await?,
            None => None,
        };
        let files = self.files.find_by_post(id).await?;
        let votes = self.votes.find_by_post(id).await?;
        let comments = self.comments.find_by_post(id).await?;

        Ok(PostDetail {
            post,
            poster,
            files,
            votes,
            comments,
        })
    }

    /// Count a view, then load the post.
    pub async fn read_post(&self, id: i32) -> Result<PostDetail, DomainError> {
        self.posts
            .increment_views(id)
            .await
            .map_err(|e| not_found_as_post(e, id))?;
        self.get_post(id).await
    }

    /// Newest-first listing, optionally narrowed to a category or a hashtag.
    pub async fn list_posts(&self, query: PostListQuery) -> Result<Vec<Post>, DomainError> {
        let page = self.page(&query);
        let mut filter = PostFilter {
            category: query.category,
            ..Default::default()
        };

        if let Some(hashtag) = &query.hashtag {
            let ids = self.hashtags.post_ids(hashtag).await?;
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            filter.ids = Some(ids);
        }

        Ok(self.posts.find_many(&filter, PostSort::Newest, page).await?)
    }

    /// Posts whose title or content contains the keyword.
    pub async fn search_posts(&self, query: PostListQuery) -> Result<Vec<Post>, DomainError> {
        let keyword = query
            .keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| DomainError::Validation("keyword is required".into()))?;

        let page = self.page(&query);
        let filter = PostFilter {
            keyword: Some(keyword.to_string()),
            ..Default::default()
        };
        Ok(self.posts.find_many(&filter, PostSort::Newest, page).await?)
    }

    pub async fn recent_posts(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self
            .posts
            .find_many(
                &PostFilter::default(),
                PostSort::Newest,
                Pagination::first(self.config.recent_limit),
            )
            .await?)
    }

    /// Most viewed posts created within the popular window.
    pub async fn popular_posts(&self) -> Result<Vec<Post>, DomainError> {
        let now = self.clock.now();
        let filter = PostFilter {
            created_after: Some(now - self.config.popular_window),
            created_before: Some(now),
            ..Default::default()
        };
        Ok(self
            .posts
            .find_many(
                &filter,
                PostSort::MostViewed,
                Pagination::first(self.config.popular_limit),
            )
            .await?)
    }

    /// Most liked posts, optionally within one category.
    pub async fn emphasized_posts(&self, category: Option<String>) -> Result<Vec<Post>, DomainError> {
        let filter = PostFilter {
            category,
            ..Default::default()
        };
        Ok(self
            .posts
            .find_many(
                &filter,
                PostSort::MostLiked,
                Pagination::first(self.config.emphasized_limit),
            )
            .await?)
    }

    /// Replace title, content and attached files atomically.
    #[tracing::instrument(skip(self, edit))]
    pub async fn update_post(&self, id: i32, edit: PostEdit) -> Result<PostDetail, DomainError> {
        if edit.title.trim().is_empty() {
            return Err(DomainError::Validation("title must not be empty".into()));
        }
        if self.posts.find_active(id).await?.is_none() {
            return Err(DomainError::post_not_found(id));
        }

        self.posts
            .update(id, &edit, self.clock.now())
            .await
            .map_err(|e| not_found_as_post(e, id))?;

        tracing::info!(post_id = id, files = edit.file_ids.len(), "Post updated");
        self.get_post(id).await
    }

    /// Soft delete. The post disappears from every read path.
    #[tracing::instrument(skip(self))]
    pub async fn delete_post(&self, id: i32) -> Result<Post, DomainError> {
        if self.posts.find_active(id).await?.is_none() {
            return Err(DomainError::post_not_found(id));
        }
        let post = self
            .posts
            .soft_delete(id, self.clock.now())
            .await
            .map_err(|e| not_found_as_post(e, id))?;

        tracing::info!(post_id = id, "Post soft-deleted");
        Ok(post)
    }
}

fn not_found_as_post(err: RepoError, id: i32) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::post_not_found(id),
        other => other.into(),
    }
}
