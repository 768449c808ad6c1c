//! Bundle of every repository the services need, behind trait objects.

use std::sync::Arc;

use board_core::ports::{
    CommentRepository, FileRepository, HashtagRepository, PostRepository,
    RecommendedPostRepository, UserRepository, VoteRepository,
};
use board_core::services::PostStores;

use crate::memory::InMemoryBoardStore;

/// One handle per port, all backed by the same storage.
#[derive(Clone)]
pub struct BoardStores {
    pub posts: Arc<dyn PostRepository>,
    pub votes: Arc<dyn VoteRepository>,
    pub files: Arc<dyn FileRepository>,
    pub users: Arc<dyn UserRepository>,
    pub hashtags: Arc<dyn HashtagRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub recommended: Arc<dyn RecommendedPostRepository>,
}

impl BoardStores {
    /// Every port served by one in-memory store.
    pub fn in_memory(store: Arc<InMemoryBoardStore>) -> Self {
        Self {
            posts: store.clone(),
            votes: store.clone(),
            files: store.clone(),
            users: store.clone(),
            hashtags: store.clone(),
            comments: store.clone(),
            recommended: store,
        }
    }

    /// Every port served by PostgreSQL through one connection pool.
    #[cfg(feature = "postgres")]
    pub fn postgres(db: sea_orm::DbConn) -> Self {
        use crate::database::{
            PostgresCommentRepository, PostgresFileRepository, PostgresHashtagRepository,
            PostgresPostRepository, PostgresRecommendedPostRepository, PostgresUserRepository,
            PostgresVoteRepository,
        };

        Self {
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            votes: Arc::new(PostgresVoteRepository::new(db.clone())),
            files: Arc::new(PostgresFileRepository::new(db.clone())),
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            hashtags: Arc::new(PostgresHashtagRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db.clone())),
            recommended: Arc::new(PostgresRecommendedPostRepository::new(db)),
        }
    }

    /// The subset used by `PostService`.
    pub fn post_stores(&self) -> PostStores {
        PostStores {
            posts: self.posts.clone(),
            files: self.files.clone(),
            votes: self.votes.clone(),
            users: self.users.clone(),
            hashtags: self.hashtags.clone(),
            comments: self.comments.clone(),
        }
    }
}
