//! Like/dislike accounting.

use std::sync::Arc;

use crate::domain::{Vote, VoteCommand};
use crate::error::{DomainError, RepoError};
use crate::ports::{BaseRepository, Clock, PostRepository, UserRepository, VoteRepository};

/// Applies votes and keeps post counters in step with vote rows.
pub struct VotingService {
    posts: Arc<dyn PostRepository>,
    votes: Arc<dyn VoteRepository>,
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl VotingService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        votes: Arc<dyn VoteRepository>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            posts,
            votes,
            users,
            clock,
        }
    }

    /// Record `cmd` and return every vote on the target post.
    #[tracing::instrument(
        skip_all,
        fields(post_id = cmd.post_id, user_id = cmd.user_id, is_like = cmd.is_like)
    )]
    pub async fn vote(&self, cmd: VoteCommand) -> Result<Vec<Vote>, DomainError> {
        if self.posts.find_active(cmd.post_id).await?.is_none() {
            return Err(DomainError::post_not_found(cmd.post_id));
        }
        if self.users.find_by_id(cmd.user_id).await?.is_none() {
            return Err(DomainError::user_not_found(cmd.user_id));
        }

        let outcome = self
            .votes
            .apply_vote(cmd.post_id, cmd.user_id, cmd.is_like, self.clock.now())
            .await
            .map_err(|e| match e {
                // Post deleted between the lookup and the write.
                RepoError::NotFound => DomainError::post_not_found(cmd.post_id),
                other => other.into(),
            })?;

        tracing::debug!(
            previous = ?outcome.previous,
            next = ?outcome.transition.next,
            like_delta = outcome.transition.delta.likes,
            dislike_delta = outcome.transition.delta.dislikes,
            created = outcome.created,
            "Vote applied"
        );

        Ok(self.votes.find_by_post(cmd.post_id).await?)
    }
}
