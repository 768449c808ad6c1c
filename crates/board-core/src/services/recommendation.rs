//! Recommended-post ledger: the hourly refresh and the read path.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::try_join_all;

use crate::domain::{Pagination, Post, PostFilter, PostSort};
use crate::error::DomainError;
use crate::ports::{Clock, FileRepository, PostRepository, RecommendedPostRepository};

use super::RecommendationConfig;

/// Summary of one refresh run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Distinct posts that gained a file inside the candidate window.
    pub candidates: usize,
    /// Posts whose ledger row was inserted or bumped, in upsert order.
    pub refreshed: Vec<i32>,
}

pub struct RecommendationService {
    posts: Arc<dyn PostRepository>,
    files: Arc<dyn FileRepository>,
    recommended: Arc<dyn RecommendedPostRepository>,
    clock: Arc<dyn Clock>,
    config: RecommendationConfig,
    running: AtomicBool,
}

/// Held for the duration of a refresh run. Released on drop, so a run that
/// is cancelled by a timeout frees the slot too.
struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl RecommendationService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        files: Arc<dyn FileRepository>,
        recommended: Arc<dyn RecommendedPostRepository>,
        clock: Arc<dyn Clock>,
        config: RecommendationConfig,
    ) -> Self {
        Self {
            posts,
            files,
            recommended,
            clock,
            config,
            running: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    /// Rebuild the ledger from posts that recently gained a file.
    ///
    /// Returns `Ok(None)` without touching the store when another run is
    /// still in progress.
    #[tracing::instrument(skip_all)]
    pub async fn refresh(&self) -> Result<Option<RefreshReport>, DomainError> {
        let Some(_guard) = RunGuard::acquire(&self.running) else {
            tracing::warn!("Recommendation refresh already running, skipping");
            return Ok(None);
        };

        let now = self.clock.now();
        let post_ids = self
            .files
            .post_ids_created_between(now - self.config.candidate_window, now)
            .await?;
        if post_ids.is_empty() {
            tracing::debug!("No posts gained a file in the candidate window");
            return Ok(Some(RefreshReport::default()));
        }
        let candidates = post_ids.len();

        let posts = self
            .posts
            .find_many(
                &PostFilter::ids(post_ids),
                PostSort::MostLikedThenNewest,
                Pagination::first(self.config.refresh_cap),
            )
            .await?;

        try_join_all(posts.iter().map(|post| self.recommended.upsert(post.id, now))).await?;

        let refreshed: Vec<i32> = posts.iter().map(|p| p.id).collect();
        tracing::info!(candidates, refreshed = refreshed.len(), "Recommended posts refreshed");
        Ok(Some(RefreshReport {
            candidates,
            refreshed,
        }))
    }

    /// Up to `read_limit` posts from the most recently touched ledger rows,
    /// most liked first.
    pub async fn recommended_posts(&self) -> Result<Vec<Post>, DomainError> {
        let limit = self.config.read_limit;
        let post_ids: Vec<i32> = self
            .recommended
            .latest(limit)
            .await?
            .into_iter()
            .map(|row| row.post_id)
            .collect();
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self
            .posts
            .find_many(
                &PostFilter::ids(post_ids),
                PostSort::MostLiked,
                Pagination::first(limit),
            )
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_guard_is_exclusive_and_released_on_drop() {
        let flag = AtomicBool::new(false);

        let first = RunGuard::acquire(&flag);
        assert!(first.is_some());
        assert!(RunGuard::acquire(&flag).is_none());

        drop(first);
        assert!(RunGuard::acquire(&flag).is_some());
    }
}
