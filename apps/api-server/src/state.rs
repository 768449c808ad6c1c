//! Application state - shared across all handlers.

use std::sync::Arc;

use board_core::ports::{Clock, SystemClock};
use board_core::services::{
    FeedConfig, PostService, RecommendationConfig, RecommendationService, VotingService,
};
use board_infra::{BoardStores, InMemoryBoardStore};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub voting: Arc<VotingService>,
    pub recommendations: Arc<RecommendationService>,
}

impl AppState {
    /// Build the application state, falling back to the in-memory store when
    /// no database is configured or reachable.
    pub async fn new(config: &AppConfig) -> Self {
        let stores = Self::stores(config).await;
        let state = Self::from_stores(
            stores,
            Arc::new(SystemClock),
            config.feed.clone(),
            config.recommendation.clone(),
        );
        tracing::info!("Application state initialized");
        state
    }

    /// Wire the services over an existing set of stores.
    pub fn from_stores(
        stores: BoardStores,
        clock: Arc<dyn Clock>,
        feed: FeedConfig,
        recommendation: RecommendationConfig,
    ) -> Self {
        let posts = PostService::new(stores.post_stores(), clock.clone(), feed);
        let voting = VotingService::new(
            stores.posts.clone(),
            stores.votes.clone(),
            stores.users.clone(),
            clock.clone(),
        );
        let recommendations = RecommendationService::new(
            stores.posts,
            stores.files,
            stores.recommended,
            clock,
            recommendation,
        );

        Self {
            posts: Arc::new(posts),
            voting: Arc::new(voting),
            recommendations: Arc::new(recommendations),
        }
    }

    #[cfg(feature = "postgres")]
    async fn stores(config: &AppConfig) -> BoardStores {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return BoardStores::in_memory(Arc::new(InMemoryBoardStore::new()));
        };

        match board_infra::connect(db_config).await {
            Ok(db) => BoardStores::postgres(db),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                BoardStores::in_memory(Arc::new(InMemoryBoardStore::new()))
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn stores(_config: &AppConfig) -> BoardStores {
        tracing::info!("Running without postgres feature - using in-memory store");
        BoardStores::in_memory(Arc::new(InMemoryBoardStore::new()))
    }
}
