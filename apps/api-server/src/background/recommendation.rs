//! Hourly refresh of the recommended-post ledger.

use std::sync::Arc;
use std::time::Duration;

use board_core::services::RecommendationService;
use tokio_cron_scheduler::JobSchedulerError;

use super::scheduler::Scheduler;
use crate::config::RefreshJobConfig;

/// Register the refresh job. Call once per process.
pub async fn register(
    scheduler: &Scheduler,
    service: Arc<RecommendationService>,
    config: &RefreshJobConfig,
) -> Result<uuid::Uuid, JobSchedulerError> {
    let timeout = config.timeout;
    scheduler
        .add_cron(&config.cron, move || {
            let service = service.clone();
            async move { run_once(&service, timeout).await }
        })
        .await
}

/// One bounded refresh run. Failures are logged; the next tick retries.
pub async fn run_once(service: &RecommendationService, timeout: Duration) {
    match tokio::time::timeout(timeout, service.refresh()).await {
        Ok(Ok(Some(report))) => tracing::debug!(
            candidates = report.candidates,
            refreshed = report.refreshed.len(),
            "Recommended posts refreshed"
        ),
        Ok(Ok(None)) => {
            tracing::warn!("Previous recommended-post refresh still running, skipping tick")
        }
        Ok(Err(e)) => tracing::error!(error = %e, "Recommended-post refresh failed"),
        Err(_) => tracing::error!(
            timeout_secs = timeout.as_secs(),
            "Recommended-post refresh timed out"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use board_core::ports::SystemClock;
    use board_infra::{BoardStores, InMemoryBoardStore};

    #[tokio::test]
    async fn run_once_refreshes_recent_uploads() {
        let store = Arc::new(InMemoryBoardStore::new());
        let stores = BoardStores::in_memory(store.clone());
        let posts = board_core::services::PostService::new(
            stores.post_stores(),
            Arc::new(SystemClock),
            Default::default(),
        );
        let post = posts
            .create_post(board_core::domain::NewPost {
                title: "photo".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        store
            .add_file("photo.png", Some(post.id), chrono::Utc::now())
            .await;
        let service = RecommendationService::new(
            stores.posts,
            stores.files,
            stores.recommended,
            Arc::new(SystemClock),
            Default::default(),
        );

        run_once(&service, Duration::from_secs(5)).await;

        assert_eq!(store.recommended_len().await, 1);
    }
}
