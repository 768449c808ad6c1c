//! Recommended-post refresh and read path against the in-memory store.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use board_core::domain::{NewPost, Post, VoteCommand};
use board_core::ports::{Clock, RecommendedPostRepository};
use board_core::services::{
    PostService, RecommendationConfig, RecommendationService, VotingService,
};
use board_infra::{BoardStores, InMemoryBoardStore};

struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

struct Fixture {
    store: Arc<InMemoryBoardStore>,
    stores: BoardStores,
    clock: Arc<ManualClock>,
    posts: PostService,
    voting: VotingService,
    recommendations: RecommendationService,
}

fn fixture(config: RecommendationConfig) -> Fixture {
    let store = Arc::new(InMemoryBoardStore::new());
    let stores = BoardStores::in_memory(store.clone());
    let clock = Arc::new(ManualClock(Mutex::new(Utc::now())));
    let posts = PostService::new(stores.post_stores(), clock.clone(), Default::default());
    let voting = VotingService::new(
        stores.posts.clone(),
        stores.votes.clone(),
        stores.users.clone(),
        clock.clone(),
    );
    let recommendations = RecommendationService::new(
        stores.posts.clone(),
        stores.files.clone(),
        stores.recommended.clone(),
        clock.clone(),
        config,
    );
    Fixture {
        store,
        stores,
        clock,
        posts,
        voting,
        recommendations,
    }
}

impl Fixture {
    async fn post(&self, title: &str) -> Post {
        self.posts
            .create_post(NewPost {
                title: title.into(),
                category: "free".into(),
                ..Default::default()
            })
            .await
            .unwrap()
    }

    /// Post with an image uploaded `age` ago.
    async fn post_with_image(&self, title: &str, age: Duration) -> Post {
        let post = self.post(title).await;
        self.store
            .add_file(format!("{title}.png"), Some(post.id), self.clock.now() - age)
            .await;
        post
    }

    async fn like(&self, post_id: i32, times: usize) {
        for i in 0..times {
            let user = self
                .store
                .add_user(format!("fan-{post_id}-{i}"), self.clock.now())
                .await;
            self.voting
                .vote(VoteCommand {
                    post_id,
                    user_id: user.id,
                    is_like: true,
                })
                .await
                .unwrap();
        }
    }
}

#[tokio::test]
async fn refresh_inserts_then_bumps_the_same_row() {
    let fx = fixture(RecommendationConfig::default());
    let post = fx.post_with_image("sunset", Duration::days(1)).await;

    let report = fx.recommendations.refresh().await.unwrap().unwrap();
    assert_eq!(report.refreshed, vec![post.id]);
    let first = fx
        .stores
        .recommended
        .find_by_post_id(post.id)
        .await
        .unwrap()
        .expect("ledger row");

    fx.clock.advance(Duration::hours(1));
    fx.recommendations.refresh().await.unwrap().unwrap();

    let second = fx
        .stores
        .recommended
        .find_by_post_id(post.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.id, first.id);
    assert!(second.updated_at > first.updated_at);
    assert_eq!(fx.store.recommended_len().await, 1);
}

#[tokio::test]
async fn refresh_ignores_old_files_and_unattached_files() {
    let fx = fixture(RecommendationConfig::default());
    fx.post_with_image("stale", Duration::days(11)).await;
    fx.store
        .add_file("orphan.png", None, fx.clock.now())
        .await;

    let report = fx.recommendations.refresh().await.unwrap().unwrap();
    assert_eq!(report.candidates, 0);
    assert!(report.refreshed.is_empty());
    assert_eq!(fx.store.recommended_len().await, 0);
}

#[tokio::test]
async fn refresh_skips_deleted_posts() {
    let fx = fixture(RecommendationConfig::default());
    let post = fx.post_with_image("gone", Duration::hours(2)).await;
    fx.posts.delete_post(post.id).await.unwrap();

    let report = fx.recommendations.refresh().await.unwrap().unwrap();
    assert_eq!(report.candidates, 1);
    assert!(report.refreshed.is_empty());
}

#[tokio::test]
async fn refresh_caps_to_most_liked_candidates() {
    let fx = fixture(RecommendationConfig {
        refresh_cap: 2,
        ..Default::default()
    });
    let quiet = fx.post_with_image("quiet", Duration::days(1)).await;
    let loved = fx.post_with_image("loved", Duration::days(1)).await;
    let liked = fx.post_with_image("liked", Duration::days(1)).await;
    fx.like(loved.id, 3).await;
    fx.like(liked.id, 1).await;

    let report = fx.recommendations.refresh().await.unwrap().unwrap();
    assert_eq!(report.candidates, 3);
    assert_eq!(report.refreshed, vec![loved.id, liked.id]);
    assert!(
        fx.stores
            .recommended
            .find_by_post_id(quiet.id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn recommended_posts_come_from_latest_ledger_rows_by_likes() {
    let fx = fixture(RecommendationConfig {
        refresh_cap: 10,
        ..Default::default()
    });

    // Eight candidates; the two oldest ledger rows fall outside the read window.
    let mut posts = Vec::new();
    for i in 0..8 {
        posts.push(fx.post(&format!("p{i}")).await);
    }
    for (i, post) in posts.iter().enumerate() {
        fx.stores
            .recommended
            .upsert(post.id, fx.clock.now() + Duration::minutes(i as i64))
            .await
            .unwrap();
    }
    fx.like(posts[0].id, 5).await;
    fx.like(posts[5].id, 2).await;
    fx.like(posts[7].id, 1).await;

    let recommended = fx.recommendations.recommended_posts().await.unwrap();
    assert!(recommended.len() <= 6);

    let window: Vec<i32> = fx
        .stores
        .recommended
        .latest(6)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.post_id)
        .collect();
    assert!(recommended.iter().all(|p| window.contains(&p.id)));
    assert!(!recommended.iter().any(|p| p.id == posts[0].id));
    assert_eq!(recommended[0].id, posts[5].id);
    assert_eq!(recommended[1].id, posts[7].id);
}

#[tokio::test]
async fn recommended_posts_empty_without_ledger() {
    let fx = fixture(RecommendationConfig::default());
    fx.post("lonely").await;

    assert!(fx.recommendations.recommended_posts().await.unwrap().is_empty());
}
