#[cfg(test)]
mod tests {
    use crate::database::entity::{post, recommended_post, vote};
    use crate::database::postgres_repo::{
        PostgresPostRepository, PostgresRecommendedPostRepository, PostgresVoteRepository,
        contains_pattern,
    };
    use board_core::domain::{CounterDelta, Pagination, Post, PostEdit, PostFilter, PostSort};
    use board_core::error::RepoError;
    use board_core::ports::{
        BaseRepository, PostRepository, RecommendedPostRepository, VoteRepository,
    };
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn post_model(id: i32) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id,
            poster_id: Some(7),
            title: "Test Post".to_owned(),
            content: "Content".to_owned(),
            category: "free".to_owned(),
            views: 3,
            like_count: 1,
            dislike_count: 0,
            created_at: now.into(),
            updated_at: now.into(),
            deleted_at: None,
        }
    }

    fn vote_model(is_like: Option<bool>) -> vote::Model {
        let now = chrono::Utc::now();
        vote::Model {
            id: 11,
            post_id: 1,
            user_id: 7,
            is_like,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn affected(rows: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: rows,
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![post_model(1)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(1).await.unwrap();

        let post = result.expect("post");
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.like_count, 1);
        assert!(!post.is_deleted());
    }

    #[tokio::test]
    async fn test_find_active_missing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        assert!(repo.find_active(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_increment_views_on_missing_post() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([affected(0)])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        assert!(matches!(
            repo.increment_views(42).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_apply_vote_toggles_existing_like_off() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![vote_model(Some(true))]])
            .append_exec_results([affected(1), affected(1)])
            .into_connection();

        let repo = PostgresVoteRepository::new(db.clone());

        let outcome = repo
            .apply_vote(1, 7, true, chrono::Utc::now())
            .await
            .unwrap();

        assert_eq!(outcome.previous, Some(true));
        assert_eq!(outcome.transition.next, None);
        assert_eq!(
            outcome.transition.delta,
            CounterDelta {
                likes: -1,
                dislikes: 0
            }
        );
        assert!(!outcome.created);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("FOR UPDATE"), "vote row must be locked: {log}");
    }

    #[tokio::test]
    async fn test_apply_vote_inserts_first_vote() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<vote::Model>::new()])
            .append_exec_results([affected(1), affected(1)])
            .into_connection();

        let repo = PostgresVoteRepository::new(db.clone());

        let outcome = repo
            .apply_vote(1, 7, false, chrono::Utc::now())
            .await
            .unwrap();

        assert_eq!(outcome.previous, None);
        assert_eq!(outcome.transition.next, Some(false));
        assert_eq!(
            outcome.transition.delta,
            CounterDelta {
                likes: 0,
                dislikes: 1
            }
        );
        assert!(outcome.created);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("INSERT INTO"), "{log}");
    }

    #[tokio::test]
    async fn test_apply_vote_on_deleted_post_rolls_back() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![vote_model(Some(false))]])
            .append_exec_results([affected(1), affected(0)])
            .into_connection();

        let repo = PostgresVoteRepository::new(db);

        assert!(matches!(
            repo.apply_vote(1, 7, true, chrono::Utc::now()).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_update_with_unknown_file_rolls_back() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([affected(1), affected(0), affected(1)])
            .into_connection();

        let repo = PostgresPostRepository::new(db.clone());
        let edit = PostEdit {
            title: "edited".into(),
            content: String::new(),
            file_ids: vec![3, 404],
        };

        assert!(matches!(
            repo.update(1, &edit, chrono::Utc::now()).await,
            Err(RepoError::InvalidReference(_))
        ));

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("ROLLBACK"), "{log}");
        assert!(!log.contains("COMMIT"), "{log}");
    }

    #[tokio::test]
    async fn test_update_missing_post_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([affected(0)])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        assert!(matches!(
            repo.update(9, &PostEdit::default(), chrono::Utc::now()).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_keyword_search_escapes_wildcards() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db.clone());
        let filter = PostFilter {
            keyword: Some("50%_off".into()),
            ..Default::default()
        };

        repo.find_many(&filter, PostSort::Newest, Pagination::first(10))
            .await
            .unwrap();

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("ESCAPE"), "{log}");
    }

    #[test]
    fn test_contains_pattern_escapes_like_wildcards() {
        assert_eq!(contains_pattern("rust"), "%rust%");
        assert_eq!(contains_pattern("50%_off"), r"%50\%\_off%");
        assert_eq!(contains_pattern(r"a\b"), r"%a\\b%");
    }

    #[tokio::test]
    async fn test_latest_recommended_rows() {
        let now = chrono::Utc::now();
        let rows = vec![
            recommended_post::Model {
                id: 2,
                post_id: 20,
                updated_at: now.into(),
            },
            recommended_post::Model {
                id: 1,
                post_id: 10,
                updated_at: (now - chrono::Duration::hours(1)).into(),
            },
        ];
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([rows])
            .into_connection();

        let repo = PostgresRecommendedPostRepository::new(db);

        let latest = repo.latest(6).await.unwrap();
        let ids: Vec<i32> = latest.iter().map(|r| r.post_id).collect();
        assert_eq!(ids, vec![20, 10]);
    }

    #[tokio::test]
    async fn test_upsert_uses_on_conflict() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([affected(1)])
            .into_connection();

        let repo = PostgresRecommendedPostRepository::new(db.clone());
        repo.upsert(5, chrono::Utc::now()).await.unwrap();

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("ON CONFLICT"), "{log}");
        assert!(log.contains("GREATEST"), "{log}");
    }
}
