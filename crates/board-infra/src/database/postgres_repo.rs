//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::prelude::DateTimeWithTimeZone;
use std::collections::BTreeSet;

use sea_orm::sea_query::{Expr, LikeExpr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, NotSet,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use board_core::domain::{
    Comment, File, HashtagFilter, NewPost, Pagination, Post, PostEdit, PostFilter, PostSort,
    RecommendedPost, Vote, VoteOutcome, VoteTransition,
};
use board_core::error::RepoError;
use board_core::ports::{
    CommentRepository, FileRepository, HashtagRepository, PostRepository,
    RecommendedPostRepository, UserRepository, VoteRepository,
};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::file::{self, Entity as FileEntity};
use super::entity::hashtag::{self, Entity as HashtagEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_hashtag::{self, Entity as PostHashtagEntity};
use super::entity::recommended_post::{self, Entity as RecommendedPostEntity};
use super::entity::user::Entity as UserEntity;
use super::entity::vote::{self, Entity as VoteEntity};
use super::postgres_base::{PostgresBaseRepository, db_err};

pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;
pub type PostgresVoteRepository = PostgresBaseRepository<VoteEntity>;
pub type PostgresFileRepository = PostgresBaseRepository<FileEntity>;
pub type PostgresRecommendedPostRepository = PostgresBaseRepository<RecommendedPostEntity>;
pub type PostgresHashtagRepository = PostgresBaseRepository<HashtagEntity>;
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

fn stamp(at: DateTime<Utc>) -> DateTimeWithTimeZone {
    at.into()
}

/// `%keyword%` with LIKE wildcards in the keyword matched literally.
pub(crate) fn contains_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Make `file_ids` the exact set of files attached to `post_id`.
async fn replace_files(
    txn: &DatabaseTransaction,
    post_id: i32,
    file_ids: &[i32],
) -> Result<(), RepoError> {
    let ids: BTreeSet<i32> = file_ids.iter().copied().collect();

    let mut detach = FileEntity::update_many()
        .col_expr(file::Column::PostId, Expr::value(Option::<i32>::None))
        .filter(file::Column::PostId.eq(post_id));
    if !ids.is_empty() {
        detach = detach.filter(file::Column::Id.is_not_in(ids.iter().copied()));
    }
    detach.exec(txn).await.map_err(db_err)?;

    if ids.is_empty() {
        return Ok(());
    }
    let attached = FileEntity::update_many()
        .col_expr(file::Column::PostId, Expr::value(Some(post_id)))
        .filter(file::Column::Id.is_in(ids.iter().copied()))
        .exec(txn)
        .await
        .map_err(db_err)?;

    if attached.rows_affected < ids.len() as u64 {
        return Err(RepoError::InvalidReference(format!("unknown file id in {ids:?}")));
    }
    Ok(())
}

/// Link `titles` to `post_id`, creating missing hashtags.
async fn link_hashtags(
    txn: &DatabaseTransaction,
    post_id: i32,
    titles: &[String],
) -> Result<(), RepoError> {
    if titles.is_empty() {
        return Ok(());
    }

    HashtagEntity::insert_many(titles.iter().map(|title| hashtag::ActiveModel {
        id: NotSet,
        title: Set(title.clone()),
    }))
    .on_conflict(
        OnConflict::column(hashtag::Column::Title)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(txn)
    .await
    .map_err(db_err)?;

    let hashtag_ids: Vec<i32> = HashtagEntity::find()
        .select_only()
        .column(hashtag::Column::Id)
        .filter(hashtag::Column::Title.is_in(titles.iter().map(String::as_str)))
        .into_tuple()
        .all(txn)
        .await
        .map_err(db_err)?;
    if hashtag_ids.is_empty() {
        return Ok(());
    }

    PostHashtagEntity::insert_many(hashtag_ids.into_iter().map(|hashtag_id| {
        post_hashtag::ActiveModel {
            post_id: Set(post_id),
            hashtag_id: Set(hashtag_id),
        }
    }))
    .on_conflict(
        OnConflict::columns([post_hashtag::Column::PostId, post_hashtag::Column::HashtagId])
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(txn)
    .await
    .map_err(db_err)?;

    Ok(())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, new_post: &NewPost, now: DateTime<Utc>) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let model = post::ActiveModel {
            id: NotSet,
            poster_id: Set(new_post.poster_id),
            title: Set(new_post.title.clone()),
            content: Set(new_post.content.clone()),
            category: Set(new_post.category.clone()),
            views: Set(0),
            like_count: Set(0),
            dislike_count: Set(0),
            created_at: Set(stamp(now)),
            updated_at: Set(stamp(now)),
            deleted_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        let linked = match link_hashtags(&txn, model.id, &new_post.hashtags).await {
            Ok(()) => replace_files(&txn, model.id, &new_post.file_ids).await,
            Err(e) => Err(e),
        };
        if let Err(e) = linked {
            txn.rollback().await.map_err(db_err)?;
            return Err(e);
        }
        txn.commit().await.map_err(db_err)?;

        Ok(model.into())
    }

    async fn find_active(&self, id: i32) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .filter(post::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_many(
        &self,
        filter: &PostFilter,
        sort: PostSort,
        page: Pagination,
    ) -> Result<Vec<Post>, RepoError> {
        if filter.is_empty_match() {
            return Ok(Vec::new());
        }

        let mut query = PostEntity::find().filter(post::Column::DeletedAt.is_null());
        if let Some(ids) = &filter.ids {
            query = query.filter(post::Column::Id.is_in(ids.iter().copied()));
        }
        if let Some(category) = &filter.category {
            query = query.filter(post::Column::Category.eq(category.as_str()));
        }
        if let Some(keyword) = &filter.keyword {
            query = query.filter(
                Condition::any()
                    .add(Expr::col(post::Column::Title).like(
                        LikeExpr::new(contains_pattern(keyword)).escape('\\'),
                    ))
                    .add(Expr::col(post::Column::Content).like(
                        LikeExpr::new(contains_pattern(keyword)).escape('\\'),
                    )),
            );
        }
        if let Some(after) = filter.created_after {
            query = query.filter(post::Column::CreatedAt.gte(stamp(after)));
        }
        if let Some(before) = filter.created_before {
            query = query.filter(post::Column::CreatedAt.lte(stamp(before)));
        }

        query = match sort {
            PostSort::Newest => query.order_by_desc(post::Column::CreatedAt),
            PostSort::MostViewed => query.order_by_desc(post::Column::Views),
            PostSort::MostLiked => query.order_by_desc(post::Column::LikeCount),
            PostSort::MostLikedThenNewest => query
                .order_by_desc(post::Column::LikeCount)
                .order_by_desc(post::Column::CreatedAt),
        };

        let result = query
            .order_by_desc(post::Column::Id)
            .limit(page.take)
            .offset(page.skip)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn increment_views(&self, id: i32) -> Result<(), RepoError> {
        let result = PostEntity::update_many()
            .col_expr(post::Column::Views, Expr::col(post::Column::Views).add(1))
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn update(&self, id: i32, edit: &PostEdit, now: DateTime<Utc>) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let result = PostEntity::update_many()
            .col_expr(post::Column::Title, Expr::value(edit.title.as_str()))
            .col_expr(post::Column::Content, Expr::value(edit.content.as_str()))
            .col_expr(post::Column::UpdatedAt, Expr::value(stamp(now)))
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::DeletedAt.is_null())
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            txn.rollback().await.map_err(db_err)?;
            return Err(RepoError::NotFound);
        }
        if let Err(e) = replace_files(&txn, id, &edit.file_ids).await {
            txn.rollback().await.map_err(db_err)?;
            return Err(e);
        }
        txn.commit().await.map_err(db_err)?;

        self.reload(id).await
    }

    async fn soft_delete(&self, id: i32, now: DateTime<Utc>) -> Result<Post, RepoError> {
        let result = PostEntity::update_many()
            .col_expr(post::Column::DeletedAt, Expr::value(Some(stamp(now))))
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        self.reload(id).await
    }
}

impl PostgresPostRepository {
    async fn reload(&self, id: i32) -> Result<Post, RepoError> {
        PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(Into::into)
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl VoteRepository for PostgresVoteRepository {
    async fn find_by_post(&self, post_id: i32) -> Result<Vec<Vote>, RepoError> {
        let result = VoteEntity::find()
            .filter(vote::Column::PostId.eq(post_id))
            .order_by_asc(vote::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_one(&self, post_id: i32, user_id: i32) -> Result<Option<Vote>, RepoError> {
        let result = VoteEntity::find()
            .filter(vote::Column::PostId.eq(post_id))
            .filter(vote::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(Into::into))
    }

    async fn apply_vote(
        &self,
        post_id: i32,
        user_id: i32,
        is_like: bool,
        now: DateTime<Utc>,
    ) -> Result<VoteOutcome, RepoError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        // Row lock serializes concurrent votes by the same user on the same post.
        let existing = VoteEntity::find()
            .filter(vote::Column::PostId.eq(post_id))
            .filter(vote::Column::UserId.eq(user_id))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?;

        let previous = existing.as_ref().and_then(|v| v.is_like);
        let transition = VoteTransition::apply(previous, is_like);

        let created = match existing {
            Some(row) => {
                VoteEntity::update_many()
                    .col_expr(vote::Column::IsLike, Expr::value(transition.next))
                    .col_expr(vote::Column::UpdatedAt, Expr::value(stamp(now)))
                    .filter(vote::Column::Id.eq(row.id))
                    .exec(&txn)
                    .await
                    .map_err(db_err)?;
                false
            }
            None => {
                VoteEntity::insert(vote::ActiveModel {
                    id: NotSet,
                    post_id: Set(post_id),
                    user_id: Set(user_id),
                    is_like: Set(transition.next),
                    created_at: Set(stamp(now)),
                    updated_at: Set(stamp(now)),
                })
                .exec_without_returning(&txn)
                .await
                .map_err(db_err)?;
                true
            }
        };

        // Relative update: counters never go through a read-modify-write in Rust.
        let counters = PostEntity::update_many()
            .col_expr(
                post::Column::LikeCount,
                Expr::col(post::Column::LikeCount).add(transition.delta.likes),
            )
            .col_expr(
                post::Column::DislikeCount,
                Expr::col(post::Column::DislikeCount).add(transition.delta.dislikes),
            )
            .filter(post::Column::Id.eq(post_id))
            .filter(post::Column::DeletedAt.is_null())
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if counters.rows_affected == 0 {
            txn.rollback().await.map_err(db_err)?;
            return Err(RepoError::NotFound);
        }
        txn.commit().await.map_err(db_err)?;

        Ok(VoteOutcome {
            previous,
            transition,
            created,
        })
    }
}

#[async_trait]
impl FileRepository for PostgresFileRepository {
    async fn find_by_post(&self, post_id: i32) -> Result<Vec<File>, RepoError> {
        let result = FileEntity::find()
            .filter(file::Column::PostId.eq(post_id))
            .order_by_asc(file::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn post_ids_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<i32>, RepoError> {
        let ids: Vec<Option<i32>> = FileEntity::find()
            .select_only()
            .column(file::Column::PostId)
            .distinct()
            .filter(file::Column::PostId.is_not_null())
            .filter(file::Column::CreatedAt.between(stamp(from), stamp(to)))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(ids.into_iter().flatten().collect())
    }
}

#[async_trait]
impl RecommendedPostRepository for PostgresRecommendedPostRepository {
    async fn upsert(&self, post_id: i32, at: DateTime<Utc>) -> Result<(), RepoError> {
        let row = recommended_post::ActiveModel {
            id: NotSet,
            post_id: Set(post_id),
            updated_at: Set(stamp(at)),
        };

        RecommendedPostEntity::insert(row)
            .on_conflict(
                OnConflict::column(recommended_post::Column::PostId)
                    .value(
                        recommended_post::Column::UpdatedAt,
                        Expr::cust(
                            "GREATEST(\"recommended_posts\".\"updated_at\", EXCLUDED.\"updated_at\")",
                        ),
                    )
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    async fn find_by_post_id(&self, post_id: i32) -> Result<Option<RecommendedPost>, RepoError> {
        let result = RecommendedPostEntity::find()
            .filter(recommended_post::Column::PostId.eq(post_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(Into::into))
    }

    async fn latest(&self, limit: u64) -> Result<Vec<RecommendedPost>, RepoError> {
        let result = RecommendedPostEntity::find()
            .order_by_desc(recommended_post::Column::UpdatedAt)
            .order_by_desc(recommended_post::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl HashtagRepository for PostgresHashtagRepository {
    async fn post_ids(&self, filter: &HashtagFilter) -> Result<Vec<i32>, RepoError> {
        let hashtag_id = match filter {
            HashtagFilter::Id(id) => *id,
            HashtagFilter::Title(title) => {
                let found = HashtagEntity::find()
                    .filter(hashtag::Column::Title.eq(title.as_str()))
                    .one(&self.db)
                    .await
                    .map_err(db_err)?;
                match found {
                    Some(tag) => tag.id,
                    None => return Ok(Vec::new()),
                }
            }
        };

        PostHashtagEntity::find()
            .select_only()
            .column(post_hashtag::Column::PostId)
            .filter(post_hashtag::Column::HashtagId.eq(hashtag_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_post(&self, post_id: i32) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::DeletedAt.is_null())
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
