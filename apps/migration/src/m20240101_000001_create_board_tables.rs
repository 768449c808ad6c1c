use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk(Users::Id))
                    .col(
                        ColumnDef::new(Users::Nickname)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(timestamp(Users::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Posts::Table)
                    .if_not_exists()
                    .col(pk(Posts::Id))
                    .col(ColumnDef::new(Posts::PosterId).integer().null())
                    .col(ColumnDef::new(Posts::Title).string().not_null())
                    .col(ColumnDef::new(Posts::Content).text().not_null().default(""))
                    .col(ColumnDef::new(Posts::Category).string().not_null().default(""))
                    .col(counter(Posts::Views))
                    .col(counter(Posts::LikeCount))
                    .col(counter(Posts::DislikeCount))
                    .col(timestamp(Posts::CreatedAt))
                    .col(timestamp(Posts::UpdatedAt))
                    .col(
                        ColumnDef::new(Posts::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_posts_poster")
                            .from(Posts::Table, Posts::PosterId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Votes::Table)
                    .if_not_exists()
                    .col(pk(Votes::Id))
                    .col(ColumnDef::new(Votes::PostId).integer().not_null())
                    .col(ColumnDef::new(Votes::UserId).integer().not_null())
                    .col(ColumnDef::new(Votes::IsLike).boolean().null())
                    .col(timestamp(Votes::CreatedAt))
                    .col(timestamp(Votes::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_votes_post")
                            .from(Votes::Table, Votes::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_votes_user")
                            .from(Votes::Table, Votes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One vote row per (post, user); concurrent first votes collide here.
        manager
            .create_index(
                Index::create()
                    .name("ux_votes_post_user")
                    .table(Votes::Table)
                    .col(Votes::PostId)
                    .col(Votes::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Files::Table)
                    .if_not_exists()
                    .col(pk(Files::Id))
                    .col(ColumnDef::new(Files::PostId).integer().null())
                    .col(ColumnDef::new(Files::Url).string().not_null())
                    .col(timestamp(Files::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_files_post")
                            .from(Files::Table, Files::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_files_created_at")
                    .table(Files::Table)
                    .col(Files::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Derived index: post_id is a plain attribute, not a foreign key.
        manager
            .create_table(
                Table::create()
                    .table(RecommendedPosts::Table)
                    .if_not_exists()
                    .col(pk(RecommendedPosts::Id))
                    .col(
                        ColumnDef::new(RecommendedPosts::PostId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(timestamp(RecommendedPosts::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_recommended_posts_updated_at")
                    .table(RecommendedPosts::Table)
                    .col(RecommendedPosts::UpdatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Hashtags::Table)
                    .if_not_exists()
                    .col(pk(Hashtags::Id))
                    .col(
                        ColumnDef::new(Hashtags::Title)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PostHashtags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PostHashtags::PostId).integer().not_null())
                    .col(ColumnDef::new(PostHashtags::HashtagId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(PostHashtags::PostId)
                            .col(PostHashtags::HashtagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_hashtags_post")
                            .from(PostHashtags::Table, PostHashtags::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_hashtags_hashtag")
                            .from(PostHashtags::Table, PostHashtags::HashtagId)
                            .to(Hashtags::Table, Hashtags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(pk(Comments::Id))
                    .col(ColumnDef::new(Comments::PostId).integer().not_null())
                    .col(ColumnDef::new(Comments::CommenterId).integer().null())
                    .col(ColumnDef::new(Comments::Content).text().not_null())
                    .col(timestamp(Comments::CreatedAt))
                    .col(timestamp(Comments::UpdatedAt))
                    .col(
                        ColumnDef::new(Comments::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_post")
                            .from(Comments::Table, Comments::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_commenter")
                            .from(Comments::Table, Comments::CommenterId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Comments::Table.into_iden(),
            PostHashtags::Table.into_iden(),
            Hashtags::Table.into_iden(),
            RecommendedPosts::Table.into_iden(),
            Files::Table.into_iden(),
            Votes::Table.into_iden(),
            Posts::Table.into_iden(),
            Users::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

fn pk<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn timestamp<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

/// Non-negative integer counter starting at zero.
fn counter<T: IntoIden + Copy + 'static>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .integer()
        .not_null()
        .default(0)
        .check(Expr::col(name).gte(0))
        .to_owned()
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Nickname,
    CreatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Posts {
    Table,
    Id,
    PosterId,
    Title,
    Content,
    Category,
    Views,
    LikeCount,
    DislikeCount,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Votes {
    Table,
    Id,
    PostId,
    UserId,
    IsLike,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Files {
    Table,
    Id,
    PostId,
    Url,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RecommendedPosts {
    Table,
    Id,
    PostId,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Hashtags {
    Table,
    Id,
    Title,
}

#[derive(DeriveIden)]
enum PostHashtags {
    Table,
    PostId,
    HashtagId,
}

#[derive(DeriveIden)]
enum Comments {
    Table,
    Id,
    PostId,
    CommenterId,
    Content,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
