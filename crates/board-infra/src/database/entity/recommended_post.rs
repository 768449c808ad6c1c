//! Recommended-post ledger entity. `post_id` is unique but deliberately not a
//! foreign key.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "recommended_posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub post_id: i32,
    #[sea_orm(indexed)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for board_core::domain::RecommendedPost {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            post_id: model.post_id,
            updated_at: model.updated_at.into(),
        }
    }
}
