//! SeaORM entities. The schema itself is owned by the migration app.

pub mod comment;
pub mod file;
pub mod hashtag;
pub mod post;
pub mod post_hashtag;
pub mod recommended_post;
pub mod user;
pub mod vote;
