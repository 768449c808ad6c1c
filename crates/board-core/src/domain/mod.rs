//! Domain entities - the core business objects.

mod comment;
mod file;
mod hashtag;
mod post;
mod query;
mod recommended_post;
mod user;
mod vote;

pub use comment::Comment;
pub use file::File;
pub use hashtag::{Hashtag, HashtagFilter};
pub use post::{NewPost, Post, PostDetail, PostEdit};
pub use query::{Pagination, PostFilter, PostListQuery, PostSort};
pub use recommended_post::RecommendedPost;
pub use user::User;
pub use vote::{CounterDelta, Vote, VoteCommand, VoteOutcome, VoteTransition};
