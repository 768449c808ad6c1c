//! Domain to wire conversions.

use board_core::domain::{
    Comment, File, HashtagFilter, Post, PostDetail, PostListQuery, User, Vote,
};
use board_shared::dto::{
    CommentResponse, FileResponse, GetPostsQuery, LikeResponse, PostDetailResponse, PostResponse,
    UserResponse,
};

pub fn post(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        poster_id: post.poster_id,
        title: post.title,
        content: post.content,
        category: post.category,
        views: post.views,
        like_count: post.like_count,
        dislike_count: post.dislike_count,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

pub fn posts(posts: Vec<Post>) -> Vec<PostResponse> {
    posts.into_iter().map(post).collect()
}

pub fn post_detail(detail: PostDetail) -> PostDetailResponse {
    PostDetailResponse {
        post: post(detail.post),
        poster: detail.poster.map(user),
        files: detail.files.into_iter().map(file).collect(),
        likes: likes(detail.votes),
        comments: detail.comments.into_iter().map(comment).collect(),
    }
}

pub fn likes(votes: Vec<Vote>) -> Vec<LikeResponse> {
    votes
        .into_iter()
        .map(|v| LikeResponse {
            id: v.id,
            post_id: v.post_id,
            user_id: v.user_id,
            is_like: v.is_like,
            updated_at: v.updated_at,
        })
        .collect()
}

fn user(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        nickname: user.nickname,
    }
}

fn file(file: File) -> FileResponse {
    FileResponse {
        id: file.id,
        url: file.url,
        created_at: file.created_at,
    }
}

fn comment(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        commenter_id: comment.commenter_id,
        content: comment.content,
        created_at: comment.created_at,
    }
}

/// A hashtag id wins over a hashtag title when both are given.
pub fn list_query(query: GetPostsQuery) -> PostListQuery {
    let hashtag = match (query.hashtag_id, query.hashtag_title) {
        (Some(id), _) => Some(HashtagFilter::Id(id)),
        (None, Some(title)) => Some(HashtagFilter::Title(title)),
        (None, None) => None,
    };
    PostListQuery {
        page: query.page,
        take: query.take,
        category: query.category,
        hashtag,
        keyword: query.keyword,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashtag_id_takes_precedence() {
        let query = list_query(GetPostsQuery {
            hashtag_id: Some(4),
            hashtag_title: Some("rust".into()),
            ..Default::default()
        });
        assert_eq!(query.hashtag, Some(HashtagFilter::Id(4)));

        let query = list_query(GetPostsQuery {
            hashtag_title: Some("rust".into()),
            ..Default::default()
        });
        assert_eq!(query.hashtag, Some(HashtagFilter::Title("rust".into())));
    }
}
