//! Post handlers.

use actix_web::{HttpResponse, web};

use board_core::domain::{NewPost, PostEdit};
use board_shared::ApiResponse;
use board_shared::dto::{CreatePostRequest, GetPostsQuery, UpdatePostRequest};

use super::mapping;
use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post = state
        .posts
        .create_post(NewPost {
            poster_id: req.poster_id,
            title: req.title,
            content: req.content,
            category: req.category,
            hashtags: req.hashtags,
            file_ids: req.file_ids,
        })
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(mapping::post(post))))
}

/// GET /api/posts?page=&take=&category=&hashtagId=&hashtagTitle=
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<GetPostsQuery>,
) -> AppResult<HttpResponse> {
    let posts = state
        .posts
        .list_posts(mapping::list_query(query.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(mapping::posts(posts))))
}

/// GET /api/posts/search?keyword=
pub async fn search_posts(
    state: web::Data<AppState>,
    query: web::Query<GetPostsQuery>,
) -> AppResult<HttpResponse> {
    let posts = state
        .posts
        .search_posts(mapping::list_query(query.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(mapping::posts(posts))))
}

/// GET /api/posts/recent
pub async fn recent_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.recent_posts().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(mapping::posts(posts))))
}

/// GET /api/posts/popular
pub async fn popular_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.popular_posts().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(mapping::posts(posts))))
}

/// GET /api/posts/emphasized?category=
pub async fn emphasized_posts(
    state: web::Data<AppState>,
    query: web::Query<CategoryQuery>,
) -> AppResult<HttpResponse> {
    let posts = state
        .posts
        .emphasized_posts(query.into_inner().category)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(mapping::posts(posts))))
}

/// GET /api/posts/recommended
pub async fn recommended_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.recommendations.recommended_posts().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(mapping::posts(posts))))
}

/// GET /api/posts/{id} - counts a view.
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let detail = state.posts.read_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(mapping::post_detail(detail))))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let detail = state
        .posts
        .update_post(
            path.into_inner(),
            PostEdit {
                title: req.title,
                content: req.content,
                file_ids: req.file_ids,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(mapping::post_detail(detail))))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let post = state.posts.delete_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(mapping::post(post))))
}
