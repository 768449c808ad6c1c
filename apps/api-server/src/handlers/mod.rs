//! HTTP handlers and route configuration.

mod health;
mod likes;
mod mapping;
mod posts;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .route("/likes", web::post().to(likes::create_like))
            // Fixed paths first so they never parse as `{id}`
            .service(
                web::scope("/posts")
                    .route("", web::post().to(posts::create_post))
                    .route("", web::get().to(posts::list_posts))
                    .route("/search", web::get().to(posts::search_posts))
                    .route("/recent", web::get().to(posts::recent_posts))
                    .route("/popular", web::get().to(posts::popular_posts))
                    .route("/emphasized", web::get().to(posts::emphasized_posts))
                    .route("/recommended", web::get().to(posts::recommended_posts))
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}", web::put().to(posts::update_post))
                    .route("/{id}", web::delete().to(posts::delete_post)),
            ),
    );
}
