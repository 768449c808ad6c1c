//! Like/dislike handler.

use actix_web::{HttpResponse, web};

use board_core::domain::VoteCommand;
use board_shared::ApiResponse;
use board_shared::dto::CreateLikeRequest;

use super::mapping;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/likes
///
/// Returns every vote on the target post after applying this one.
pub async fn create_like(
    state: web::Data<AppState>,
    body: web::Json<CreateLikeRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let cmd = VoteCommand::parse(req.target_id, req.user_id, req.is_like)?;

    let votes = state.voting.vote(cmd).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(mapping::likes(votes))))
}
