use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use reel_db::{LikeCoordinator, LikeStatus, UnlikeStatus};
use reel_types::api::{Claims, Detail};

use crate::auth::AppState;
use crate::{blocking, video_id};

/// POST /v1/videos/{video_id}/likes
pub async fn like_video(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, StatusCode> {
    let video_id = video_id(&raw_id)?;
    let user_id = claims.sub.to_string();
    let status = blocking(&state, move |db| {
        LikeCoordinator::new(db).like(&video_id, &user_id)
    })
    .await?;

    Ok(match status {
        LikeStatus::Liked => (StatusCode::CREATED, Json(Detail::new("liked"))).into_response(),
        LikeStatus::AlreadyLiked => (StatusCode::OK, Json(Detail::new("already_liked"))).into_response(),
    })
}

/// DELETE /v1/videos/{video_id}/likes
pub async fn unlike_video(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, StatusCode> {
    let video_id = video_id(&raw_id)?;
    let user_id = claims.sub.to_string();
    let status = blocking(&state, move |db| {
        LikeCoordinator::new(db).unlike(&video_id, &user_id)
    })
    .await?;

    Ok(match status {
        UnlikeStatus::Unliked => StatusCode::NO_CONTENT.into_response(),
        UnlikeStatus::NotFound => (StatusCode::NOT_FOUND, Json(Detail::new("not_found"))).into_response(),
    })
}
