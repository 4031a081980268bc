use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use reel_db::models::OwnerLikesRow;
use reel_types::api::OwnerLikes;

use crate::auth::AppState;
use crate::blocking;

/// GET /v1/videos/statistics-subquery (staff only).
pub async fn by_owner_subquery(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    let rows = blocking(&state, |db| db.likes_by_owner_subquery()).await?;
    Ok(Json(to_response(rows)))
}

/// GET /v1/videos/statistics-group-by (staff only).
pub async fn by_owner_group_by(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    let rows = blocking(&state, |db| db.likes_by_owner_group_by()).await?;
    Ok(Json(to_response(rows)))
}

fn to_response(rows: Vec<OwnerLikesRow>) -> Vec<OwnerLikes> {
    rows.into_iter()
        .map(|r| OwnerLikes {
            username: r.username,
            likes_sum: r.likes_sum,
        })
        .collect()
}
