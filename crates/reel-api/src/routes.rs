use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{self, AppState};
use crate::middleware::{optional_auth, require_auth, require_staff};
use crate::{likes, stats, videos};

/// All HTTP routes. Transport layers (CORS, tracing) are added by the server.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/health", get(health));

    let browse_routes = Router::new()
        .route("/v1/videos", get(videos::list_videos))
        .route("/v1/videos/{video_id}", get(videos::get_video))
        .layer(middleware::from_fn_with_state(state.clone(), optional_auth));

    let protected_routes = Router::new()
        .route(
            "/v1/videos/{video_id}/likes",
            post(likes::like_video).delete(likes::unlike_video),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Layers run outside-in: authenticate first, then check the staff flag.
    let staff_routes = Router::new()
        .route("/v1/videos/ids", get(videos::published_ids))
        .route("/v1/videos/statistics-subquery", get(stats::by_owner_subquery))
        .route("/v1/videos/statistics-group-by", get(stats::by_owner_group_by))
        .layer(middleware::from_fn(require_staff))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(browse_routes)
        .merge(protected_routes)
        .merge(staff_routes)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
