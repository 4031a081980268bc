pub mod auth;
pub mod likes;
pub mod middleware;
pub mod routes;
pub mod stats;
pub mod videos;
pub mod visibility;

use axum::http::StatusCode;
use tracing::error;
use uuid::Uuid;

use reel_db::{Database, StoreError};

pub use auth::{AppState, AppStateInner};
pub use routes::router;

/// Map a store failure to the status the client sees.
pub(crate) fn store_status(err: StoreError) -> StatusCode {
    match err {
        StoreError::NotFound => StatusCode::NOT_FOUND,
        StoreError::InvariantViolation(msg) => {
            error!("Invariant violation: {}", msg);
            StatusCode::INTERNAL_SERVER_ERROR
        }
        e if e.is_transient() => {
            error!("Storage failure: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
        e => {
            error!("Unexpected store error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Path ids that are not UUIDs name no video at all.
pub(crate) fn video_id(raw: &str) -> Result<String, StatusCode> {
    raw.parse::<Uuid>()
        .map(|id| id.to_string())
        .map_err(|_| StatusCode::NOT_FOUND)
}

/// Run a blocking store call off the async runtime.
pub(crate) async fn blocking<F, T>(state: &AppState, f: F) -> Result<T, StatusCode>
where
    F: FnOnce(&Database) -> reel_db::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(store_status)
}
