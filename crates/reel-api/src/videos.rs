use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use reel_db::models::{VideoFileRow, VideoRow};
use reel_types::api::{VideoFileResponse, VideoPage, VideoResponse};
use reel_types::models::Quality;

use crate::auth::AppState;
use crate::{blocking, video_id};
use crate::visibility::{Viewer, can_view, scope_for};

const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

/// GET /v1/videos/{id}
pub async fn get_video(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Extension(viewer): Extension<Viewer>,
) -> Result<impl IntoResponse, StatusCode> {
    let id = video_id(&raw_id)?;
    let (row, files) = blocking(&state, move |db| {
        let Some(row) = db.get_video(&id)? else {
            return Ok((None, vec![]));
        };
        let files = db.get_files_for_videos(&[id])?;
        Ok((Some(row), files))
    })
    .await?;

    // Invisible drafts look exactly like missing videos.
    let row = row
        .filter(|row| can_view(&viewer, row))
        .ok_or(StatusCode::NOT_FOUND)?;

    let mut files_by_video = group_files(files);
    Ok(Json(to_response(row, &mut files_by_video)))
}

/// GET /v1/videos?page=&page_size=
pub async fn list_videos(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    Extension(viewer): Extension<Viewer>,
) -> Result<impl IntoResponse, StatusCode> {
    if query.page == 0 || query.page_size == 0 {
        return Err(StatusCode::BAD_REQUEST);
    }
    let page_size = query.page_size.min(MAX_PAGE_SIZE);
    let offset = u64::from(query.page - 1) * u64::from(page_size);
    let scope = scope_for(&viewer);

    let (count, rows, files) = blocking(&state, move |db| {
        let (count, rows) = db.list_videos(&scope, page_size, offset)?;
        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let files = db.get_files_for_videos(&ids)?;
        Ok((count, rows, files))
    })
    .await?;

    let mut files_by_video = group_files(files);
    let results = rows
        .into_iter()
        .map(|row| to_response(row, &mut files_by_video))
        .collect();

    Ok(Json(VideoPage {
        count,
        page: query.page,
        page_size,
        results,
    }))
}

/// GET /v1/videos/ids (staff only), no paging.
pub async fn published_ids(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    let ids = blocking(&state, |db| db.published_video_ids()).await?;

    let ids: Vec<Uuid> = ids
        .into_iter()
        .filter_map(|id| match id.parse() {
            Ok(uuid) => Some(uuid),
            Err(e) => {
                warn!("Corrupt video id '{}': {}", id, e);
                None
            }
        })
        .collect();

    Ok(Json(ids))
}

fn group_files(files: Vec<VideoFileRow>) -> HashMap<String, Vec<VideoFileResponse>> {
    let mut by_video: HashMap<String, Vec<VideoFileResponse>> = HashMap::new();
    for f in files {
        let Some(quality) = Quality::parse(&f.quality) else {
            warn!("Unknown quality '{}' on file '{}'", f.quality, f.id);
            continue;
        };
        let Ok(id) = f.id.parse::<Uuid>() else {
            warn!("Corrupt file id '{}' on video '{}'", f.id, f.video_id);
            continue;
        };
        by_video.entry(f.video_id).or_default().push(VideoFileResponse {
            id,
            file: f.file,
            quality,
        });
    }
    by_video
}

fn to_response(row: VideoRow, files: &mut HashMap<String, Vec<VideoFileResponse>>) -> VideoResponse {
    VideoResponse {
        id: row.id.parse().unwrap_or_else(|e| {
            warn!("Corrupt video id '{}': {}", row.id, e);
            Uuid::default()
        }),
        username: row.owner_username,
        name: row.name,
        total_likes: row.total_likes,
        created_at: parse_timestamp(&row.created_at).unwrap_or_else(|| {
            warn!("Corrupt created_at '{}' on video '{}'", row.created_at, row.id);
            chrono::DateTime::default()
        }),
        files: files.remove(&row.id).unwrap_or_default(),
    }
}

/// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS.SSS" without timezone.
fn parse_timestamp(raw: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    raw.parse::<chrono::DateTime<chrono::Utc>>()
        .ok()
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(|ndt| ndt.and_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn sqlite_timestamps_parse_as_utc() {
        let ts = parse_timestamp("2025-03-04 05:06:07.890").unwrap();
        assert_eq!(ts.hour(), 5);
        assert_eq!(ts.nanosecond(), 890_000_000);
        assert!(parse_timestamp("2025-03-04 05:06:07").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn files_with_unknown_quality_are_skipped() {
        let video_id = Uuid::new_v4().to_string();
        let files = vec![
            VideoFileRow {
                id: Uuid::new_v4().to_string(),
                video_id: video_id.clone(),
                file: "videos/a.mp4".into(),
                quality: "FHD".into(),
            },
            VideoFileRow {
                id: Uuid::new_v4().to_string(),
                video_id: video_id.clone(),
                file: "videos/b.mp4".into(),
                quality: "8K".into(),
            },
        ];

        let grouped = group_files(files);
        assert_eq!(grouped[&video_id].len(), 1);
        assert_eq!(grouped[&video_id][0].quality, Quality::Fhd);
    }
}
