use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Quality;

// -- JWT Claims --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    #[serde(default)]
    pub is_staff: bool,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

// -- Videos --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoFileResponse {
    pub id: Uuid,
    pub file: String,
    pub quality: Quality,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoResponse {
    pub id: Uuid,
    /// Owner's username.
    pub username: String,
    pub name: String,
    pub total_likes: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub files: Vec<VideoFileResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VideoPage {
    pub count: u64,
    pub page: u32,
    pub page_size: u32,
    pub results: Vec<VideoResponse>,
}

// -- Likes --

#[derive(Debug, Serialize, Deserialize)]
pub struct Detail {
    pub detail: String,
}

impl Detail {
    pub fn new(detail: &str) -> Self {
        Self {
            detail: detail.to_string(),
        }
    }
}

// -- Statistics --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerLikes {
    pub username: String,
    pub likes_sum: i64,
}
