/// Database row types. These map directly to SQLite rows.
/// Distinct from reel-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub is_staff: bool,
    pub created_at: String,
}

pub struct VideoRow {
    pub id: String,
    pub owner_id: String,
    pub owner_username: String,
    pub name: String,
    pub is_published: bool,
    pub total_likes: i64,
    pub created_at: String,
}

pub struct VideoFileRow {
    pub id: String,
    pub video_id: String,
    pub file: String,
    pub quality: String,
}

/// One line of the per-owner like statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerLikesRow {
    pub username: String,
    pub likes_sum: i64,
}
