use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (users, videos, likes)");
        conn.execute_batch(
            "
            BEGIN;

            CREATE TABLE users (
                id          TEXT PRIMARY KEY,
                username    TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                is_staff    INTEGER NOT NULL DEFAULT 0,
                created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
            );

            CREATE TABLE videos (
                id            TEXT PRIMARY KEY,
                owner_id      TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name          TEXT NOT NULL,
                is_published  INTEGER NOT NULL DEFAULT 0,
                total_likes   INTEGER NOT NULL DEFAULT 0 CHECK (total_likes >= 0),
                created_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
            );

            CREATE INDEX idx_videos_created ON videos(created_at);
            CREATE INDEX idx_videos_owner_published ON videos(owner_id, is_published);

            CREATE TABLE video_files (
                id        TEXT PRIMARY KEY,
                video_id  TEXT NOT NULL REFERENCES videos(id) ON DELETE CASCADE,
                file      TEXT NOT NULL,
                quality   TEXT NOT NULL CHECK (quality IN ('HD', 'FHD', 'UHD'))
            );

            CREATE INDEX idx_video_files_video ON video_files(video_id);

            -- The unique constraint is what arbitrates concurrent likes.
            -- It also serves as the (video_id, user_id) lookup index.
            CREATE TABLE likes (
                video_id    TEXT NOT NULL REFERENCES videos(id) ON DELETE CASCADE,
                user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
                CONSTRAINT unique_like_user_video UNIQUE (video_id, user_id)
            );

            CREATE INDEX idx_likes_user ON likes(user_id);

            INSERT INTO schema_version (version) VALUES (1);

            COMMIT;
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
