use crate::Database;
use crate::error::Result;
use crate::membership::is_unique_violation;
use crate::models::{UserRow, VideoFileRow, VideoRow};
use rusqlite::types::ToSql;
use rusqlite::{Connection, OptionalExtension, Row, params};

/// Which videos a listing may return. Mirrors `visibility::can_view` in reel-api.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoScope {
    All,
    PublishedOrOwnedBy(String),
    Published,
}

const VIDEO_COLUMNS: &str = "v.id, v.owner_id, u.username, v.name, v.is_published, v.total_likes, v.created_at";

impl Database {
    // -- Users --

    /// Returns `false` when the username is already taken.
    pub fn create_user(&self, id: &str, username: &str, password_hash: &str, is_staff: bool) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (id, username, password, is_staff) VALUES (?1, ?2, ?3, ?4)",
                params![id, username, password_hash, is_staff],
            );
            match inserted {
                Ok(_) => Ok(true),
                Err(rusqlite::Error::SqliteFailure(err, _)) if is_unique_violation(&err) => Ok(false),
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username", username))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    // -- Videos --

    pub fn create_video(&self, id: &str, owner_id: &str, name: &str, is_published: bool) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO videos (id, owner_id, name, is_published) VALUES (?1, ?2, ?3, ?4)",
                params![id, owner_id, name, is_published],
            )?;
            Ok(())
        })
    }

    #[cfg(test)]
    pub(crate) fn set_published(&self, id: &str, is_published: bool) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let updated = conn.execute(
                "UPDATE videos SET is_published = ?1 WHERE id = ?2",
                params![is_published, id],
            )?;
            Ok(updated == 1)
        })
    }

    pub fn add_video_file(&self, id: &str, video_id: &str, file: &str, quality: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO video_files (id, video_id, file, quality) VALUES (?1, ?2, ?3, ?4)",
                params![id, video_id, file, quality],
            )?;
            Ok(())
        })
    }

    pub fn get_video(&self, id: &str) -> Result<Option<VideoRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {VIDEO_COLUMNS} FROM videos v JOIN users u ON u.id = v.owner_id WHERE v.id = ?1"
            );
            let row = conn.query_row(&sql, [id], video_from_row).optional()?;
            Ok(row)
        })
    }

    /// One page of videos visible under `scope`, newest first, plus the total count.
    pub fn list_videos(&self, scope: &VideoScope, limit: u32, offset: u64) -> Result<(u64, Vec<VideoRow>)> {
        self.with_conn(|conn| query_video_page(conn, scope, limit, offset))
    }

    /// Ids of all published videos, newest first. No paging.
    pub fn published_video_ids(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id FROM videos WHERE is_published = 1 ORDER BY created_at DESC, rowid DESC",
            )?;
            let ids = stmt
                .query_map([], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;
            Ok(ids)
        })
    }

    /// Batch-fetch files for a set of video IDs.
    pub fn get_files_for_videos(&self, video_ids: &[String]) -> Result<Vec<VideoFileRow>> {
        if video_ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let placeholders: Vec<String> = (1..=video_ids.len()).map(|i| format!("?{}", i)).collect();
            let sql = format!(
                "SELECT id, video_id, file, quality FROM video_files WHERE video_id IN ({}) ORDER BY rowid",
                placeholders.join(", ")
            );

            let mut stmt = conn.prepare(&sql)?;
            let params: Vec<&dyn ToSql> = video_ids.iter().map(|id| id as &dyn ToSql).collect();

            let rows = stmt
                .query_map(params.as_slice(), |row| {
                    Ok(VideoFileRow {
                        id: row.get(0)?,
                        video_id: row.get(1)?,
                        file: row.get(2)?,
                        quality: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    // `column` is always one of our literals, never user input.
    let sql = format!("SELECT id, username, password, is_staff, created_at FROM users WHERE {column} = ?1");
    let row = conn
        .query_row(&sql, [value], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                is_staff: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_video_page(
    conn: &Connection,
    scope: &VideoScope,
    limit: u32,
    offset: u64,
) -> Result<(u64, Vec<VideoRow>)> {
    let (filter, owner): (&str, Option<&str>) = match scope {
        VideoScope::All => ("1 = 1", None),
        VideoScope::Published => ("v.is_published = 1", None),
        VideoScope::PublishedOrOwnedBy(owner_id) => {
            ("(v.is_published = 1 OR v.owner_id = ?1)", Some(owner_id.as_str()))
        }
    };

    let count_sql = format!("SELECT COUNT(*) FROM videos v WHERE {filter}");
    let count: i64 = match owner {
        Some(owner_id) => conn.query_row(&count_sql, [owner_id], |r| r.get(0))?,
        None => conn.query_row(&count_sql, [], |r| r.get(0))?,
    };

    let page_sql = format!(
        "SELECT {VIDEO_COLUMNS} FROM videos v JOIN users u ON u.id = v.owner_id
         WHERE {filter}
         ORDER BY v.created_at DESC, v.rowid DESC
         LIMIT {limit} OFFSET {offset}"
    );
    let mut stmt = conn.prepare(&page_sql)?;
    let rows = match owner {
        Some(owner_id) => stmt.query_map([owner_id], video_from_row)?,
        None => stmt.query_map([], video_from_row)?,
    }
    .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok((count as u64, rows))
}

fn video_from_row(row: &Row<'_>) -> rusqlite::Result<VideoRow> {
    Ok(VideoRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        owner_username: row.get(2)?,
        name: row.get(3)?,
        is_published: row.get(4)?,
        total_likes: row.get(5)?,
        created_at: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{temp_db, user, video};

    #[test]
    fn scopes_filter_listing() {
        let (_dir, db) = temp_db();
        let alice = user(&db, "alice");
        let bob = user(&db, "bob");
        video(&db, &alice, true, 0);
        video(&db, &alice, false, 0);
        video(&db, &bob, false, 0);

        let (all, _) = db.list_videos(&VideoScope::All, 50, 0).unwrap();
        let (public, _) = db.list_videos(&VideoScope::Published, 50, 0).unwrap();
        let (for_bob, rows) = db
            .list_videos(&VideoScope::PublishedOrOwnedBy(bob.clone()), 50, 0)
            .unwrap();

        assert_eq!((all, public, for_bob), (3, 1, 2));
        assert!(rows.iter().all(|v| v.is_published || v.owner_id == bob));
    }

    #[test]
    fn listing_is_newest_first_and_paged() {
        let (_dir, db) = temp_db();
        let alice = user(&db, "alice");
        let ids: Vec<String> = (0..5).map(|_| video(&db, &alice, true, 0)).collect();

        let (count, first) = db.list_videos(&VideoScope::Published, 2, 0).unwrap();
        let (_, last) = db.list_videos(&VideoScope::Published, 2, 4).unwrap();

        assert_eq!(count, 5);
        assert_eq!(first.iter().map(|v| v.id.as_str()).collect::<Vec<_>>(), vec![&ids[4][..], &ids[3][..]]);
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].id, ids[0]);
        assert_eq!(first[0].owner_username, "alice");
    }

    #[test]
    fn published_ids_skip_drafts() {
        let (_dir, db) = temp_db();
        let alice = user(&db, "alice");
        let public = video(&db, &alice, true, 0);
        let draft = video(&db, &alice, false, 0);

        assert_eq!(db.published_video_ids().unwrap(), vec![public.clone()]);

        assert!(db.set_published(&draft, true).unwrap());
        assert_eq!(db.published_video_ids().unwrap(), vec![draft, public]);
    }

    #[test]
    fn files_are_fetched_in_batch() {
        let (_dir, db) = temp_db();
        let alice = user(&db, "alice");
        let a = video(&db, &alice, true, 0);
        let b = video(&db, &alice, true, 0);
        db.add_video_file("f1", &a, "videos/a_720.mp4", "HD").unwrap();
        db.add_video_file("f2", &a, "videos/a_2160.mp4", "UHD").unwrap();
        db.add_video_file("f3", &b, "videos/b_1080.mp4", "FHD").unwrap();

        let files = db.get_files_for_videos(&[a.clone()]).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.video_id == a));

        assert!(db.add_video_file("f4", &b, "videos/b.mp4", "8K").is_err());
        assert!(db.get_files_for_videos(&[]).unwrap().is_empty());
    }

    #[test]
    fn duplicate_username_rejected() {
        let (_dir, db) = temp_db();
        assert!(db.create_user("1", "alice", "x", false).unwrap());
        assert!(!db.create_user("2", "alice", "x", false).unwrap());
        assert!(db.get_user_by_username("alice").unwrap().is_some());
    }
}
