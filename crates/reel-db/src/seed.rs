//! Bulk inserts for generating benchmark data.
//!
//! Seeded videos carry synthetic `total_likes` without matching like rows.
//! That is fine for exercising the statistics queries, but such a database
//! no longer satisfies the counter invariant for toggles.

use crate::Database;
use crate::error::Result;

/// Stored in place of a password hash. Never parses, so login always fails.
pub const UNUSABLE_PASSWORD: &str = "!";

pub struct NewVideo {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub is_published: bool,
    pub total_likes: i64,
}

impl Database {
    /// Insert `(id, username)` pairs in one transaction. Existing usernames are skipped.
    pub fn insert_users_batch(&self, users: &[(String, String)]) -> Result<usize> {
        self.write_tx(|tx| {
            let mut stmt = tx.prepare_cached(
                "INSERT OR IGNORE INTO users (id, username, password) VALUES (?1, ?2, ?3)",
            )?;
            let mut inserted = 0;
            for (id, username) in users {
                inserted += stmt.execute((id, username, UNUSABLE_PASSWORD))?;
            }
            Ok(inserted)
        })
    }

    pub fn insert_videos_batch(&self, videos: &[NewVideo]) -> Result<()> {
        self.write_tx(|tx| {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO videos (id, owner_id, name, is_published, total_likes)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for v in videos {
                stmt.execute((&v.id, &v.owner_id, &v.name, v.is_published, v.total_likes))?;
            }
            Ok(())
        })
    }

    pub fn user_ids(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id FROM users ORDER BY rowid")?;
            let ids = stmt
                .query_map([], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;
            Ok(ids)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::temp_db;

    #[test]
    fn batches_land_atomically() {
        let (_dir, db) = temp_db();
        let users: Vec<(String, String)> = (0..10)
            .map(|i| (format!("id{}", i), format!("user{}", i)))
            .collect();
        assert_eq!(db.insert_users_batch(&users).unwrap(), 10);
        assert_eq!(db.insert_users_batch(&users[..2]).unwrap(), 0);

        let owners = db.user_ids().unwrap();
        let videos: Vec<NewVideo> = (0..20)
            .map(|i| NewVideo {
                id: format!("v{}", i),
                owner_id: owners[i % owners.len()].clone(),
                name: format!("video_{}", i),
                is_published: true,
                total_likes: 2,
            })
            .collect();
        db.insert_videos_batch(&videos).unwrap();

        let stats = db.likes_by_owner_group_by().unwrap();
        assert_eq!(stats.len(), 10);
        assert!(stats.iter().all(|r| r.likes_sum == 4));
        assert_eq!(stats, db.likes_by_owner_subquery().unwrap());

        // A bad row rolls back the whole batch.
        let broken = vec![NewVideo {
            id: "v-bad".into(),
            owner_id: "nobody".into(),
            name: "x".into(),
            is_published: true,
            total_likes: 1,
        }];
        assert!(db.insert_videos_batch(&broken).is_err());
        assert!(db.get_video("v-bad").unwrap().is_none());
    }
}
