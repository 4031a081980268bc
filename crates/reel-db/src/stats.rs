//! Per-owner like statistics.
//!
//! Two formulations of the same report: a correlated scalar subquery per user
//! and a join with GROUP BY. Both sum `total_likes` over published videos,
//! skip users without a single published video and order by the sum
//! descending, then username ascending.

use rusqlite::Connection;

use crate::Database;
use crate::error::Result;
use crate::models::OwnerLikesRow;

/// The scalar subquery is NULL for users with no published videos. Ordering
/// coalesces that to zero; the NULL itself is kept so shaping can drop them.
const SUBQUERY_SQL: &str = "
    SELECT username, likes_sum
      FROM (SELECT u.username,
                   (SELECT SUM(v.total_likes)
                      FROM videos v
                     WHERE v.owner_id = u.id AND v.is_published = 1) AS likes_sum
              FROM users u)
     ORDER BY COALESCE(likes_sum, 0) DESC, username ASC";

const GROUP_BY_SQL: &str = "
    SELECT u.username, SUM(v.total_likes) AS likes_sum
      FROM users u
      JOIN videos v ON v.owner_id = u.id AND v.is_published = 1
     GROUP BY u.id, u.username
     ORDER BY likes_sum DESC, u.username ASC";

impl Database {
    pub fn likes_by_owner_subquery(&self) -> Result<Vec<OwnerLikesRow>> {
        self.with_conn(|conn| Ok(shape(subquery_raw(conn)?)))
    }

    pub fn likes_by_owner_group_by(&self) -> Result<Vec<OwnerLikesRow>> {
        self.with_conn(group_by)
    }
}

fn subquery_raw(conn: &Connection) -> Result<Vec<(String, Option<i64>)>> {
    let mut stmt = conn.prepare(SUBQUERY_SQL)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn group_by(conn: &Connection) -> Result<Vec<OwnerLikesRow>> {
    let mut stmt = conn.prepare(GROUP_BY_SQL)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(OwnerLikesRow {
                username: row.get(0)?,
                likes_sum: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Owners without published videos are left out, as the join form does.
fn shape(raw: Vec<(String, Option<i64>)>) -> Vec<OwnerLikesRow> {
    raw.into_iter()
        .filter_map(|(username, sum)| sum.map(|likes_sum| OwnerLikesRow { username, likes_sum }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LikeCoordinator;
    use crate::testutil::{temp_db, user, video};

    fn row(username: &str, likes_sum: i64) -> OwnerLikesRow {
        OwnerLikesRow {
            username: username.to_string(),
            likes_sum,
        }
    }

    #[test]
    fn unpublished_videos_do_not_count() {
        let (_dir, db) = temp_db();
        let alice = user(&db, "alice");
        video(&db, &alice, true, 3);
        video(&db, &alice, true, 5);
        video(&db, &alice, false, 100);

        let expected = vec![row("alice", 8)];
        assert_eq!(db.likes_by_owner_subquery().unwrap(), expected);
        assert_eq!(db.likes_by_owner_group_by().unwrap(), expected);
    }

    #[test]
    fn strategies_agree_on_mixed_dataset() {
        let (_dir, db) = temp_db();
        let alice = user(&db, "alice");
        let bob = user(&db, "bob");
        let carol = user(&db, "carol");
        let dave = user(&db, "dave");
        let erin = user(&db, "erin");
        user(&db, "frank"); // owns nothing

        video(&db, &alice, true, 3);
        video(&db, &alice, true, 5);
        video(&db, &alice, false, 100);
        video(&db, &bob, true, 8);
        video(&db, &carol, true, 20);
        video(&db, &dave, false, 50); // only drafts
        video(&db, &erin, true, 0);

        let a = db.likes_by_owner_subquery().unwrap();
        let b = db.likes_by_owner_group_by().unwrap();

        assert_eq!(a, b);
        assert_eq!(
            b,
            vec![row("carol", 20), row("alice", 8), row("bob", 8), row("erin", 0)]
        );
    }

    #[test]
    fn zero_vs_absent_is_pinned() {
        let (_dir, db) = temp_db();
        let alice = user(&db, "alice");
        let bob = user(&db, "bob");
        video(&db, &alice, true, 0);
        video(&db, &bob, false, 9);

        // The raw subquery still sees bob; only the shaped report drops him.
        let raw = db.with_conn(subquery_raw).unwrap();
        assert!(raw.contains(&("bob".to_string(), None)));
        assert!(raw.contains(&("alice".to_string(), Some(0))));

        for report in [
            db.likes_by_owner_subquery().unwrap(),
            db.likes_by_owner_group_by().unwrap(),
        ] {
            assert_eq!(report, vec![row("alice", 0)]);
        }
    }

    #[test]
    fn empty_database_reports_nothing() {
        let (_dir, db) = temp_db();
        assert!(db.likes_by_owner_subquery().unwrap().is_empty());
        assert!(db.likes_by_owner_group_by().unwrap().is_empty());
    }

    #[test]
    fn reports_follow_live_likes() {
        let (_dir, db) = temp_db();
        let alice = user(&db, "alice");
        let bob = user(&db, "bob");
        let fans: Vec<String> = (0..3).map(|i| user(&db, &format!("fan{}", i))).collect();
        let a_vid = video(&db, &alice, true, 0);
        let b_vid = video(&db, &bob, true, 0);

        let likes = LikeCoordinator::new(&db);
        for fan in &fans {
            likes.like(&a_vid, fan).unwrap();
        }
        likes.like(&b_vid, &fans[0]).unwrap();
        likes.unlike(&a_vid, &fans[2]).unwrap();

        let expected = vec![row("alice", 2), row("bob", 1)];
        assert_eq!(db.likes_by_owner_subquery().unwrap(), expected);
        assert_eq!(db.likes_by_owner_group_by().unwrap(), expected);
    }
}
