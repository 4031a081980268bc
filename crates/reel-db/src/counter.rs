use rusqlite::Transaction;

use crate::error::{Result, StoreError};

/// Keeps `videos.total_likes` in step with the likes table.
///
/// Both adjustments are relative and evaluated by SQLite, so concurrent
/// toggles on a popular video cannot lose updates.
pub trait CounterMaintainer {
    fn increment(&self, tx: &Transaction<'_>, video_id: &str) -> Result<()>;
    fn decrement(&self, tx: &Transaction<'_>, video_id: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteCounter;

impl CounterMaintainer for SqliteCounter {
    fn increment(&self, tx: &Transaction<'_>, video_id: &str) -> Result<()> {
        let updated = tx.execute(
            "UPDATE videos SET total_likes = total_likes + 1 WHERE id = ?1",
            [video_id],
        )?;
        if updated != 1 {
            return Err(violation(format!("increment touched {} rows for video {}", updated, video_id)));
        }
        Ok(())
    }

    fn decrement(&self, tx: &Transaction<'_>, video_id: &str) -> Result<()> {
        let updated = tx.execute(
            "UPDATE videos SET total_likes = total_likes - 1 WHERE id = ?1 AND total_likes > 0",
            [video_id],
        )?;
        if updated != 1 {
            return Err(violation(format!("like counter for video {} would go negative", video_id)));
        }
        Ok(())
    }
}

/// Logged once, where the error is mapped to a response.
fn violation(msg: String) -> StoreError {
    StoreError::InvariantViolation(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{temp_db, user, video};

    fn total_likes(db: &crate::Database, id: &str) -> i64 {
        db.get_video(id).unwrap().unwrap().total_likes
    }

    #[test]
    fn increment_and_decrement_are_relative() {
        let (_dir, db) = temp_db();
        let owner = user(&db, "owner");
        let vid = video(&db, &owner, true, 7);

        db.write_tx(|tx| SqliteCounter.increment(tx, &vid)).unwrap();
        db.write_tx(|tx| SqliteCounter.increment(tx, &vid)).unwrap();
        db.write_tx(|tx| SqliteCounter.decrement(tx, &vid)).unwrap();

        assert_eq!(total_likes(&db, &vid), 8);
    }

    #[test]
    fn decrement_at_zero_is_an_invariant_violation() {
        let (_dir, db) = temp_db();
        let owner = user(&db, "owner");
        let vid = video(&db, &owner, true, 0);

        let result = db.write_tx(|tx| SqliteCounter.decrement(tx, &vid));
        assert!(matches!(result, Err(StoreError::InvariantViolation(_))));
        assert_eq!(total_likes(&db, &vid), 0);
    }

    #[test]
    fn increment_on_missing_video_is_an_invariant_violation() {
        let (_dir, db) = temp_db();
        let result = db.write_tx(|tx| SqliteCounter.increment(tx, "missing"));
        assert!(matches!(result, Err(StoreError::InvariantViolation(_))));
    }
}
