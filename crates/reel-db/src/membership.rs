use rusqlite::{Connection, ErrorCode, Transaction};

use crate::error::Result;

/// Result of trying to record a like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// The (video, user) like relation. Source of truth for `total_likes`.
pub trait MembershipStore {
    /// Insert the pair. An existing pair is reported as `AlreadyExists`, never as an error.
    fn create(&self, tx: &Transaction<'_>, video_id: &str, user_id: &str) -> Result<CreateOutcome>;

    /// Remove the pair. Returns whether a row was actually deleted.
    fn destroy(&self, tx: &Transaction<'_>, video_id: &str, user_id: &str) -> Result<bool>;

    fn count(&self, conn: &Connection, video_id: &str) -> Result<u64>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteMembershipStore;

impl MembershipStore for SqliteMembershipStore {
    fn create(&self, tx: &Transaction<'_>, video_id: &str, user_id: &str) -> Result<CreateOutcome> {
        // No existence pre-check: the unique constraint decides.
        let inserted = tx.execute(
            "INSERT INTO likes (video_id, user_id) VALUES (?1, ?2)",
            (video_id, user_id),
        );

        match inserted {
            Ok(_) => Ok(CreateOutcome::Created),
            Err(rusqlite::Error::SqliteFailure(err, _)) if is_unique_violation(&err) => {
                Ok(CreateOutcome::AlreadyExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn destroy(&self, tx: &Transaction<'_>, video_id: &str, user_id: &str) -> Result<bool> {
        let deleted = tx.execute(
            "DELETE FROM likes WHERE video_id = ?1 AND user_id = ?2",
            (video_id, user_id),
        )?;
        Ok(deleted == 1)
    }

    fn count(&self, conn: &Connection, video_id: &str) -> Result<u64> {
        let n: i64 = conn.query_row(
            "SELECT COUNT(*) FROM likes WHERE video_id = ?1",
            [video_id],
            |row| row.get(0),
        )?;
        Ok(n as u64)
    }
}

/// Only the UNIQUE constraint counts as "already liked". A foreign key
/// failure (unknown user) must still surface as an error.
pub(crate) fn is_unique_violation(err: &rusqlite::ffi::Error) -> bool {
    err.code == ErrorCode::ConstraintViolation
        && err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
}
