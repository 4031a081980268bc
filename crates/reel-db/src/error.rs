use rusqlite::ErrorCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that cross the store boundary.
///
/// Uniqueness races on the likes table never show up here: the membership
/// store turns them into `CreateOutcome::AlreadyExists`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Video is missing or not published. Deliberately the same answer for both.
    #[error("video not found")]
    NotFound,

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A logic defect upstream, e.g. the like counter would go negative.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl StoreError {
    /// Whether the caller may simply retry the same operation.
    ///
    /// Only lock contention and I/O trouble qualify. Constraint failures and
    /// malformed SQL fail the same way every time.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unavailable(_) => true,
            Self::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                ErrorCode::DatabaseBusy
                    | ErrorCode::DatabaseLocked
                    | ErrorCode::SystemIoFailure
                    | ErrorCode::CannotOpen
                    | ErrorCode::DiskFull
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LikeCoordinator;
    use crate::testutil::{temp_db, user, video};

    fn sqlite_failure(code: std::os::raw::c_int) -> StoreError {
        StoreError::Sqlite(rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(code), None))
    }

    #[test]
    fn busy_and_io_failures_are_transient() {
        assert!(StoreError::Unavailable("pool closed".into()).is_transient());
        assert!(sqlite_failure(rusqlite::ffi::SQLITE_BUSY).is_transient());
        assert!(sqlite_failure(rusqlite::ffi::SQLITE_LOCKED).is_transient());
        assert!(sqlite_failure(rusqlite::ffi::SQLITE_IOERR).is_transient());
        assert!(sqlite_failure(rusqlite::ffi::SQLITE_FULL).is_transient());
    }

    #[test]
    fn permanent_failures_are_not_transient() {
        assert!(!StoreError::NotFound.is_transient());
        assert!(!StoreError::InvariantViolation("negative".into()).is_transient());
        assert!(!sqlite_failure(rusqlite::ffi::SQLITE_CONSTRAINT).is_transient());
        assert!(!StoreError::Sqlite(rusqlite::Error::QueryReturnedNoRows).is_transient());
    }

    #[test]
    fn like_from_unknown_user_is_not_retryable() {
        let (_dir, db) = temp_db();
        let owner = user(&db, "owner");
        let vid = video(&db, &owner, true, 0);

        let err = LikeCoordinator::new(&db).like(&vid, "ghost").unwrap_err();
        assert!(matches!(err, StoreError::Sqlite(_)));
        assert!(!err.is_transient());
    }
}
