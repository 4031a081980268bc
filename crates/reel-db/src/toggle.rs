use rusqlite::{OptionalExtension, Transaction};
use tracing::debug;

use crate::Database;
use crate::counter::{CounterMaintainer, SqliteCounter};
use crate::error::{Result, StoreError};
use crate::membership::{CreateOutcome, MembershipStore, SqliteMembershipStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeStatus {
    Liked,
    AlreadyLiked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlikeStatus {
    Unliked,
    NotFound,
}

/// Sequences a membership change and its counter adjustment as one unit.
///
/// Both steps share a single IMMEDIATE transaction, so either both land or
/// neither does.
pub struct LikeCoordinator<'a, M = SqliteMembershipStore, C = SqliteCounter> {
    db: &'a Database,
    store: M,
    counter: C,
}

impl<'a> LikeCoordinator<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self::with_parts(db, SqliteMembershipStore, SqliteCounter)
    }
}

impl<'a, M, C> LikeCoordinator<'a, M, C>
where
    M: MembershipStore,
    C: CounterMaintainer,
{
    pub fn with_parts(db: &'a Database, store: M, counter: C) -> Self {
        Self { db, store, counter }
    }

    pub fn like(&self, video_id: &str, user_id: &str) -> Result<LikeStatus> {
        self.db.write_tx(|tx| {
            ensure_likeable(tx, video_id)?;

            match self.store.create(tx, video_id, user_id)? {
                CreateOutcome::Created => {
                    self.counter.increment(tx, video_id)?;
                    debug!("user {} liked video {}", user_id, video_id);
                    Ok(LikeStatus::Liked)
                }
                CreateOutcome::AlreadyExists => Ok(LikeStatus::AlreadyLiked),
            }
        })
    }

    pub fn unlike(&self, video_id: &str, user_id: &str) -> Result<UnlikeStatus> {
        self.db.write_tx(|tx| {
            ensure_likeable(tx, video_id)?;

            if self.store.destroy(tx, video_id, user_id)? {
                self.counter.decrement(tx, video_id)?;
                debug!("user {} unliked video {}", user_id, video_id);
                Ok(UnlikeStatus::Unliked)
            } else {
                Ok(UnlikeStatus::NotFound)
            }
        })
    }
}

/// Only published videos take likes. Unpublished ones look missing.
fn ensure_likeable(tx: &Transaction<'_>, video_id: &str) -> Result<()> {
    let published: Option<bool> = tx
        .query_row(
            "SELECT is_published FROM videos WHERE id = ?1",
            [video_id],
            |row| row.get(0),
        )
        .optional()?;

    match published {
        Some(true) => Ok(()),
        _ => Err(StoreError::NotFound),
    }
}
