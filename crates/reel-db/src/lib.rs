pub mod counter;
pub mod error;
pub mod membership;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod seed;
pub mod stats;
pub mod toggle;

use rusqlite::{Connection, OpenFlags, Transaction, TransactionBehavior};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::info;

pub use counter::{CounterMaintainer, SqliteCounter};
pub use error::{Result, StoreError};
pub use membership::{CreateOutcome, MembershipStore, SqliteMembershipStore};
pub use toggle::{LikeCoordinator, LikeStatus, UnlikeStatus};

#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Number of read-only connections in the reader pool.
    pub readers: usize,
    /// How long a statement waits on a lock held by another connection.
    pub busy_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            readers: 4,
            busy_timeout: Duration::from_millis(5000),
        }
    }
}

/// SQLite database with a single writer and a small pool of readers.
///
/// All mutations go through the writer, so two toggles on the same video
/// always serialize. Reads (listings, statistics) never wait on a writer
/// thanks to WAL mode.
pub struct Database {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    reader_idx: AtomicUsize,
}

impl Database {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        Self::open_with(path, &DbConfig::default())
    }

    pub fn open_with(path: &Path, config: &DbConfig) -> anyhow::Result<Self> {
        let writer = Connection::open(path)?;

        // WAL mode for concurrent reads
        writer.pragma_update(None, "journal_mode", "WAL")?;
        writer.pragma_update(None, "foreign_keys", "ON")?;
        writer.busy_timeout(config.busy_timeout)?;

        migrations::run(&writer)?;

        let mut readers = Vec::with_capacity(config.readers.max(1));
        for _ in 0..config.readers.max(1) {
            let conn = Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            conn.busy_timeout(config.busy_timeout)?;
            readers.push(Mutex::new(conn));
        }

        info!(
            "Database opened at {} (1 writer + {} readers)",
            path.display(),
            readers.len()
        );
        Ok(Self {
            writer: Mutex::new(writer),
            readers,
            reader_idx: AtomicUsize::new(0),
        })
    }

    /// Run `f` on a read-only connection.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let idx = self.reader_idx.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        let conn = self.readers[idx]
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("reader lock poisoned: {}", e)))?;
        f(&conn)
    }

    /// Run `f` on the writer connection.
    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self
            .writer
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("writer lock poisoned: {}", e)))?;
        f(&mut conn)
    }

    /// Run `f` inside an IMMEDIATE transaction on the writer.
    ///
    /// Commits only when `f` returns `Ok`. Every other path drops the
    /// transaction, which rolls it back.
    pub fn write_tx<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let value = f(&tx)?;
            tx.commit()?;
            Ok(value)
        })
    }
}
