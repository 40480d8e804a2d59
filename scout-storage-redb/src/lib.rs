//! # Scout Storage - redb
//!
//! Durable slot store backed by redb. One table maps `kind/key` to the
//! JSON-encoded slot record. redb is synchronous, so every operation runs
//! under `spawn_blocking` with a timeout.
//!
//! ## Example
//!
//! ```no_run
//! use scout_storage_redb::RedbStateStore;
//! use std::path::Path;
//!
//! # async fn example() -> scout_core::Result<()> {
//! let store = RedbStateStore::open(Path::new("./scout.redb")).await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTableMetadata, TableDefinition};
use scout_core::runtime::StateStore;
use scout_core::{Error, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const SLOTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("slots");

/// Timeout for database operations.
const DB_OPERATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Cap on a single slot payload; analysis results with their top videos
/// stay far below this.
const MAX_SLOT_SIZE: usize = 16_000_000;

async fn with_db_timeout<T, F>(operation: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::time::timeout(DB_OPERATION_TIMEOUT, tokio::task::spawn_blocking(operation)).await
    {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(Error::Adapter(format!("task join error: {join_err}"))),
        Err(_) => Err(Error::Adapter(format!(
            "database operation timed out after {DB_OPERATION_TIMEOUT:?}"
        ))),
    }
}

fn slot_key(kind: &str, key: &str) -> String {
    format!("{kind}/{key}")
}

/// redb-backed [`StateStore`].
pub struct RedbStateStore {
    db: Arc<Database>,
}

impl RedbStateStore {
    /// Open (or create) the database at `path` and ensure the slots table
    /// exists.
    pub async fn open(path: &Path) -> Result<Self> {
        info!("opening redb slot store at {}", path.display());
        let path_buf = path.to_path_buf();
        let db = with_db_timeout(move || {
            Database::create(&path_buf)
                .map_err(|e| Error::Adapter(format!("failed to create redb database: {e}")))
        })
        .await?;
        let store = Self { db: Arc::new(db) };
        store.initialize_table().await?;
        Ok(store)
    }

    async fn initialize_table(&self) -> Result<()> {
        let db = Arc::clone(&self.db);
        with_db_timeout(move || {
            let write_txn = db
                .begin_write()
                .map_err(|e| Error::Adapter(format!("failed to begin write transaction: {e}")))?;
            {
                let _slots = write_txn
                    .open_table(SLOTS_TABLE)
                    .map_err(|e| Error::Adapter(format!("failed to open slots table: {e}")))?;
            }
            write_txn
                .commit()
                .map_err(|e| Error::Adapter(format!("failed to commit transaction: {e}")))?;
            Ok(())
        })
        .await
    }

    /// Number of persisted slots, for diagnostics.
    pub async fn slot_count(&self) -> Result<u64> {
        let db = Arc::clone(&self.db);
        with_db_timeout(move || {
            let read_txn = db
                .begin_read()
                .map_err(|e| Error::Adapter(format!("failed to begin read transaction: {e}")))?;
            let table = read_txn
                .open_table(SLOTS_TABLE)
                .map_err(|e| Error::Adapter(format!("failed to open slots table: {e}")))?;
            table
                .len()
                .map_err(|e| Error::Adapter(format!("failed to count slots: {e}")))
        })
        .await
    }
}

#[async_trait]
impl StateStore for RedbStateStore {
    async fn read(&self, kind: &str, key: &str) -> Result<Option<serde_json::Value>> {
        let db = Arc::clone(&self.db);
        let composite = slot_key(kind, key);
        with_db_timeout(move || {
            let read_txn = db
                .begin_read()
                .map_err(|e| Error::Adapter(format!("failed to begin read transaction: {e}")))?;
            let table = read_txn
                .open_table(SLOTS_TABLE)
                .map_err(|e| Error::Adapter(format!("failed to open slots table: {e}")))?;
            let raw = table
                .get(composite.as_str())
                .map_err(|e| Error::Adapter(format!("failed to read slot: {e}")))?;
            match raw {
                Some(bytes) => {
                    let value = serde_json::from_slice(bytes.value())?;
                    Ok(Some(value))
                }
                None => Ok(None),
            }
        })
        .await
    }

    async fn write(&self, kind: &str, key: &str, value: &serde_json::Value) -> Result<()> {
        let bytes = serde_json::to_vec(value)?;
        if bytes.len() > MAX_SLOT_SIZE {
            return Err(Error::Persist(format!(
                "slot payload for {kind}/{key} exceeds {MAX_SLOT_SIZE} bytes"
            )));
        }
        let db = Arc::clone(&self.db);
        let composite = slot_key(kind, key);
        with_db_timeout(move || {
            let write_txn = db
                .begin_write()
                .map_err(|e| Error::Persist(format!("failed to begin write transaction: {e}")))?;
            {
                let mut table = write_txn
                    .open_table(SLOTS_TABLE)
                    .map_err(|e| Error::Persist(format!("failed to open slots table: {e}")))?;
                table
                    .insert(composite.as_str(), bytes.as_slice())
                    .map_err(|e| Error::Persist(format!("failed to write slot: {e}")))?;
            }
            write_txn
                .commit()
                .map_err(|e| Error::Persist(format!("failed to commit slot write: {e}")))?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn round_trips_slot_payloads() {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStateStore::open(&dir.path().join("slots.redb")).await.unwrap();

        assert_eq!(store.read("keyword-analysis", "rust").await.unwrap(), None);

        let payload = json!({"cached_at": "2026-01-01T00:00:00Z", "long_tails": []});
        store.write("keyword-analysis", "rust", &payload).await.unwrap();
        let reread = store.read("keyword-analysis", "rust").await.unwrap();
        assert_eq!(reread, Some(payload));
        assert_eq!(store.slot_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn kinds_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStateStore::open(&dir.path().join("slots.redb")).await.unwrap();

        store
            .write("keyword-analysis", "us", &json!({"a": 1}))
            .await
            .unwrap();
        store
            .write("trending-analysis", "us", &json!({"b": 2}))
            .await
            .unwrap();

        assert_eq!(
            store.read("keyword-analysis", "us").await.unwrap(),
            Some(json!({"a": 1}))
        );
        assert_eq!(
            store.read("trending-analysis", "us").await.unwrap(),
            Some(json!({"b": 2}))
        );
    }

    #[tokio::test]
    async fn overwrites_replace_previous_payloads() {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStateStore::open(&dir.path().join("slots.redb")).await.unwrap();

        store.write("k", "x", &json!({"v": 1})).await.unwrap();
        store.write("k", "x", &json!({"v": 2})).await.unwrap();
        assert_eq!(store.read("k", "x").await.unwrap(), Some(json!({"v": 2})));
        assert_eq!(store.slot_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slots.redb");
        {
            let store = RedbStateStore::open(&path).await.unwrap();
            store.write("k", "x", &json!({"v": 1})).await.unwrap();
        }
        let store = RedbStateStore::open(&path).await.unwrap();
        assert_eq!(store.read("k", "x").await.unwrap(), Some(json!({"v": 1})));
    }
}
