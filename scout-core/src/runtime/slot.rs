//! Durable state slots mounted into actors.
//!
//! A slot is read once when its owning actor activates and written back only
//! on an explicit commit, after the actor has produced a complete result.
//! Serialisation is JSON so that records can grow fields over time: slot
//! types mark every field `#[serde(default)]` and older payloads fill the
//! gaps with zero values.

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

/// Backend for durable slot records, keyed by (actor kind, key).
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read the raw slot payload, `None` when the slot was never written.
    async fn read(&self, kind: &str, key: &str) -> Result<Option<serde_json::Value>>;

    /// Write-through the slot payload.
    async fn write(&self, kind: &str, key: &str, value: &serde_json::Value) -> Result<()>;
}

/// In-memory state store used by tests and storage-less deployments.
#[derive(Default)]
pub struct MemoryStateStore {
    slots: RwLock<HashMap<(String, String), serde_json::Value>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn read(&self, kind: &str, key: &str) -> Result<Option<serde_json::Value>> {
        let slots = self.slots.read().await;
        Ok(slots.get(&(kind.to_string(), key.to_string())).cloned())
    }

    async fn write(&self, kind: &str, key: &str, value: &serde_json::Value) -> Result<()> {
        let mut slots = self.slots.write().await;
        slots.insert((kind.to_string(), key.to_string()), value.clone());
        Ok(())
    }
}

/// A typed durable slot bound to one actor identity.
pub struct DurableSlot<T> {
    store: Arc<dyn StateStore>,
    kind: &'static str,
    key: String,
    value: T,
}

impl<T: std::fmt::Debug> std::fmt::Debug for DurableSlot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DurableSlot")
            .field("kind", &self.kind)
            .field("key", &self.key)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl<T> DurableSlot<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    /// Mount the slot for (kind, key), reading any persisted record. An
    /// unreachable store fails activation with [`Error::RouteUnavailable`];
    /// an undecodable record is replaced by the default and overwritten on
    /// the next commit.
    pub async fn mount(store: Arc<dyn StateStore>, kind: &'static str, key: &str) -> Result<Self> {
        let value = match store.read(kind, key).await {
            Ok(Some(raw)) => match serde_json::from_value(raw) {
                Ok(value) => value,
                Err(e) => {
                    warn!(kind, key, error = %e, "discarding undecodable slot record");
                    T::default()
                }
            },
            Ok(None) => T::default(),
            Err(e) => {
                return Err(Error::RouteUnavailable(format!(
                    "state store unreachable mounting {kind}/{key}: {e}"
                )));
            }
        };
        Ok(Self {
            store,
            kind,
            key: key.to_string(),
            value,
        })
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Persist the current value. The in-memory value stays authoritative
    /// either way; a failed write surfaces [`Error::Persist`] and leaves the
    /// previously persisted bytes untouched.
    pub async fn commit(&self) -> Result<()> {
        let raw = serde_json::to_value(&self.value)?;
        self.store
            .write(self.kind, &self.key, &raw)
            .await
            .map_err(|e| Error::Persist(format!("{}/{}: {e}", self.kind, self.key)))
    }
}
