//! Write-behind persistence mirror for lobby records.
//!
//! The lobby directory is the source of truth. After each committed
//! mutation it enqueues a write on a [`MirrorHandle`]; a background worker
//! applies the writes in order to a [`MirrorStore`]. A failed write is
//! logged and dropped. It is never retried and never rolls back the
//! in-memory state, and nothing is ever read back from the store.
//!
//! Every record lives in the [`LOBBY_COLLECTION`] collection, keyed by
//! lobby id.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tokio::sync::{Mutex, mpsc, oneshot};

/// Collection holding one document per live lobby.
pub const LOBBY_COLLECTION: &str = "lobby";

/// Errors reported by a [`MirrorStore`].
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    /// The store refused the write (e.g. updating a missing document).
    #[error("write to {collection}/{id} rejected: {reason}")]
    Rejected {
        collection: String,
        id: String,
        reason: String,
    },

    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A document store the lobby directory mirrors into.
///
/// # Example
///
/// ```rust
/// use animequiz_lobby::{MirrorError, MirrorStore};
/// use serde_json::Value;
///
/// /// Prints every write instead of storing it.
/// struct PrintStore;
///
/// impl MirrorStore for PrintStore {
///     async fn set(&self, collection: &str, id: &str, doc: Value) -> Result<(), MirrorError> {
///         println!("set {collection}/{id}: {doc}");
///         Ok(())
///     }
///
///     async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), MirrorError> {
///         println!("update {collection}/{id}: {patch}");
///         Ok(())
///     }
///
///     async fn delete(&self, collection: &str, id: &str) -> Result<(), MirrorError> {
///         println!("delete {collection}/{id}");
///         Ok(())
///     }
/// }
/// ```
pub trait MirrorStore: Send + Sync + 'static {
    /// Creates or replaces a whole document.
    fn set(
        &self,
        collection: &str,
        id: &str,
        doc: Value,
    ) -> impl std::future::Future<Output = Result<(), MirrorError>> + Send;

    /// Overwrites the top-level fields present in `patch` on an existing
    /// document.
    fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Value,
    ) -> impl std::future::Future<Output = Result<(), MirrorError>> + Send;

    /// Removes a document.
    fn delete(
        &self,
        collection: &str,
        id: &str,
    ) -> impl std::future::Future<Output = Result<(), MirrorError>> + Send;
}

/// In-process store. Cloning shares the underlying documents, so a test
/// can keep one clone and hand the other to [`MirrorHandle::spawn`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    docs: Arc<Mutex<HashMap<(String, String), Value>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of a stored document.
    pub async fn get(&self, collection: &str, id: &str) -> Option<Value> {
        self.docs
            .lock()
            .await
            .get(&(collection.to_owned(), id.to_owned()))
            .cloned()
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.docs.lock().await.len()
    }

    /// Makes every subsequent write fail with [`MirrorError::Unavailable`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    fn check_available(&self) -> Result<(), MirrorError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(MirrorError::Unavailable("memory store offline".into()));
        }
        Ok(())
    }
}

impl MirrorStore for MemoryStore {
    async fn set(&self, collection: &str, id: &str, doc: Value) -> Result<(), MirrorError> {
        self.check_available()?;
        self.docs
            .lock()
            .await
            .insert((collection.to_owned(), id.to_owned()), doc);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), MirrorError> {
        self.check_available()?;
        let rejected = |reason: &str| MirrorError::Rejected {
            collection: collection.to_owned(),
            id: id.to_owned(),
            reason: reason.to_owned(),
        };

        let mut docs = self.docs.lock().await;
        let doc = docs
            .get_mut(&(collection.to_owned(), id.to_owned()))
            .ok_or_else(|| rejected("no such document"))?;
        let (Value::Object(fields), Value::Object(changes)) = (doc, patch) else {
            return Err(rejected("document and patch must be objects"));
        };
        fields.extend(changes);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), MirrorError> {
        self.check_available()?;
        self.docs
            .lock()
            .await
            .remove(&(collection.to_owned(), id.to_owned()));
        Ok(())
    }
}

/// A queued mirror write.
#[derive(Debug)]
enum MirrorOp {
    Set { id: String, doc: Value },
    Update { id: String, patch: Value },
    Delete { id: String },
    Flush(oneshot::Sender<()>),
}

/// Cheap-to-clone handle that enqueues writes for the mirror worker.
///
/// Enqueuing never blocks and never fails the caller.
#[derive(Debug, Clone)]
pub struct MirrorHandle {
    sender: Option<mpsc::UnboundedSender<MirrorOp>>,
}

impl MirrorHandle {
    /// Spawns the worker task that applies writes to `store`.
    ///
    /// Must be called from within a Tokio runtime. The worker exits once
    /// every handle has been dropped.
    pub fn spawn<S: MirrorStore>(store: S) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(store, receiver));
        Self {
            sender: Some(sender),
        }
    }

    /// A handle that discards every write.
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    pub fn set(&self, id: &str, doc: Value) {
        self.enqueue(MirrorOp::Set {
            id: id.to_owned(),
            doc,
        });
    }

    pub fn update(&self, id: &str, patch: Value) {
        self.enqueue(MirrorOp::Update {
            id: id.to_owned(),
            patch,
        });
    }

    pub fn delete(&self, id: &str) {
        self.enqueue(MirrorOp::Delete { id: id.to_owned() });
    }

    /// Waits until every write enqueued before this call has been applied
    /// (or has failed). Returns immediately for a disabled handle.
    pub async fn flush(&self) {
        let Some(sender) = &self.sender else {
            return;
        };
        let (tx, rx) = oneshot::channel();
        if sender.send(MirrorOp::Flush(tx)).is_ok() {
            let _ = rx.await;
        }
    }

    fn enqueue(&self, op: MirrorOp) {
        if let Some(sender) = &self.sender {
            if sender.send(op).is_err() {
                tracing::warn!("mirror worker gone, write dropped");
            }
        }
    }
}

impl Default for MirrorHandle {
    fn default() -> Self {
        Self::disabled()
    }
}

async fn run_worker<S: MirrorStore>(store: S, mut receiver: mpsc::UnboundedReceiver<MirrorOp>) {
    tracing::debug!("mirror worker started");

    while let Some(op) = receiver.recv().await {
        let (kind, id, result) = match op {
            MirrorOp::Set { id, doc } => {
                let result = store.set(LOBBY_COLLECTION, &id, doc).await;
                ("set", id, result)
            }
            MirrorOp::Update { id, patch } => {
                let result = store.update(LOBBY_COLLECTION, &id, patch).await;
                ("update", id, result)
            }
            MirrorOp::Delete { id } => {
                let result = store.delete(LOBBY_COLLECTION, &id).await;
                ("delete", id, result)
            }
            MirrorOp::Flush(done) => {
                let _ = done.send(());
                continue;
            }
        };

        match result {
            Ok(()) => tracing::trace!(kind, lobby = %id, "mirror write applied"),
            Err(e) => tracing::warn!(kind, lobby = %id, error = %e, "mirror write failed"),
        }
    }

    tracing::debug!("mirror worker stopped");
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_memory_store_update_merges_top_level_fields() {
        let store = MemoryStore::new();
        store
            .set(LOBBY_COLLECTION, "a", json!({"name": "x", "players": []}))
            .await
            .unwrap();

        store
            .update(LOBBY_COLLECTION, "a", json!({"players": [1]}))
            .await
            .unwrap();

        let doc = store.get(LOBBY_COLLECTION, "a").await.unwrap();
        assert_eq!(doc, json!({"name": "x", "players": [1]}));
    }

    #[tokio::test]
    async fn test_memory_store_update_missing_document_is_rejected() {
        let store = MemoryStore::new();
        let result = store.update(LOBBY_COLLECTION, "nope", json!({})).await;
        assert!(matches!(result, Err(MirrorError::Rejected { .. })));
    }

    #[tokio::test]
    async fn test_handle_applies_writes_in_order() {
        let store = MemoryStore::new();
        let mirror = MirrorHandle::spawn(store.clone());

        mirror.set("a", json!({"n": 1}));
        mirror.update("a", json!({"n": 2}));
        mirror.set("b", json!({"n": 3}));
        mirror.delete("b");
        mirror.flush().await;

        assert_eq!(store.get(LOBBY_COLLECTION, "a").await, Some(json!({"n": 2})));
        assert_eq!(store.get(LOBBY_COLLECTION, "b").await, None);
    }

    #[tokio::test]
    async fn test_failed_write_is_dropped_and_worker_continues() {
        let store = MemoryStore::new();
        let mirror = MirrorHandle::spawn(store.clone());

        store.set_failing(true);
        mirror.set("a", json!({}));
        mirror.flush().await;
        store.set_failing(false);
        mirror.set("b", json!({}));
        mirror.flush().await;

        assert_eq!(store.get(LOBBY_COLLECTION, "a").await, None);
        assert!(store.get(LOBBY_COLLECTION, "b").await.is_some());
    }

    #[tokio::test]
    async fn test_disabled_handle_discards_writes() {
        let mirror = MirrorHandle::disabled();
        mirror.set("a", json!({}));
        mirror.update("a", json!({"players": []}));
        mirror.delete("a");
        mirror.flush().await;
    }
}
