//! JSON-file-backed session store.
//!
//! Satisfies the tower-sessions `SessionStore` contract with an in-memory
//! map that a background task serializes to `sessions.json` on a fixed
//! interval rather than on every write. A crash loses at most one interval
//! of session writes - the same latency/durability tradeoff the entity
//! collections accept, traded further toward latency because session churn
//! is much higher.
//!
//! The flush task is owned by the store's lifecycle: spawned on init,
//! stopped (with a final flush) on shutdown. Tests call
//! [`JsonSessionStore::flush_now`] instead of waiting on the wall clock.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::{ExpiredDeletion, SessionStore, session_store};

use super::persist::{PersistError, SESSIONS_FILE, encode, load_collection};

/// How often the session map is flushed to disk.
pub const SESSION_FLUSH_INTERVAL: Duration = Duration::from_secs(5);

/// In-memory session store mirrored to a JSON file.
#[derive(Debug, Clone)]
pub struct JsonSessionStore {
    path: PathBuf,
    sessions: Arc<Mutex<HashMap<Id, Record>>>,
}

impl JsonSessionStore {
    /// Open the session store, rehydrating any records persisted by a
    /// previous process.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if an existing session file is unreadable
    /// or corrupt.
    pub fn open(data_dir: &Path) -> Result<Self, PersistError> {
        let persisted: BTreeMap<String, Record> = load_collection(data_dir, SESSIONS_FILE)?;
        let sessions = persisted
            .into_values()
            .map(|record| (record.id, record))
            .collect();

        Ok(Self {
            path: data_dir.join(SESSIONS_FILE),
            sessions: Arc::new(Mutex::new(sessions)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Id, Record>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Serialize the whole session map to its file immediately.
    ///
    /// The periodic task calls this on every tick; tests call it directly
    /// for a deterministic flush.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be written.
    pub async fn flush_now(&self) -> std::io::Result<()> {
        let snapshot: BTreeMap<String, Record> = self
            .lock()
            .values()
            .map(|record| (record.id.to_string(), record.clone()))
            .collect();

        let Some(bytes) = encode(SESSIONS_FILE, &snapshot) else {
            return Ok(());
        };
        tokio::fs::write(&self.path, bytes).await
    }

    /// Spawn the periodic flush task. Expired sessions are purged before
    /// each flush so they never outlive their expiry on disk.
    #[must_use]
    pub fn spawn_flush_task(&self, interval: Duration) -> SessionFlushTask {
        let store = self.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so a flush only
            // happens after a full interval of potential writes.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = store.delete_expired().await {
                    tracing::warn!(error = %e, "failed to purge expired sessions");
                }
                if let Err(e) = store.flush_now().await {
                    tracing::error!(error = %e, "failed to flush sessions");
                }
            }
        });

        SessionFlushTask {
            handle,
            store: self.clone(),
        }
    }

    /// Number of live (unexpired or not-yet-purged) sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store holds no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[async_trait]
impl SessionStore for JsonSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        let mut sessions = self.lock();
        // Regenerate on id collision.
        while sessions.contains_key(&record.id) {
            record.id = Id::default();
        }
        sessions.insert(record.id, record.clone());
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.lock().insert(record.id, record.clone());
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        Ok(self
            .lock()
            .get(session_id)
            .filter(|record| record.expiry_date > OffsetDateTime::now_utc())
            .cloned())
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.lock().remove(session_id);
        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for JsonSessionStore {
    async fn delete_expired(&self) -> session_store::Result<()> {
        let now = OffsetDateTime::now_utc();
        self.lock().retain(|_, record| record.expiry_date > now);
        Ok(())
    }
}

/// Handle to the periodic flush task.
///
/// Stopping aborts the timer and performs one final flush so shutdown never
/// loses the last interval's writes.
#[derive(Debug)]
pub struct SessionFlushTask {
    handle: tokio::task::JoinHandle<()>,
    store: JsonSessionStore,
}

impl SessionFlushTask {
    /// Stop the flush task and write the session file one last time.
    pub async fn stop(self) {
        self.handle.abort();
        let _ = self.handle.await;
        if let Err(e) = self.store.flush_now().await {
            tracing::error!(error = %e, "final session flush failed");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_sessions::cookie::time;

    use super::*;

    fn fresh_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gift-grove-sessions-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn record_expiring_in(minutes: i64) -> Record {
        let mut data = HashMap::default();
        data.insert(
            "current_user".to_owned(),
            serde_json::json!({"id": 1, "username": "casey", "is_admin": false}),
        );
        Record {
            id: Id::default(),
            data,
            expiry_date: OffsetDateTime::now_utc() + time::Duration::minutes(minutes),
        }
    }

    #[tokio::test]
    async fn test_create_save_load_delete() {
        let store = JsonSessionStore::open(&fresh_dir()).unwrap();
        let mut record = record_expiring_in(30);

        store.create(&mut record).await.unwrap();
        let loaded = store.load(&record.id).await.unwrap().unwrap();
        assert_eq!(loaded, record);

        store.delete(&record.id).await.unwrap();
        assert!(store.load(&record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_records_do_not_load() {
        let store = JsonSessionStore::open(&fresh_dir()).unwrap();
        let mut record = record_expiring_in(-5);

        store.create(&mut record).await.unwrap();
        assert!(store.load(&record.id).await.unwrap().is_none());

        store.delete_expired().await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_flush_and_reopen_restores_sessions() {
        let dir = fresh_dir();

        let store = JsonSessionStore::open(&dir).unwrap();
        let mut record = record_expiring_in(30);
        store.create(&mut record).await.unwrap();
        store.flush_now().await.unwrap();

        let reopened = JsonSessionStore::open(&dir).unwrap();
        let loaded = reopened.load(&record.id).await.unwrap().unwrap();
        assert_eq!(loaded, record);
    }

    #[tokio::test]
    async fn test_stop_performs_final_flush() {
        let dir = fresh_dir();

        let store = JsonSessionStore::open(&dir).unwrap();
        // Long interval: the timer never fires during this test, so any
        // persisted state must come from the shutdown flush.
        let task = store.spawn_flush_task(Duration::from_secs(3600));

        let mut record = record_expiring_in(30);
        store.create(&mut record).await.unwrap();
        task.stop().await;

        let reopened = JsonSessionStore::open(&dir).unwrap();
        assert_eq!(reopened.len(), 1);
    }
}
