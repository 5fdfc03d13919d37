/// In-process session store
///
/// Sessions are lost on restart and are not shared between instances, so
/// this backend is only meant for development and tests.

use super::{SessionRecord, SessionStore, SessionStoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug)]
struct Entry {
    record: SessionRecord,
    expires_at: Instant,
}

/// `HashMap`-backed [`SessionStore`]
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops expired entries and returns how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    /// Number of stored entries, expired or not
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert(
        &self,
        session_id: &str,
        record: &SessionRecord,
        ttl: Duration,
    ) -> Result<(), SessionStoreError> {
        let entry = Entry {
            record: record.clone(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().await.insert(session_id.to_string(), entry);
        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, SessionStoreError> {
        {
            let entries = self.entries.read().await;
            match entries.get(session_id) {
                None => return Ok(None),
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Ok(Some(entry.record.clone()))
                }
                Some(_) => {}
            }
        }

        self.entries.write().await.remove(session_id);
        Ok(None)
    }

    async fn remove(&self, session_id: &str) -> Result<(), SessionStoreError> {
        self.entries.write().await.remove(session_id);
        Ok(())
    }

    async fn ping(&self) -> Result<bool, SessionStoreError> {
        Ok(true)
    }
}
