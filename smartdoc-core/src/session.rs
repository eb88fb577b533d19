//! Bounded in-memory session store.
//!
//! Sessions are kept in a map guarded by a single `RwLock`, alongside an
//! index of creation order used for eviction. Each session's history sits
//! behind its own `Mutex` so appends on different sessions only ever share
//! the map read lock.
//!
//! Eviction is strictly FIFO by creation time and only runs inside
//! [`SessionStore::create`]. Reads and appends never reorder or refresh a
//! session.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::types::{DocType, DocumentSession, Exchange};

/// Default capacity of the store.
pub const DEFAULT_MAX_SESSIONS: usize = 100;

struct StoredSession {
    id: String,
    filename: String,
    doc_type: DocType,
    content: String,
    created_at: DateTime<Utc>,
    history: Mutex<Vec<Exchange>>,
}

impl StoredSession {
    fn snapshot(&self) -> DocumentSession {
        DocumentSession {
            id: self.id.clone(),
            filename: self.filename.clone(),
            doc_type: self.doc_type,
            content: self.content.clone(),
            history: self.history.lock().clone(),
            created_at: self.created_at,
        }
    }
}

#[derive(Default)]
struct Inner {
    sessions: HashMap<String, Arc<StoredSession>>,
    /// Creation sequence -> session id, oldest first
    order: BTreeMap<u64, String>,
    /// Creation sequence of each live session, for removal from `order`
    seq_of: HashMap<String, u64>,
    next_seq: u64,
}

impl Inner {
    fn remove(&mut self, id: &str) -> bool {
        match self.sessions.remove(id) {
            Some(_) => {
                if let Some(seq) = self.seq_of.remove(id) {
                    self.order.remove(&seq);
                }
                true
            }
            None => false,
        }
    }

    fn evict_oldest(&mut self) -> Option<String> {
        let (_, id) = self.order.pop_first()?;
        self.seq_of.remove(&id);
        self.sessions.remove(&id);
        Some(id)
    }
}

/// Registry of document sessions with a hard capacity bound.
pub struct SessionStore {
    inner: RwLock<Inner>,
    max_sessions: usize,
}

impl SessionStore {
    /// Create a store holding at most `max_sessions` sessions (minimum 1).
    pub fn new(max_sessions: usize) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            max_sessions: max_sessions.max(1),
        }
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Insert a new session and return its id.
    ///
    /// If the store is over capacity afterwards, the oldest sessions are
    /// evicted before this returns.
    pub fn create(&self, filename: &str, doc_type: DocType, content: String) -> String {
        let id = Uuid::new_v4().to_string();
        let session = Arc::new(StoredSession {
            id: id.clone(),
            filename: filename.to_string(),
            doc_type,
            content,
            created_at: Utc::now(),
            history: Mutex::new(Vec::new()),
        });

        let mut inner = self.inner.write();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.sessions.insert(id.clone(), session);
        inner.order.insert(seq, id.clone());
        inner.seq_of.insert(id.clone(), seq);

        while inner.sessions.len() > self.max_sessions {
            match inner.evict_oldest() {
                Some(evicted) => {
                    debug!("Evicted session {} (capacity {})", evicted, self.max_sessions)
                }
                None => break,
            }
        }

        id
    }

    /// Look up a session. Returns a consistent snapshot of its state.
    pub fn get(&self, id: &str) -> Option<DocumentSession> {
        let inner = self.inner.read();
        inner.sessions.get(id).map(|s| s.snapshot())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().sessions.contains_key(id)
    }

    /// Append one exchange to a session's history.
    pub fn append_history(&self, id: &str, question: &str, answer: &str) -> Result<()> {
        // Map read lock is held for the whole append so eviction cannot
        // interleave with it.
        let inner = self.inner.read();
        let session = inner
            .sessions
            .get(id)
            .ok_or_else(|| CoreError::SessionNotFound(id.to_string()))?;

        session.history.lock().push(Exchange {
            question: question.to_string(),
            answer: answer.to_string(),
        });
        Ok(())
    }

    /// The last `n` exchanges of a session, oldest first.
    pub fn recent_history(&self, id: &str, n: usize) -> Result<Vec<Exchange>> {
        let inner = self.inner.read();
        let session = inner
            .sessions
            .get(id)
            .ok_or_else(|| CoreError::SessionNotFound(id.to_string()))?;

        let history = session.history.lock();
        let start = history.len().saturating_sub(n);
        Ok(history[start..].to_vec())
    }

    /// Remove a session. Returns whether it existed.
    pub fn delete(&self, id: &str) -> bool {
        self.inner.write().remove(id)
    }

    /// Number of live sessions.
    pub fn count(&self) -> usize {
        self.inner.read().sessions.len()
    }

    /// Ids of live sessions, oldest first.
    pub fn ids(&self) -> Vec<String> {
        self.inner.read().order.values().cloned().collect()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SESSIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(n: usize, capacity: usize) -> (SessionStore, Vec<String>) {
        let store = SessionStore::new(capacity);
        let ids = (0..n)
            .map(|i| store.create(&format!("doc{}.pdf", i), DocType::Pdf, format!("content {}", i)))
            .collect();
        (store, ids)
    }

    #[test]
    fn test_create_and_get() {
        let store = SessionStore::default();
        let id = store.create("report.pdf", DocType::Pdf, "hello".to_string());

        let session = store.get(&id).expect("session should exist");
        assert_eq!(session.id, id);
        assert_eq!(session.filename, "report.pdf");
        assert_eq!(session.doc_type, DocType::Pdf);
        assert_eq!(session.content, "hello");
        assert!(session.history.is_empty());
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_ids_are_unique() {
        let (_, ids) = store_with(50, 100);
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_eviction_keeps_most_recent() {
        let (store, ids) = store_with(130, 100);

        assert_eq!(store.count(), 100);
        for evicted in &ids[..30] {
            assert!(store.get(evicted).is_none());
        }
        for kept in &ids[30..] {
            assert!(store.get(kept).is_some());
        }
        assert_eq!(store.ids(), ids[30..].to_vec());
    }

    #[test]
    fn test_eviction_ignores_access() {
        let (store, ids) = store_with(3, 3);

        // Touching the oldest session does not protect it
        store.get(&ids[0]);
        store.append_history(&ids[0], "q", "a").unwrap();

        let newest = store.create("new.pdf", DocType::Pdf, String::new());
        assert!(store.get(&ids[0]).is_none());
        assert!(store.get(&ids[1]).is_some());
        assert!(store.get(&newest).is_some());
    }

    #[test]
    fn test_append_history_in_order() {
        let store = SessionStore::default();
        let id = store.create("a.xlsx", DocType::Spreadsheet, String::new());

        for i in 0..5 {
            store
                .append_history(&id, &format!("q{}", i), &format!("a{}", i))
                .unwrap();
        }

        let history = store.get(&id).unwrap().history;
        let questions: Vec<_> = history.iter().map(|e| e.question.as_str()).collect();
        assert_eq!(questions, vec!["q0", "q1", "q2", "q3", "q4"]);

        let recent = store.recent_history(&id, 3).unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].question, "q2");
    }

    #[test]
    fn test_append_to_missing_session() {
        let store = SessionStore::default();
        let err = store.append_history("nope", "q", "a").unwrap_err();
        assert!(matches!(err, CoreError::SessionNotFound(id) if id == "nope"));
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = SessionStore::default();
        let id = store.create("a.pdf", DocType::Pdf, String::new());

        assert!(store.delete(&id));
        assert!(!store.delete(&id));
        assert!(store.get(&id).is_none());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_delete_frees_capacity_without_disturbing_order() {
        let (store, ids) = store_with(3, 3);
        assert!(store.delete(&ids[1]));

        let fourth = store.create("d.pdf", DocType::Pdf, String::new());
        // Room was available, nothing evicted
        assert_eq!(store.count(), 3);
        assert!(store.contains(&ids[0]));

        let fifth = store.create("e.pdf", DocType::Pdf, String::new());
        assert!(!store.contains(&ids[0]));
        assert_eq!(store.ids(), vec![ids[2].clone(), fourth, fifth]);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let store = SessionStore::new(0);
        let id = store.create("a.pdf", DocType::Pdf, String::new());
        assert_eq!(store.max_sessions(), 1);
        assert!(store.contains(&id));
    }
}
