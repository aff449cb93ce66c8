//! Attempt history.
//!
//! [`History`] is the capped, most-recent-first list of finalized sessions.
//! [`HistoryStore`] keeps it in sync with a [`Storage`] backend: it reads
//! once on load, rewrites on every record, and removes the key on clear.
//! Storage problems never reach the user; corrupt data reads as an empty
//! history and failed writes are logged.

use crate::model::QuizSession;
use crate::storage::Storage;

/// Capped list of finalized sessions, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: Vec<QuizSession>,
    cap: usize,
}

fn default_cap() -> usize {
    50
}

impl Default for History {
    fn default() -> Self {
        Self::with_cap(default_cap())
    }
}

impl History {
    pub fn with_cap(cap: usize) -> Self {
        Self {
            entries: Vec::new(),
            cap: cap.max(1),
        }
    }

    /// Build from stored entries, trimming anything past the cap.
    pub fn from_entries(mut entries: Vec<QuizSession>, cap: usize) -> Self {
        let cap = cap.max(1);
        entries.truncate(cap);
        Self { entries, cap }
    }

    /// Add a session at the front, evicting the oldest entries past the cap.
    pub fn push(&mut self, session: QuizSession) {
        self.entries.insert(0, session);
        self.entries.truncate(self.cap);
    }

    pub fn entries(&self) -> &[QuizSession] {
        &self.entries
    }

    /// The `index`-th most recent session.
    pub fn get(&self, index: usize) -> Option<&QuizSession> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// History bound to a storage backend under a fixed key.
#[derive(Debug)]
pub struct HistoryStore<S: Storage> {
    storage: S,
    key: String,
    history: History,
}

impl<S: Storage> HistoryStore<S> {
    /// Read the persisted history once.
    ///
    /// Missing, unreadable, or malformed data all yield an empty history.
    pub fn load(storage: S, key: impl Into<String>, cap: usize) -> Self {
        let key = key.into();
        let history = match storage.get(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<QuizSession>>(&raw) {
                Ok(entries) => History::from_entries(entries, cap),
                Err(e) => {
                    tracing::warn!("ignoring corrupt history under '{}': {}", key, e);
                    History::with_cap(cap)
                }
            },
            Ok(None) => History::with_cap(cap),
            Err(e) => {
                tracing::warn!("could not read history under '{}': {}", key, e);
                History::with_cap(cap)
            }
        };

        Self {
            storage,
            key,
            history,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Prepend a finalized session and persist the whole list.
    pub fn record(&mut self, session: QuizSession) {
        self.history.push(session);
        self.persist();
    }

    /// Drop every entry and remove the stored value.
    pub fn clear(&mut self) {
        self.history.clear();
        if let Err(e) = self.storage.remove(&self.key) {
            tracing::warn!("could not remove history under '{}': {}", self.key, e);
        }
    }

    fn persist(&mut self) {
        let json = match serde_json::to_string(self.history.entries()) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("could not serialize history: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set(&self.key, &json) {
            tracing::warn!("could not save history under '{}': {}", self.key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::model::SessionStatus;
    use crate::storage::MemoryStorage;

    const KEY: &str = "mcq_quiz_history_v4";

    fn session(n: usize) -> QuizSession {
        QuizSession {
            id: format!("session-{n}"),
            date: "2026-01-01 00:00:00".into(),
            questions: vec![],
            user_answers: vec![],
            score: n as u32,
            total_questions: 0,
            status: SessionStatus::Failed,
            time_spent: Some(1),
        }
    }

    #[test]
    fn push_is_most_recent_first() {
        let mut history = History::default();
        history.push(session(1));
        history.push(session(2));
        assert_eq!(history.get(0).unwrap().id, "session-2");
        assert_eq!(history.get(1).unwrap().id, "session-1");
    }

    #[test]
    fn fifty_first_entry_evicts_oldest() {
        let mut history = History::default();
        for n in 1..=50 {
            history.push(session(n));
        }
        assert_eq!(history.len(), 50);

        history.push(session(51));
        assert_eq!(history.len(), 50);
        assert_eq!(history.entries()[0].id, "session-51");
        assert_eq!(history.entries()[49].id, "session-2");
        assert!(history.entries().iter().all(|s| s.id != "session-1"));
    }

    #[test]
    fn store_round_trips_through_storage() {
        let mut store = HistoryStore::load(MemoryStorage::new(), KEY, 50);
        assert!(store.history().is_empty());
        store.record(session(1));
        store.record(session(2));

        let reloaded = HistoryStore::load(store.storage().clone(), KEY, 50);
        assert_eq!(reloaded.history().len(), 2);
        assert_eq!(reloaded.history().get(0).unwrap().id, "session-2");
    }

    #[test]
    fn corrupt_storage_reads_as_empty() {
        let store = HistoryStore::load(MemoryStorage::with_value(KEY, "{not json"), KEY, 50);
        assert!(store.history().is_empty());

        let store = HistoryStore::load(MemoryStorage::with_value(KEY, r#"{"a":1}"#), KEY, 50);
        assert!(store.history().is_empty());
    }

    #[test]
    fn load_trims_to_cap() {
        let entries: Vec<QuizSession> = (1..=10).map(session).collect();
        let raw = serde_json::to_string(&entries).unwrap();
        let store = HistoryStore::load(MemoryStorage::with_value(KEY, &raw), KEY, 3);
        assert_eq!(store.history().len(), 3);
        assert_eq!(store.history().get(0).unwrap().id, "session-1");
    }

    #[test]
    fn clear_removes_key() {
        let mut store = HistoryStore::load(MemoryStorage::new(), KEY, 50);
        store.record(session(1));
        store.clear();
        assert!(store.history().is_empty());
        assert_eq!(store.storage().get(KEY).unwrap(), None);
    }

    struct FailingStorage;

    impl Storage for FailingStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::InvalidKey(key.into()))
        }
        fn set(&mut self, key: &str, _: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.into()))
        }
        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.into()))
        }
    }

    #[test]
    fn failing_storage_degrades_to_memory() {
        let mut store = HistoryStore::load(FailingStorage, KEY, 50);
        assert!(store.history().is_empty());
        store.record(session(1));
        assert_eq!(store.history().len(), 1);
        store.clear();
        assert!(store.history().is_empty());
    }
}
