use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{RecordStore, StoreError, TrackedWord, UserId};
use crate::lexicon::{Word, WordKey};
use crate::memory::MemoryRecord;

/// Process-local store; records per user are kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    users: Arc<RwLock<HashMap<UserId, Vec<TrackedWord>>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for InMemoryRecordStore {
    async fn upsert(
        &self,
        user: UserId,
        word: &Word,
        record: &MemoryRecord,
    ) -> Result<(), StoreError> {
        let mut users = self.users.write();
        let rows = users.entry(user).or_default();
        let key = word.key();
        match rows.iter_mut().find(|row| row.word.key() == key) {
            Some(row) => {
                row.word = word.clone();
                row.record = *record;
            }
            None => rows.push(TrackedWord {
                word: word.clone(),
                record: *record,
            }),
        }
        Ok(())
    }

    async fn get_all(&self, user: UserId) -> Result<Vec<TrackedWord>, StoreError> {
        Ok(self.users.read().get(&user).cloned().unwrap_or_default())
    }

    async fn get(&self, user: UserId, key: &WordKey) -> Result<Option<TrackedWord>, StoreError> {
        let users = self.users.read();
        Ok(users
            .get(&user)
            .and_then(|rows| rows.iter().find(|row| row.word.key() == *key))
            .cloned())
    }

    async fn exists(&self, user: UserId, key: &WordKey) -> Result<bool, StoreError> {
        Ok(self.get(user, key).await?.is_some())
    }

    async fn delete(&self, user: UserId, key: &WordKey) -> Result<(), StoreError> {
        if let Some(rows) = self.users.write().get_mut(&user) {
            rows.retain(|row| row.word.key() != *key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::lexicon::fixtures::{haus, laufen};
    use crate::memory::default_model;

    fn record() -> MemoryRecord {
        MemoryRecord::new(default_model(Duration::hours(24)), Utc::now())
    }

    #[tokio::test]
    async fn test_upsert_replaces_in_place() {
        let store = InMemoryRecordStore::new();
        store.upsert(1, &haus(), &record()).await.unwrap();
        store.upsert(1, &laufen(), &record()).await.unwrap();

        let mut replaced = record();
        replaced.model.alpha = 7.0;
        store.upsert(1, &haus(), &replaced).await.unwrap();

        let rows = store.get_all(1).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].word.lemma(), "Haus");
        assert_eq!(rows[0].record.model.alpha, 7.0);
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let store = InMemoryRecordStore::new();
        store.upsert(1, &haus(), &record()).await.unwrap();
        assert!(store.exists(1, &haus().key()).await.unwrap());
        assert!(!store.exists(2, &haus().key()).await.unwrap());
        assert!(store.get_all(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryRecordStore::new();
        store.upsert(1, &haus(), &record()).await.unwrap();
        store.delete(1, &haus().key()).await.unwrap();
        assert!(store.get(1, &haus().key()).await.unwrap().is_none());
    }
}
