pub mod memory;
pub mod sqlite;

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lexicon::{Word, WordKey};
use crate::memory::MemoryRecord;

pub use memory::InMemoryRecordStore;
pub use sqlite::SqliteRecordStore;

pub type UserId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedWord {
    pub word: Word,
    pub record: MemoryRecord,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("corrupt stored word: {0}")]
    Serde(#[from] serde_json::Error),
}

/// One memory record per (user, word).
///
/// `get_all` yields records in a stable order; `upsert` on an existing key
/// replaces the record without moving it.
pub trait RecordStore: Send + Sync {
    fn upsert(
        &self,
        user: UserId,
        word: &Word,
        record: &MemoryRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn get_all(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<Vec<TrackedWord>, StoreError>> + Send;

    fn get(
        &self,
        user: UserId,
        key: &WordKey,
    ) -> impl Future<Output = Result<Option<TrackedWord>, StoreError>> + Send;

    fn exists(
        &self,
        user: UserId,
        key: &WordKey,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    fn delete(
        &self,
        user: UserId,
        key: &WordKey,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    Memory,
    Sqlite,
}

impl StoreMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "memory" => Some(Self::Memory),
            "sqlite" => Some(Self::Sqlite),
            _ => None,
        }
    }
}

/// Store selected at startup.
#[derive(Debug, Clone)]
pub enum RecordBackend {
    Memory(InMemoryRecordStore),
    Sqlite(SqliteRecordStore),
}

impl RecordStore for RecordBackend {
    async fn upsert(
        &self,
        user: UserId,
        word: &Word,
        record: &MemoryRecord,
    ) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.upsert(user, word, record).await,
            Self::Sqlite(store) => store.upsert(user, word, record).await,
        }
    }

    async fn get_all(&self, user: UserId) -> Result<Vec<TrackedWord>, StoreError> {
        match self {
            Self::Memory(store) => store.get_all(user).await,
            Self::Sqlite(store) => store.get_all(user).await,
        }
    }

    async fn get(&self, user: UserId, key: &WordKey) -> Result<Option<TrackedWord>, StoreError> {
        match self {
            Self::Memory(store) => store.get(user, key).await,
            Self::Sqlite(store) => store.get(user, key).await,
        }
    }

    async fn exists(&self, user: UserId, key: &WordKey) -> Result<bool, StoreError> {
        match self {
            Self::Memory(store) => store.exists(user, key).await,
            Self::Sqlite(store) => store.exists(user, key).await,
        }
    }

    async fn delete(&self, user: UserId, key: &WordKey) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.delete(user, key).await,
            Self::Sqlite(store) => store.delete(user, key).await,
        }
    }
}
