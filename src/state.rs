use std::sync::Arc;
use std::time::Instant;

use crate::config::{Config, ConfigError};
use crate::conversation::Conversation;
use crate::db::sqlite::default_sqlite_path;
use crate::db::{InMemoryRecordStore, RecordBackend, SqliteRecordStore, StoreMode};
use crate::lexicon::{DictionaryCatalog, WordCatalog};

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    conversation: Arc<Conversation<RecordBackend>>,
}

impl AppState {
    pub fn new(conversation: Conversation<RecordBackend>) -> Self {
        Self {
            started_at: Instant::now(),
            conversation: Arc::new(conversation),
        }
    }

    pub async fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let catalog: Arc<dyn WordCatalog> = Arc::new(DictionaryCatalog::load(&config.dictionary_path)?);
        let store = Self::open_store(config).await?;
        let conversation =
            Conversation::new(store, catalog).with_default_half_life(config.default_half_life());
        Ok(Self::new(conversation))
    }

    async fn open_store(config: &Config) -> Result<RecordBackend, ConfigError> {
        let backend = match config.record_store {
            StoreMode::Memory => {
                tracing::warn!("using in-memory record store, progress is lost on restart");
                RecordBackend::Memory(InMemoryRecordStore::new())
            }
            StoreMode::Sqlite => match config.database_url.as_deref() {
                Some(url) => RecordBackend::Sqlite(SqliteRecordStore::connect(url).await?),
                None => RecordBackend::Sqlite(SqliteRecordStore::open(&default_sqlite_path()).await?),
            },
        };
        Ok(backend)
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn conversation(&self) -> Arc<Conversation<RecordBackend>> {
        Arc::clone(&self.conversation)
    }
}
