use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use super::{RecordStore, StoreError, TrackedWord, UserId};
use crate::lexicon::{Word, WordKey};
use crate::memory::{MemoryModel, MemoryRecord};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS "quiz_records" (
    "id" INTEGER PRIMARY KEY AUTOINCREMENT,
    "user_id" INTEGER NOT NULL,
    "lemma" TEXT NOT NULL,
    "part_of_speech" TEXT NOT NULL,
    "word_json" TEXT NOT NULL,
    "alpha" REAL NOT NULL,
    "beta" REAL NOT NULL,
    "t0" REAL NOT NULL,
    "last_reviewed_at" INTEGER NOT NULL,
    UNIQUE ("user_id", "lemma", "part_of_speech")
)
"#;

pub fn default_sqlite_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wort-quiz")
        .join("quiz.db")
}

#[derive(Debug, Clone)]
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Sqlx(sqlx::Error::Io(e)))?;
        }
        Self::connect(&format!("sqlite:{}?mode=rwc", path.display())).await
    }

    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        sqlx::query(SCHEMA_SQL).execute(&pool).await?;
        tracing::info!(url, "sqlite record store ready");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn row_to_tracked(row: &SqliteRow) -> Result<TrackedWord, StoreError> {
    let word_json: String = row.try_get("word_json")?;
    let word: Word = serde_json::from_str(&word_json)?;
    let reviewed_ms: i64 = row.try_get("last_reviewed_at")?;
    let last_reviewed_at = DateTime::<Utc>::from_timestamp_millis(reviewed_ms).unwrap_or_default();

    let model = MemoryModel {
        alpha: row.try_get("alpha")?,
        beta: row.try_get("beta")?,
        t0: row.try_get("t0")?,
    };

    Ok(TrackedWord {
        word,
        record: MemoryRecord::new(model, last_reviewed_at),
    })
}

impl RecordStore for SqliteRecordStore {
    async fn upsert(
        &self,
        user: UserId,
        word: &Word,
        record: &MemoryRecord,
    ) -> Result<(), StoreError> {
        let word_json = serde_json::to_string(word)?;
        sqlx::query(
            r#"
            INSERT INTO "quiz_records"
                ("user_id", "lemma", "part_of_speech", "word_json", "alpha", "beta", "t0", "last_reviewed_at")
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT ("user_id", "lemma", "part_of_speech") DO UPDATE SET
                "word_json" = excluded."word_json",
                "alpha" = excluded."alpha",
                "beta" = excluded."beta",
                "t0" = excluded."t0",
                "last_reviewed_at" = excluded."last_reviewed_at"
            "#,
        )
        .bind(user)
        .bind(word.lemma())
        .bind(word.part_of_speech().as_str())
        .bind(word_json)
        .bind(record.model.alpha)
        .bind(record.model.beta)
        .bind(record.model.t0)
        .bind(record.last_reviewed_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_all(&self, user: UserId) -> Result<Vec<TrackedWord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT "word_json", "alpha", "beta", "t0", "last_reviewed_at"
            FROM "quiz_records"
            WHERE "user_id" = ?
            ORDER BY "id"
            "#,
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_tracked).collect()
    }

    async fn get(&self, user: UserId, key: &WordKey) -> Result<Option<TrackedWord>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT "word_json", "alpha", "beta", "t0", "last_reviewed_at"
            FROM "quiz_records"
            WHERE "user_id" = ? AND "lemma" = ? AND "part_of_speech" = ?
            "#,
        )
        .bind(user)
        .bind(&key.lemma)
        .bind(key.part_of_speech.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_tracked).transpose()
    }

    async fn exists(&self, user: UserId, key: &WordKey) -> Result<bool, StoreError> {
        let found: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT "id" FROM "quiz_records"
            WHERE "user_id" = ? AND "lemma" = ? AND "part_of_speech" = ?
            "#,
        )
        .bind(user)
        .bind(&key.lemma)
        .bind(key.part_of_speech.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(found.is_some())
    }

    async fn delete(&self, user: UserId, key: &WordKey) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            DELETE FROM "quiz_records"
            WHERE "user_id" = ? AND "lemma" = ? AND "part_of_speech" = ?
            "#,
        )
        .bind(user)
        .bind(&key.lemma)
        .bind(key.part_of_speech.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
