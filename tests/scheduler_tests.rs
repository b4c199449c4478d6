use chrono::{Duration, Utc};
use tempfile::TempDir;

use wort_quiz::db::{RecordStore, SqliteRecordStore};
use wort_quiz::memory::{default_model, half_life, MemoryRecord};
use wort_quiz::services::{Scheduler, SchedulerError};

mod common;

use common::{haus, laufen};

async fn open_store(dir: &TempDir) -> SqliteRecordStore {
    SqliteRecordStore::open(&dir.path().join("nested").join("quiz.db"))
        .await
        .expect("sqlite store opens")
}

#[tokio::test]
async fn test_sqlite_add_word_and_duplicate() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let scheduler = Scheduler::new(&store, 1);

    scheduler.add_word(&laufen()).await.unwrap();
    assert!(scheduler.is_tracked(&laufen()).await.unwrap());
    assert!(matches!(
        scheduler.add_word(&laufen()).await,
        Err(SchedulerError::DuplicateWord(_))
    ));

    let rows = store.get_all(1).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].word, laufen());
    let drift = half_life(&rows[0].record.model) - Duration::hours(24);
    assert!(drift.num_milliseconds().abs() < 1_000);
}

#[tokio::test]
async fn test_sqlite_empty_quiz() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let scheduler = Scheduler::new(&store, 1);
    assert!(matches!(
        scheduler.lowest_recall_word().await,
        Err(SchedulerError::EmptyQuiz)
    ));
}

#[tokio::test]
async fn test_sqlite_upsert_keeps_insertion_order() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let now = Utc::now();
    let record = MemoryRecord::new(default_model(Duration::hours(24)), now);

    store.upsert(1, &haus(), &record).await.unwrap();
    store.upsert(1, &laufen(), &record).await.unwrap();

    let mut replaced = record;
    replaced.model.beta = 4.5;
    store.upsert(1, &haus(), &replaced).await.unwrap();

    let rows = store.get_all(1).await.unwrap();
    let lemmas: Vec<_> = rows.iter().map(|row| row.word.lemma()).collect();
    assert_eq!(lemmas, vec!["Haus", "laufen"]);
    assert_eq!(rows[0].record.model.beta, 4.5);
    assert_eq!(rows[0].word, haus());
}

#[tokio::test]
async fn test_sqlite_lowest_recall_word() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let now = Utc::now();
    let model = default_model(Duration::hours(24));

    store
        .upsert(1, &laufen(), &MemoryRecord::new(model, now - Duration::hours(2)))
        .await
        .unwrap();
    store
        .upsert(1, &haus(), &MemoryRecord::new(model, now - Duration::hours(50)))
        .await
        .unwrap();

    let scheduler = Scheduler::new(&store, 1);
    assert_eq!(scheduler.lowest_recall_word().await.unwrap(), haus());
    assert!(Scheduler::new(&store, 2).lowest_recall_word().await.is_err());
}

#[tokio::test]
async fn test_sqlite_record_result_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let updated = {
        let store = open_store(&dir).await;
        let scheduler = Scheduler::new(&store, 7).with_default_half_life(Duration::hours(6));
        scheduler.add_word(&haus()).await.unwrap();
        let updated = scheduler.record_result(&haus(), 15.0, 18.0).await.unwrap();
        store.pool().close().await;
        updated
    };

    let store = open_store(&dir).await;
    let tracked = store.get(7, &haus().key()).await.unwrap().unwrap();
    assert_eq!(tracked.record.model, updated.model);
    assert_eq!(
        tracked.record.last_reviewed_at.timestamp_millis(),
        updated.last_reviewed_at.timestamp_millis()
    );
}

#[tokio::test]
async fn test_sqlite_delete() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir).await;
    let scheduler = Scheduler::new(&store, 1);
    scheduler.add_word(&haus()).await.unwrap();

    store.delete(1, &haus().key()).await.unwrap();
    assert!(!store.exists(1, &haus().key()).await.unwrap());
    assert!(matches!(
        scheduler.record_result(&haus(), 1.0, 1.0).await,
        Err(SchedulerError::WordNotTracked(_))
    ));
}
