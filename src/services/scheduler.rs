use chrono::{DateTime, Duration, Utc};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use thiserror::Error;

use crate::db::{RecordStore, StoreError, TrackedWord, UserId};
use crate::lexicon::Word;
use crate::memory::{default_model, MemoryRecord, RecallError};

pub const DEFAULT_HALF_LIFE_HOURS: i64 = 24;
const MIN_SAMPLING_WEIGHT: f64 = 1e-9;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("{0} is already in the quiz")]
    DuplicateWord(String),
    #[error("quiz is empty")]
    EmptyQuiz,
    #[error("{0} is not in the quiz")]
    WordNotTracked(String),
    #[error(transparent)]
    Recall(#[from] RecallError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Review scheduling for one user.
pub struct Scheduler<'a, S> {
    store: &'a S,
    user: UserId,
    default_half_life: Duration,
}

impl<'a, S: RecordStore> Scheduler<'a, S> {
    pub fn new(store: &'a S, user: UserId) -> Self {
        Self {
            store,
            user,
            default_half_life: Duration::hours(DEFAULT_HALF_LIFE_HOURS),
        }
    }

    pub fn with_default_half_life(mut self, half_life: Duration) -> Self {
        self.default_half_life = half_life;
        self
    }

    pub fn user(&self) -> UserId {
        self.user
    }

    pub async fn is_tracked(&self, word: &Word) -> Result<bool, SchedulerError> {
        Ok(self.store.exists(self.user, &word.key()).await?)
    }

    pub async fn add_word(&self, word: &Word) -> Result<(), SchedulerError> {
        if self.store.exists(self.user, &word.key()).await? {
            return Err(SchedulerError::DuplicateWord(word.to_string()));
        }

        let record = MemoryRecord::new(default_model(self.default_half_life), Utc::now());
        self.store.upsert(self.user, word, &record).await?;
        tracing::info!(user_id = self.user, word = %word, "word added to quiz");
        Ok(())
    }

    /// The tracked word least likely to be recalled right now.
    pub async fn lowest_recall_word(&self) -> Result<Word, SchedulerError> {
        let rows = self.store.get_all(self.user).await?;
        lowest_recall(rows, Utc::now()).ok_or(SchedulerError::EmptyQuiz)
    }

    /// Samples a word with weight `(1 - recall)^2`, favouring likely-forgotten words.
    pub async fn weighted_random_word(&self) -> Result<Word, SchedulerError> {
        let rows = self.store.get_all(self.user).await?;
        let picked = weighted_pick(rows, Utc::now(), &mut rand::rng());
        picked.ok_or(SchedulerError::EmptyQuiz)
    }

    pub async fn record_result(
        &self,
        word: &Word,
        success: f64,
        total: f64,
    ) -> Result<MemoryRecord, SchedulerError> {
        let tracked = self
            .store
            .get(self.user, &word.key())
            .await?
            .ok_or_else(|| SchedulerError::WordNotTracked(word.to_string()))?;

        let record = tracked.record.reviewed(success, total, Utc::now())?;
        self.store.upsert(self.user, &tracked.word, &record).await?;
        tracing::debug!(
            user_id = self.user,
            word = %word,
            success,
            total,
            alpha = record.model.alpha,
            beta = record.model.beta,
            t0 = record.model.t0,
            "recall model updated"
        );
        Ok(record)
    }
}

fn lowest_recall(rows: Vec<TrackedWord>, now: DateTime<Utc>) -> Option<Word> {
    let mut best: Option<(f64, Word)> = None;
    for row in rows {
        let recall = row.record.predict_recall(now, true);
        // strict comparison keeps the earliest row on ties
        if best.as_ref().map_or(true, |(lowest, _)| recall < *lowest) {
            best = Some((recall, row.word));
        }
    }
    best.map(|(_, word)| word)
}

fn weighted_pick<R: Rng>(rows: Vec<TrackedWord>, now: DateTime<Utc>, rng: &mut R) -> Option<Word> {
    if rows.is_empty() {
        return None;
    }

    let weights: Vec<f64> = rows
        .iter()
        .map(|row| {
            let forgotten = 1.0 - row.record.predict_recall(now, false);
            (forgotten * forgotten).max(MIN_SAMPLING_WEIGHT)
        })
        .collect();

    let index = match WeightedIndex::new(&weights) {
        Ok(dist) => dist.sample(rng),
        Err(_) => rng.random_range(0..rows.len()),
    };

    rows.into_iter().nth(index).map(|row| row.word)
}
