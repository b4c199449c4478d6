use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::lexicon::{Fact, Word};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SequenceError {
    #[error("previous fact has not been graded")]
    AnswerPending,
    #[error("fact sequence already finished")]
    SequenceExhausted,
    #[error("no fact is awaiting a grade")]
    NoFactPending,
}

/// Weighted grade of one quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionScore {
    pub correct_weight: f64,
    pub total_weight: f64,
}

impl SessionScore {
    pub fn ratio(&self) -> Option<f64> {
        (self.total_weight > 0.0).then(|| self.correct_weight / self.total_weight)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SequenceStep {
    Fact(Fact),
    Complete(SessionScore),
}

/// One quiz attempt over a word's facts.
#[derive(Debug, Clone)]
pub struct FactSequence {
    word: Word,
    facts: Vec<Fact>,
    cursor: usize,
    score: SessionScore,
    pending: Option<Fact>,
    graded: usize,
    finished: bool,
}

impl FactSequence {
    pub fn new(word: Word) -> Self {
        let facts = word.facts();
        Self {
            word,
            facts,
            cursor: 0,
            score: SessionScore::default(),
            pending: None,
            graded: 0,
            finished: false,
        }
    }

    pub fn word(&self) -> &Word {
        &self.word
    }

    pub fn score(&self) -> SessionScore {
        self.score
    }

    pub fn pending_fact(&self) -> Option<&Fact> {
        self.pending.as_ref()
    }

    pub fn graded_count(&self) -> usize {
        self.graded
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn next(&mut self) -> Result<SequenceStep, SequenceError> {
        self.next_with(&mut rand::rng())
    }

    /// Draws forward until a fact passes its ask probability or the list runs out.
    pub fn next_with<R: Rng>(&mut self, rng: &mut R) -> Result<SequenceStep, SequenceError> {
        if self.pending.is_some() {
            return Err(SequenceError::AnswerPending);
        }
        if self.finished {
            return Err(SequenceError::SequenceExhausted);
        }

        while let Some(candidate) = self.facts.get(self.cursor) {
            self.cursor += 1;
            if rng.random::<f64>() < candidate.ask_probability {
                let fact = candidate.clone();
                self.pending = Some(fact.clone());
                return Ok(SequenceStep::Fact(fact));
            }
        }

        self.finished = true;
        Ok(SequenceStep::Complete(self.score))
    }

    pub fn set_answer(&mut self, is_correct: bool) -> Result<(), SequenceError> {
        let fact = self.pending.take().ok_or(SequenceError::NoFactPending)?;
        self.score.total_weight += fact.weight;
        if is_correct {
            self.score.correct_weight += fact.weight;
        }
        self.graded += 1;
        Ok(())
    }
}
