#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;

use wort_quiz::conversation::{Conversation, RenderDirective};
use wort_quiz::db::{InMemoryRecordStore, RecordBackend, UserId};
use wort_quiz::lexicon::{DictionaryCatalog, NounDeclension, PartOfSpeech, Word, WordCatalog};
use wort_quiz::state::AppState;

pub const DICTIONARY_JSON: &str = include_str!("../../data/dictionary.json");

pub fn catalog() -> Arc<dyn WordCatalog> {
    Arc::new(DictionaryCatalog::from_json(DICTIONARY_JSON).expect("sample dictionary parses"))
}

pub fn memory_conversation() -> Conversation<InMemoryRecordStore> {
    Conversation::new(InMemoryRecordStore::new(), catalog())
}

pub async fn create_test_app() -> Router {
    let conversation = Conversation::new(RecordBackend::Memory(InMemoryRecordStore::new()), catalog());
    wort_quiz::app(AppState::new(conversation))
}

/// Sends each input in turn and returns the directive for the last one.
pub async fn say_all(
    conversation: &Conversation<InMemoryRecordStore>,
    user: UserId,
    inputs: &[&str],
) -> RenderDirective {
    let mut last = None;
    for input in inputs {
        last = Some(
            conversation
                .advance(user, input)
                .await
                .unwrap_or_else(|e| panic!("turn {input:?} failed: {e}")),
        );
    }
    last.expect("at least one input")
}

pub fn laufen() -> Word {
    Word::basic("laufen", PartOfSpeech::Verb, vec!["run".into(), "walk".into()]).unwrap()
}

pub fn haus() -> Word {
    Word::noun(
        "Haus",
        vec!["house".into(), "home".into()],
        NounDeclension {
            nominative_singular: "das Haus".into(),
            nominative_plural: "die Häuser".into(),
            genitive_singular: "des Hauses".into(),
            genitive_plural: "der Häuser".into(),
            dative_singular: "dem Haus".into(),
            dative_plural: "den Häusern".into(),
            accusative_singular: "das Haus".into(),
            accusative_plural: "die Häuser".into(),
            article: "das".into(),
        },
    )
    .unwrap()
}
