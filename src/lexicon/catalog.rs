use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::{NounDeclension, PartOfSpeech, Word};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("word not found: {lemma}")]
    LexiconMiss { lemma: String },
    #[error("no definition found for {lemma}")]
    DefinitionMiss { lemma: String },
}

#[derive(Debug, Error)]
pub enum DictionaryLoadError {
    #[error("failed to read dictionary {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse dictionary: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Resolves user-entered words into lexical entries.
pub trait WordCatalog: Send + Sync {
    fn resolve(
        &self,
        lemma: &str,
        part_of_speech: Option<&PartOfSpeech>,
    ) -> Result<Word, CatalogError>;

    fn resolve_manual(
        &self,
        lemma: &str,
        part_of_speech: &PartOfSpeech,
        definitions: Vec<String>,
    ) -> Result<Word, CatalogError>;
}

#[derive(Debug, Default, Deserialize)]
struct DictionaryFile {
    #[serde(default)]
    definitions: HashMap<String, HashMap<String, Vec<String>>>,
    #[serde(default)]
    declensions: HashMap<String, NounDeclension>,
    #[serde(default)]
    lexicon: Vec<String>,
}

/// Catalog backed by a parsed bilingual dictionary plus noun declension tables.
///
/// A lemma is "known" when it appears in any of the three sections; knowing a
/// lemma without a translation is what sends the user to manual entry.
#[derive(Debug, Default)]
pub struct DictionaryCatalog {
    definitions: HashMap<String, HashMap<PartOfSpeech, Vec<String>>>,
    declensions: HashMap<String, NounDeclension>,
    lexicon: HashSet<String>,
}

impl DictionaryCatalog {
    pub fn from_json(raw: &str) -> Result<Self, DictionaryLoadError> {
        let file: DictionaryFile = serde_json::from_str(raw)?;
        Ok(Self::from_file(file))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DictionaryLoadError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| DictionaryLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&raw)?;
        tracing::info!(
            path = %path.display(),
            entries = catalog.definitions.len(),
            declensions = catalog.declensions.len(),
            "dictionary loaded"
        );
        Ok(catalog)
    }

    fn from_file(file: DictionaryFile) -> Self {
        let definitions = file
            .definitions
            .into_iter()
            .map(|(lemma, by_pos)| {
                let by_pos = by_pos
                    .into_iter()
                    .map(|(pos, defs)| (PartOfSpeech::parse(&pos), clean_definitions(defs)))
                    .filter(|(_, defs)| !defs.is_empty())
                    .collect();
                (lemma, by_pos)
            })
            .collect();

        Self {
            definitions,
            declensions: file.declensions,
            lexicon: file.lexicon.into_iter().collect(),
        }
    }

    fn is_known(&self, lemma: &str) -> bool {
        self.lexicon.contains(lemma)
            || self.definitions.contains_key(lemma)
            || self.declensions.contains_key(lemma)
    }

    /// The part of speech with the most definitions; ties go to the tag name order.
    fn most_frequent_part_of_speech(&self, lemma: &str) -> Option<PartOfSpeech> {
        let by_pos = self.definitions.get(lemma)?;
        let mut candidates: Vec<_> = by_pos.iter().collect();
        candidates.sort_by(|(a_pos, a), (b_pos, b)| {
            b.len()
                .cmp(&a.len())
                .then_with(|| a_pos.as_str().cmp(b_pos.as_str()))
        });
        candidates.first().map(|(pos, _)| (*pos).clone())
    }

    fn build(
        &self,
        lemma: &str,
        part_of_speech: &PartOfSpeech,
        definitions: Vec<String>,
    ) -> Result<Word, CatalogError> {
        let built = if *part_of_speech == PartOfSpeech::Noun {
            let declension = self
                .declensions
                .get(lemma)
                .cloned()
                .ok_or_else(|| CatalogError::LexiconMiss {
                    lemma: lemma.to_string(),
                })?;
            Word::noun(lemma, definitions, declension)
        } else {
            Word::basic(lemma, part_of_speech.clone(), definitions)
        };

        built.ok_or_else(|| CatalogError::DefinitionMiss {
            lemma: lemma.to_string(),
        })
    }
}

impl WordCatalog for DictionaryCatalog {
    fn resolve(
        &self,
        lemma: &str,
        part_of_speech: Option<&PartOfSpeech>,
    ) -> Result<Word, CatalogError> {
        if !self.is_known(lemma) {
            return Err(CatalogError::LexiconMiss {
                lemma: lemma.to_string(),
            });
        }

        let part_of_speech = match part_of_speech {
            Some(pos) => pos.clone(),
            None => self.most_frequent_part_of_speech(lemma).ok_or_else(|| {
                CatalogError::DefinitionMiss {
                    lemma: lemma.to_string(),
                }
            })?,
        };

        let definitions = self
            .definitions
            .get(lemma)
            .and_then(|by_pos| by_pos.get(&part_of_speech))
            .cloned()
            .ok_or_else(|| CatalogError::DefinitionMiss {
                lemma: lemma.to_string(),
            })?;

        self.build(lemma, &part_of_speech, definitions)
    }

    fn resolve_manual(
        &self,
        lemma: &str,
        part_of_speech: &PartOfSpeech,
        definitions: Vec<String>,
    ) -> Result<Word, CatalogError> {
        self.build(lemma, part_of_speech, clean_definitions(definitions))
    }
}

fn clean_definitions(definitions: Vec<String>) -> Vec<String> {
    definitions
        .into_iter()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::WordKind;

    const DICTIONARY: &str = r#"{
        "definitions": {
            "laufen": { "verb": ["run", "walk"] },
            "schnell": { "adj": ["fast"], "adv": ["quickly", "fast"] },
            "Haus": { "noun": ["house"] },
            "Baum": { "noun": ["tree"] }
        },
        "declensions": {
            "Haus": {
                "nominative_singular": "das Haus",
                "nominative_plural": "die Häuser",
                "genitive_singular": "des Hauses",
                "genitive_plural": "der Häuser",
                "dative_singular": "dem Haus",
                "dative_plural": "den Häusern",
                "accusative_singular": "das Haus",
                "accusative_plural": "die Häuser",
                "article": "das"
            }
        },
        "lexicon": ["Fernweh"]
    }"#;

    fn catalog() -> DictionaryCatalog {
        DictionaryCatalog::from_json(DICTIONARY).unwrap()
    }

    #[test]
    fn test_resolve_with_explicit_pos() {
        let word = catalog()
            .resolve("laufen", Some(&PartOfSpeech::Verb))
            .unwrap();
        assert_eq!(word.definitions(), ["run", "walk"]);
        assert_eq!(word.kind(), &WordKind::Basic);
    }

    #[test]
    fn test_resolve_picks_most_frequent_pos() {
        let word = catalog().resolve("schnell", None).unwrap();
        assert_eq!(word.part_of_speech(), &PartOfSpeech::Adverb);
    }

    #[test]
    fn test_resolve_noun_attaches_declension() {
        let word = catalog().resolve("Haus", None).unwrap();
        assert!(matches!(word.kind(), WordKind::Noun(d) if d.article == "das"));
    }

    #[test]
    fn test_unknown_word_is_lexicon_miss() {
        let err = catalog().resolve("Blorg", None).unwrap_err();
        assert!(matches!(err, CatalogError::LexiconMiss { .. }));
    }

    #[test]
    fn test_known_without_translation_is_definition_miss() {
        let err = catalog().resolve("Fernweh", None).unwrap_err();
        assert!(matches!(err, CatalogError::DefinitionMiss { .. }));

        let err = catalog()
            .resolve("laufen", Some(&PartOfSpeech::Noun))
            .unwrap_err();
        assert!(matches!(err, CatalogError::DefinitionMiss { .. }));
    }

    #[test]
    fn test_noun_without_declension_is_lexicon_miss() {
        let err = catalog().resolve("Baum", None).unwrap_err();
        assert!(matches!(err, CatalogError::LexiconMiss { .. }));
    }

    #[test]
    fn test_manual_definitions() {
        let word = catalog()
            .resolve_manual(
                "Fernweh",
                &PartOfSpeech::Other("noun-ish".into()),
                vec!["wanderlust".into(), "  ".into()],
            )
            .unwrap();
        assert_eq!(word.definitions(), ["wanderlust"]);

        let err = catalog()
            .resolve_manual("Fernweh", &PartOfSpeech::Verb, vec![" ".into()])
            .unwrap_err();
        assert!(matches!(err, CatalogError::DefinitionMiss { .. }));

        let err = catalog()
            .resolve_manual("Fernweh", &PartOfSpeech::Noun, vec!["wanderlust".into()])
            .unwrap_err();
        assert!(matches!(err, CatalogError::LexiconMiss { .. }));
    }
}
