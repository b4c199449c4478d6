//! Lexical entries and the quizzable facts derived from them.

pub mod catalog;
pub mod parse;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use catalog::{CatalogError, DictionaryCatalog, WordCatalog};

const DEFINITION_WEIGHT: f64 = 10.0;
const ARTICLE_WEIGHT: f64 = 5.0;
const WEAK_CASE_WEIGHT: f64 = 1.0;
const WEAK_CASE_PROBABILITY: f64 = 0.75;
const PLURAL_WEIGHT: f64 = 2.0;
const PLURAL_PROBABILITY: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Other(String),
}

impl PartOfSpeech {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "noun" => Self::Noun,
            "verb" => Self::Verb,
            "adj" | "adjective" => Self::Adjective,
            "adv" | "adverb" => Self::Adverb,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Noun => "noun",
            Self::Verb => "verb",
            Self::Adjective => "adj",
            Self::Adverb => "adv",
            Self::Other(tag) => tag.as_str(),
        }
    }
}

impl From<String> for PartOfSpeech {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<PartOfSpeech> for String {
    fn from(value: PartOfSpeech) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a word: (lemma, part of speech).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordKey {
    pub lemma: String,
    pub part_of_speech: PartOfSpeech,
}

/// Declined forms, each stored with its article ("des Hauses").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NounDeclension {
    pub nominative_singular: String,
    pub nominative_plural: String,
    pub genitive_singular: String,
    pub genitive_plural: String,
    pub dative_singular: String,
    pub dative_plural: String,
    pub accusative_singular: String,
    pub accusative_plural: String,
    pub article: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Case {
    Dative,
    Accusative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Number {
    Singular,
    Plural,
}

impl NounDeclension {
    fn form(&self, case: Case, number: Number) -> &str {
        match (case, number) {
            (Case::Dative, Number::Singular) => &self.dative_singular,
            (Case::Dative, Number::Plural) => &self.dative_plural,
            (Case::Accusative, Number::Singular) => &self.accusative_singular,
            (Case::Accusative, Number::Plural) => &self.accusative_plural,
        }
    }

    fn nominative(&self, number: Number) -> &str {
        match number {
            Number::Singular => &self.nominative_singular,
            Number::Plural => &self.nominative_plural,
        }
    }

    /// Case forms whose bare noun differs from the nominative of the same number.
    fn weak_cases(&self) -> Vec<(Case, Number)> {
        [
            (Case::Accusative, Number::Plural),
            (Case::Accusative, Number::Singular),
            (Case::Dative, Number::Singular),
            (Case::Dative, Number::Plural),
        ]
        .into_iter()
        .filter(|(case, number)| {
            bare_form(self.form(*case, *number)) != bare_form(self.nominative(*number))
        })
        .collect()
    }
}

/// Strips the leading article: "dem Hause" -> "Hause".
fn bare_form(form: &str) -> &str {
    let form = form.trim();
    form.split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim_start())
        .unwrap_or(form)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "declension", rename_all = "lowercase")]
pub enum WordKind {
    Basic,
    Noun(NounDeclension),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    lemma: String,
    part_of_speech: PartOfSpeech,
    definitions: Vec<String>,
    kind: WordKind,
}

impl Word {
    /// Returns `None` when `definitions` is empty.
    pub fn basic(
        lemma: impl Into<String>,
        part_of_speech: PartOfSpeech,
        definitions: Vec<String>,
    ) -> Option<Self> {
        if definitions.is_empty() {
            return None;
        }
        Some(Self {
            lemma: lemma.into(),
            part_of_speech,
            definitions,
            kind: WordKind::Basic,
        })
    }

    /// Returns `None` when `definitions` is empty.
    pub fn noun(
        lemma: impl Into<String>,
        definitions: Vec<String>,
        declension: NounDeclension,
    ) -> Option<Self> {
        if definitions.is_empty() {
            return None;
        }
        Some(Self {
            lemma: lemma.into(),
            part_of_speech: PartOfSpeech::Noun,
            definitions,
            kind: WordKind::Noun(declension),
        })
    }

    pub fn lemma(&self) -> &str {
        &self.lemma
    }

    pub fn part_of_speech(&self) -> &PartOfSpeech {
        &self.part_of_speech
    }

    pub fn definitions(&self) -> &[String] {
        &self.definitions
    }

    pub fn kind(&self) -> &WordKind {
        &self.kind
    }

    pub fn key(&self) -> WordKey {
        WordKey {
            lemma: self.lemma.clone(),
            part_of_speech: self.part_of_speech.clone(),
        }
    }

    /// Ordered candidate facts for one quiz attempt.
    pub fn facts(&self) -> Vec<Fact> {
        let mut facts = vec![Fact {
            prompt: "Definition".to_string(),
            answer: self.definitions.join("\n"),
            ask_probability: 1.0,
            weight: DEFINITION_WEIGHT,
        }];

        if let WordKind::Noun(declension) = &self.kind {
            facts.push(Fact {
                prompt: "article".to_string(),
                answer: declension.nominative_singular.clone(),
                ask_probability: 1.0,
                weight: ARTICLE_WEIGHT,
            });

            for (case, number) in declension.weak_cases() {
                facts.push(Fact {
                    prompt: weak_case_prompt(case, number).to_string(),
                    answer: declension.form(case, number).to_string(),
                    ask_probability: WEAK_CASE_PROBABILITY,
                    weight: WEAK_CASE_WEIGHT,
                });
            }

            facts.push(Fact {
                prompt: "plural form".to_string(),
                answer: declension.nominative_plural.clone(),
                ask_probability: PLURAL_PROBABILITY,
                weight: PLURAL_WEIGHT,
            });
        }

        facts
    }
}

fn weak_case_prompt(case: Case, number: Number) -> &'static str {
    match (case, number) {
        (Case::Accusative, Number::Plural) => "accusative plural",
        (Case::Accusative, Number::Singular) => "accusative singular",
        (Case::Dative, Number::Singular) => "dative singular",
        (Case::Dative, Number::Plural) => "dative plural",
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.lemma, self.part_of_speech)
    }
}

/// One quizzable question derived from a word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fact {
    pub prompt: String,
    pub answer: String,
    pub ask_probability: f64,
    pub weight: f64,
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_basic_word_single_definition_fact() {
        let facts = laufen().facts();
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].prompt, "Definition");
        assert_eq!(facts[0].answer, "run\nwalk");
        assert_eq!(facts[0].ask_probability, 1.0);
        assert_eq!(facts[0].weight, 10.0);
    }

    #[test]
    fn test_noun_facts_skip_identical_forms() {
        let facts = haus().facts();
        let prompts: Vec<_> = facts.iter().map(|f| f.prompt.as_str()).collect();
        assert_eq!(
            prompts,
            vec!["Definition", "article", "dative plural", "plural form"]
        );
        assert_eq!(facts[1].answer, "das Haus");
        assert_eq!(facts[1].weight, 5.0);
        assert_eq!(facts[2].answer, "den Häusern");
        assert_eq!(facts[2].ask_probability, 0.75);
        assert_eq!(facts[3].answer, "die Häuser");
        assert_eq!(facts[3].ask_probability, 0.5);
        assert_eq!(facts[3].weight, 2.0);
    }

    #[test]
    fn test_weak_noun_includes_all_differing_cases() {
        let declension = NounDeclension {
            nominative_singular: "der Student".into(),
            nominative_plural: "die Studenten".into(),
            genitive_singular: "des Studenten".into(),
            genitive_plural: "der Studenten".into(),
            dative_singular: "dem Studenten".into(),
            dative_plural: "den Studenten".into(),
            accusative_singular: "den Studenten".into(),
            accusative_plural: "die Studenten".into(),
            article: "der".into(),
        };
        let word = Word::noun("Student", vec!["student".into()], declension).unwrap();
        let prompts: Vec<_> = word.facts().into_iter().map(|f| f.prompt).collect();
        assert_eq!(
            prompts,
            vec![
                "Definition",
                "article",
                "accusative singular",
                "dative singular",
                "plural form"
            ]
        );
    }

    #[test]
    fn test_empty_definitions_rejected() {
        assert!(Word::basic("leer", PartOfSpeech::Adjective, vec![]).is_none());
        assert!(Word::noun("Haus", vec![], haus_declension()).is_none());
    }

    #[test]
    fn test_part_of_speech_tags() {
        assert_eq!(PartOfSpeech::parse("adj"), PartOfSpeech::Adjective);
        assert_eq!(PartOfSpeech::parse(" Noun "), PartOfSpeech::Noun);
        assert_eq!(
            PartOfSpeech::parse("prep"),
            PartOfSpeech::Other("prep".into())
        );
        assert_eq!(PartOfSpeech::Adverb.to_string(), "adv");
    }

    #[test]
    fn test_word_display_and_key() {
        let word = haus();
        assert_eq!(word.to_string(), "Haus [noun]");
        assert_eq!(word.key().lemma, "Haus");
        assert_eq!(word.key().part_of_speech, PartOfSpeech::Noun);
    }

    #[test]
    fn test_word_json_round_trip() {
        let word = haus();
        let json = serde_json::to_string(&word).unwrap();
        let back: Word = serde_json::from_str(&json).unwrap();
        assert_eq!(back, word);
    }
}
