use std::sync::OnceLock;

use regex::Regex;

use super::PartOfSpeech;

static ANNOTATION: OnceLock<Regex> = OnceLock::new();

fn annotation() -> &'static Regex {
    ANNOTATION.get_or_init(|| Regex::new(r"\s*\[([^\]]+)\]").expect("valid annotation pattern"))
}

/// Splits `"schnell [adj]"` into the lemma and the bracketed part of speech.
///
/// Only the first annotation is used. Returns `None` for blank input.
pub fn parse_word_input(input: &str) -> Option<(String, Option<PartOfSpeech>)> {
    let re = annotation();
    let part_of_speech = re
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| PartOfSpeech::parse(m.as_str()));

    let lemma = re.replace_all(input, "").trim().to_string();
    if lemma.is_empty() {
        return None;
    }

    Some((lemma, part_of_speech))
}

/// Pulls a `[pos]` annotation out of free text, returning the remaining text.
pub fn take_annotation(input: &str) -> (String, Option<PartOfSpeech>) {
    let re = annotation();
    let part_of_speech = re
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| PartOfSpeech::parse(m.as_str()));
    (re.replace_all(input, "").into_owned(), part_of_speech)
}

/// One definition per non-blank line.
pub fn split_definitions(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
