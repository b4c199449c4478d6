use chrono::Duration;

use super::{ConversationError, RenderDirective, TurnContext};
use crate::db::RecordStore;
use crate::lexicon::parse::{parse_word_input, split_definitions, take_annotation};
use crate::lexicon::{CatalogError, Fact, PartOfSpeech, Word};
use crate::memory;
use crate::services::{FactSequence, SchedulerError, SequenceStep, SessionScore};

pub const BACK: &str = "back";
pub const NEW_WORD: &str = "new word";
pub const RECALL: &str = "recall";
pub const CONTINUE: &str = "continue";
pub const YES: &str = "Yes";
pub const NO: &str = "No";
pub const NEXT_WORD: &str = "next word";

pub const INCORRECT_INPUT: &str = "Incorrect input, use keyboard buttons";
pub const ALREADY_TRACKED: &str = "Word already in quiz";
pub const WORD_NOT_FOUND: &str = "Word was not found in the dictionary\nthus there most likely is a typo";
pub const EMPTY_QUIZ: &str = "Your quiz is empty, add a word first";
pub const MISSING_PART_OF_SPEECH: &str = "Part of speech is unknown, add it in [] i.e. [adj]";

/// One step of the dialog. Consumed by [`ConversationState::handle`], which
/// returns the state that replaces it.
#[derive(Debug, Default)]
pub enum ConversationState {
    #[default]
    Default,
    EnterNewWord,
    ManualDefinitionEntry {
        lemma: String,
        part_of_speech: Option<PartOfSpeech>,
    },
    ConfirmAddWord {
        word: Word,
    },
    PickQuizWord,
    PresentFact {
        sequence: Box<FactSequence>,
    },
    AwaitReveal {
        sequence: Box<FactSequence>,
        fact: Fact,
    },
    AwaitGrade {
        sequence: Box<FactSequence>,
        fact: Fact,
    },
    SessionComplete {
        word: Word,
        score: SessionScore,
        half_life: Option<Duration>,
    },
}

#[derive(Debug)]
pub struct Transition {
    pub next: ConversationState,
    pub notices: Vec<String>,
}

impl Transition {
    fn to(next: ConversationState) -> Self {
        Self {
            next,
            notices: Vec::new(),
        }
    }

    fn with_notice(next: ConversationState, notice: impl Into<String>) -> Self {
        Self {
            next,
            notices: vec![notice.into()],
        }
    }

    fn rejected(unchanged: ConversationState) -> Self {
        Self::with_notice(unchanged, INCORRECT_INPUT)
    }
}

fn is(input: &str, choice: &str) -> bool {
    input.eq_ignore_ascii_case(choice)
}

fn choices(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|label| label.to_string()).collect()
}

impl ConversationState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::EnterNewWord => "enter_new_word",
            Self::ManualDefinitionEntry { .. } => "manual_definition_entry",
            Self::ConfirmAddWord { .. } => "confirm_add_word",
            Self::PickQuizWord => "pick_quiz_word",
            Self::PresentFact { .. } => "present_fact",
            Self::AwaitReveal { .. } => "await_reveal",
            Self::AwaitGrade { .. } => "await_grade",
            Self::SessionComplete { .. } => "session_complete",
        }
    }

    pub fn render(&self, notices: Vec<String>) -> RenderDirective {
        let (prompt, choices) = match self {
            Self::Default => (
                "Press new word button to add a new word to your quiz\n\n\
                 To perform a recall press recall button"
                    .to_string(),
                choices(&[NEW_WORD, RECALL]),
            ),
            Self::EnterNewWord => (
                "Enter a word you want to add.\n\
                 To specify part of speech enclose it in [] i.e. [adj]"
                    .to_string(),
                choices(&[BACK]),
            ),
            Self::ManualDefinitionEntry {
                lemma,
                part_of_speech,
            } => {
                let mut prompt = format!(
                    "Unable to find a definition of {lemma} in the dictionary\n\
                     Enter the translation manually, one definition per line"
                );
                if part_of_speech.is_none() {
                    prompt.push_str("\nSpecify a part of speech in [] i.e. [noun]");
                }
                (prompt, choices(&[BACK]))
            }
            Self::ConfirmAddWord { word } => (
                format!(
                    "{word}\n{}\n\nConfirm adding this word?",
                    word.definitions().join("\n")
                ),
                choices(&[YES, NO, BACK]),
            ),
            Self::PickQuizWord => (
                "Press continue to draw a word from your quiz".to_string(),
                choices(&[CONTINUE, BACK]),
            ),
            Self::PresentFact { sequence } => {
                let prompt = if sequence.graded_count() == 0 {
                    format!(
                        "Word is {}, press continue when you are ready to start the word quiz",
                        sequence.word().lemma()
                    )
                } else {
                    "Press continue for the next fact".to_string()
                };
                (prompt, choices(&[CONTINUE, BACK]))
            }
            Self::AwaitReveal { fact, .. } => (
                format!(
                    "Fact to recall - {}\nPress continue when you are ready",
                    fact.prompt
                ),
                choices(&[CONTINUE, BACK]),
            ),
            Self::AwaitGrade { fact, .. } => (
                format!("Answer is\n{}\n\nDid you recall it right?", fact.answer),
                choices(&[YES, NO, BACK]),
            ),
            Self::SessionComplete {
                word,
                score,
                half_life,
            } => {
                let percent = score.ratio().map_or(0.0, |ratio| ratio * 100.0).round();
                let mut prompt = format!("Word recall is over, total score is - {percent}%");
                if let Some(half_life) = half_life {
                    prompt.push_str(&format!(
                        "\n{} will be half forgotten in about {}",
                        word.lemma(),
                        describe_duration(*half_life)
                    ));
                }
                (prompt, choices(&[NEXT_WORD, BACK]))
            }
        };

        RenderDirective {
            prompt,
            choices,
            notices,
        }
    }

    pub async fn handle<S: RecordStore>(
        self,
        input: &str,
        ctx: &TurnContext<'_, S>,
    ) -> Result<Transition, ConversationError> {
        let input = input.trim();
        if is(input, BACK) {
            return Ok(Transition::to(Self::Default));
        }

        match self {
            Self::Default if is(input, NEW_WORD) => Ok(Transition::to(Self::EnterNewWord)),
            Self::Default if is(input, RECALL) => Ok(Transition::to(Self::PickQuizWord)),
            Self::EnterNewWord => enter_word(input, ctx).await,
            Self::ManualDefinitionEntry {
                lemma,
                part_of_speech,
            } => enter_definitions(lemma, part_of_speech, input, ctx).await,
            Self::ConfirmAddWord { word } if is(input, YES) => confirm_word(word, ctx).await,
            Self::ConfirmAddWord { .. } if is(input, NO) => Ok(Transition::to(Self::EnterNewWord)),
            Self::PickQuizWord if is(input, CONTINUE) => pick_word(ctx).await,
            Self::PresentFact { sequence } if is(input, CONTINUE) => {
                present_next(sequence, ctx).await
            }
            Self::AwaitReveal { sequence, fact } if is(input, CONTINUE) => {
                Ok(Transition::to(Self::AwaitGrade { sequence, fact }))
            }
            Self::AwaitGrade { mut sequence, .. } if is(input, YES) || is(input, NO) => {
                sequence.set_answer(is(input, YES))?;
                Ok(Transition::to(Self::PresentFact { sequence }))
            }
            Self::SessionComplete { .. } if is(input, NEXT_WORD) => {
                Ok(Transition::to(Self::PickQuizWord))
            }
            unchanged => Ok(Transition::rejected(unchanged)),
        }
    }
}

async fn enter_word<S: RecordStore>(
    input: &str,
    ctx: &TurnContext<'_, S>,
) -> Result<Transition, ConversationError> {
    let Some((lemma, part_of_speech)) = parse_word_input(input) else {
        return Ok(Transition::rejected(ConversationState::EnterNewWord));
    };

    match ctx.catalog.resolve(&lemma, part_of_speech.as_ref()) {
        Ok(word) => offer_word(word, ctx).await,
        Err(CatalogError::LexiconMiss { .. }) => Ok(Transition::with_notice(
            ConversationState::EnterNewWord,
            WORD_NOT_FOUND,
        )),
        Err(CatalogError::DefinitionMiss { .. }) => {
            Ok(Transition::to(ConversationState::ManualDefinitionEntry {
                lemma,
                part_of_speech,
            }))
        }
    }
}

async fn enter_definitions<S: RecordStore>(
    lemma: String,
    part_of_speech: Option<PartOfSpeech>,
    input: &str,
    ctx: &TurnContext<'_, S>,
) -> Result<Transition, ConversationError> {
    let (text, annotated) = take_annotation(input);
    let definitions = split_definitions(&text);
    if definitions.is_empty() {
        return Ok(Transition::rejected(
            ConversationState::ManualDefinitionEntry {
                lemma,
                part_of_speech,
            },
        ));
    }

    let Some(part_of_speech) = part_of_speech.or(annotated) else {
        return Ok(Transition::with_notice(
            ConversationState::ManualDefinitionEntry {
                lemma,
                part_of_speech: None,
            },
            MISSING_PART_OF_SPEECH,
        ));
    };

    match ctx
        .catalog
        .resolve_manual(&lemma, &part_of_speech, definitions)
    {
        Ok(word) => offer_word(word, ctx).await,
        Err(err) => Ok(Transition::with_notice(
            ConversationState::EnterNewWord,
            format!("Unable to add {lemma} [{part_of_speech}]: {err}"),
        )),
    }
}

async fn offer_word<S: RecordStore>(
    word: Word,
    ctx: &TurnContext<'_, S>,
) -> Result<Transition, ConversationError> {
    if ctx.scheduler.is_tracked(&word).await? {
        return Ok(Transition::with_notice(
            ConversationState::EnterNewWord,
            ALREADY_TRACKED,
        ));
    }
    Ok(Transition::to(ConversationState::ConfirmAddWord { word }))
}

async fn confirm_word<S: RecordStore>(
    word: Word,
    ctx: &TurnContext<'_, S>,
) -> Result<Transition, ConversationError> {
    let notice = match ctx.scheduler.add_word(&word).await {
        Ok(()) => format!("{word} added to your quiz"),
        Err(SchedulerError::DuplicateWord(_)) => ALREADY_TRACKED.to_string(),
        Err(err) => return Err(err.into()),
    };
    Ok(Transition::with_notice(ConversationState::EnterNewWord, notice))
}

async fn pick_word<S: RecordStore>(
    ctx: &TurnContext<'_, S>,
) -> Result<Transition, ConversationError> {
    match ctx.scheduler.weighted_random_word().await {
        Ok(word) => Ok(Transition::to(ConversationState::PresentFact {
            sequence: Box::new(FactSequence::new(word)),
        })),
        Err(SchedulerError::EmptyQuiz) => Ok(Transition::with_notice(
            ConversationState::Default,
            EMPTY_QUIZ,
        )),
        Err(err) => Err(err.into()),
    }
}

async fn present_next<S: RecordStore>(
    mut sequence: Box<FactSequence>,
    ctx: &TurnContext<'_, S>,
) -> Result<Transition, ConversationError> {
    let score = match sequence.next()? {
        SequenceStep::Fact(fact) => {
            return Ok(Transition::to(ConversationState::AwaitReveal {
                sequence,
                fact,
            }))
        }
        SequenceStep::Complete(score) => score,
    };

    let word = sequence.word().clone();
    let half_life = if score.total_weight > 0.0 {
        match ctx
            .scheduler
            .record_result(&word, score.correct_weight, score.total_weight)
            .await
        {
            Ok(record) => Some(memory::half_life(&record.model)),
            Err(SchedulerError::WordNotTracked(_)) => {
                tracing::warn!(
                    user_id = ctx.scheduler.user(),
                    word = %word,
                    "quizzed word is no longer tracked, result dropped"
                );
                None
            }
            Err(err) => return Err(err.into()),
        }
    } else {
        None
    };

    Ok(Transition::to(ConversationState::SessionComplete {
        word,
        score,
        half_life,
    }))
}

fn describe_duration(duration: Duration) -> String {
    let hours = duration.num_hours();
    if hours < 1 {
        format!("{} minutes", duration.num_minutes().max(1))
    } else if hours < 48 {
        format!("{hours} hours")
    } else {
        format!("{} days", duration.num_days())
    }
}
