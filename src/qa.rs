use serde::Serialize;

use crate::text::sentence_fragments;

const MAX_ANSWER_SENTENCES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "answer", rename_all = "snake_case")]
pub enum Answer {
    /// No reference text was given, so nothing can be looked up.
    NeedsReference,
    Found(String),
    NotFound,
}

fn tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

fn answer_one(question: &str, sentences: &[&str]) -> Answer {
    let question_words = tokens(question);

    let overlapping: Vec<&str> = sentences
        .iter()
        .copied()
        .filter(|sentence| {
            let sentence_words = tokens(sentence);
            question_words.iter().any(|q| {
                sentence_words
                    .iter()
                    .any(|s| s.contains(q.as_str()) || q.contains(s.as_str()))
            })
        })
        .collect();
    if overlapping.is_empty() {
        return Answer::NotFound;
    }
    Answer::Found(
        overlapping
            .into_iter()
            .take(MAX_ANSWER_SENTENCES)
            .collect::<Vec<_>>()
            .join(" "),
    )
}

/// Answer each question with the reference sentences that share words with
/// it. A blank reference yields `NeedsReference` for every question.
pub fn answer<S: AsRef<str>>(questions: &[S], reference: &str) -> Vec<Answer> {
    if reference.trim().is_empty() {
        return questions.iter().map(|_| Answer::NeedsReference).collect();
    }
    let sentences = sentence_fragments(reference);
    questions
        .iter()
        .map(|q| answer_one(q.as_ref(), &sentences))
        .collect()
}

/// One question per non-blank line.
pub fn parse_questions(block: &str) -> Vec<String> {
    block
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
