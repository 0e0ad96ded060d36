use once_cell::sync::Lazy;
use regex::Regex;

static DELIMITER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

/// A sentence body with the delimiter run that closed it. The last sentence of
/// a text may have an empty delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Sentence {
    pub body: String,
    pub delimiter: String,
}

pub(crate) fn split_sentences(text: &str) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let mut last = 0;
    for m in DELIMITER_RE.find_iter(text) {
        sentences.push(Sentence {
            body: text[last..m.start()].trim().to_string(),
            delimiter: m.as_str().to_string(),
        });
        last = m.end();
    }
    let tail = text[last..].trim();
    if !tail.is_empty() {
        sentences.push(Sentence {
            body: tail.to_string(),
            delimiter: String::new(),
        });
    }
    sentences
}

/// Reassemble sentences with single spaces. A sentence with an empty body
/// contributes only its delimiter, attached to whatever precedes it.
pub(crate) fn join_sentences(sentences: &[Sentence]) -> String {
    let mut out = String::new();
    for s in sentences {
        if s.body.is_empty() {
            out.push_str(&s.delimiter);
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&s.body);
        out.push_str(&s.delimiter);
    }
    out
}

/// Non-blank sentence fragments, the way the analyzer and estimator see text.
pub(crate) fn sentence_fragments(text: &str) -> Vec<&str> {
    DELIMITER_RE
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

pub(crate) fn words(body: &str) -> Vec<String> {
    body.split_whitespace().map(str::to_string).collect()
}

pub(crate) fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Word index at `fraction` of `len`, rounded down.
pub(crate) fn offset(len: usize, fraction: f64) -> usize {
    (len as f64 * fraction).floor() as usize
}

/// Text with no letters or digits counts as empty.
pub(crate) fn is_blank(text: &str) -> bool {
    !text.chars().any(char::is_alphanumeric)
}

pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_keeps_delimiters_and_tail() {
        let s = split_sentences("Hej där!  Vad gör du?? Inget");
        assert_eq!(s.len(), 3);
        assert_eq!(s[0].body, "Hej där");
        assert_eq!(s[0].delimiter, "!");
        assert_eq!(s[1].delimiter, "??");
        assert_eq!(s[2].body, "Inget");
        assert_eq!(s[2].delimiter, "");
    }

    #[test]
    fn join_normalizes_spacing() {
        let s = split_sentences("  Ett.   Två!");
        assert_eq!(join_sentences(&s), "Ett. Två!");
    }

    #[test]
    fn empty_bodies_keep_their_delimiters() {
        let s = split_sentences("Ja. . Nej.");
        assert_eq!(join_sentences(&s), "Ja.. Nej.");
        assert_eq!(join_sentences(&split_sentences(".")), ".");
    }

    #[test]
    fn capitalize_handles_non_ascii() {
        assert_eq!(capitalize("åska"), "Åska");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn offsets_round_down() {
        assert_eq!(offset(12, 0.4), 4);
        assert_eq!(offset(12, 0.7), 8);
        assert_eq!(offset(5, 0.7), 3);
    }
}
