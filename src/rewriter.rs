use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::random::{pick, RandomSource};
use crate::text::sentence_fragments;

static BOUNDARY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\s*([A-ZÅÄÖ])").unwrap());

const TRANSITIONS: &[&str] = &["", "Dessutom ", "Vidare ", "Samtidigt ", "Därför "];

/// Openers swapped for each other.
const OPENER_SWAPS: &[(&str, &str)] = &[("Det ", "Detta "), ("Detta ", "Det ")];

/// Phrases swapped for each other, first occurrence only.
const PHRASE_SWAPS: &[(&str, &str)] = &[
    ("är viktigt", "spelar en viktig roll"),
    ("spelar en viktig roll", "är viktigt"),
];

fn swap_first<F>(sentence: &str, swaps: &[(&str, &str)], matches: F) -> Option<String>
where
    F: Fn(&str, &str) -> bool,
{
    swaps
        .iter()
        .find(|(from, _)| matches(sentence, from))
        .map(|(from, to)| sentence.replacen(from, to, 1))
}

fn vary_sentence(sentence: &str) -> String {
    let sentence = swap_first(sentence, OPENER_SWAPS, |s, from| s.starts_with(from))
        .unwrap_or_else(|| sentence.to_string());
    swap_first(&sentence, PHRASE_SWAPS, |s, from| s.contains(from)).unwrap_or(sentence)
}

/// Vary sentence openers and stock phrases, then scatter transition words
/// between sentences.
pub fn rewrite(text: &str, rng: &mut dyn RandomSource) -> String {
    let sentences: Vec<String> = sentence_fragments(text)
        .into_iter()
        .map(vary_sentence)
        .collect();
    if sentences.is_empty() {
        return String::new();
    }

    let joined = format!("{}.", sentences.join(". "));
    BOUNDARY_RE
        .replace_all(&joined, |caps: &Captures<'_>| {
            let transition = pick(rng, TRANSITIONS).copied().unwrap_or_default();
            format!(". {transition}{}", &caps[1])
        })
        .into_owned()
}
