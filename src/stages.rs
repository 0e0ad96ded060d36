//! The individual rewrite stages. Each stage is a pure function of the pass
//! context, the current buffer and the random source, and returns the new
//! buffer together with the change records it produced.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::random::{pick, RandomSource};
use crate::tables::{
    Dictionary, PatternTables, ASIDES, CONNECTORS, FINAL_FILLERS, FORMAL_LEAD_IN,
    FORMAL_LEAD_IN_REPLACEMENT, HEDGES, INFORMAL_LEAD_INS, SELF_CORRECTIONS, STARTERS,
};
use crate::text::{
    capitalize, char_len, is_blank, join_sentences, offset, split_sentences, words,
};
use crate::tuning::Tuning;

// ---------------------------------------------------------------------------
// Change records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    PatternRemoval,
    Restructuring,
    Optimization,
    NaturalLanguage,
    ShortText,
    FinalPass,
    Confidence,
    FallbackUsed,
    FallbackConfidence,
    LastResort,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass: Option<u8>,
    pub description: String,
}

impl Change {
    pub fn new(kind: ChangeKind, pass: Option<u8>, description: impl Into<String>) -> Self {
        Self {
            kind,
            pass,
            description: description.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pass plans
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restructure {
    SplitLong,
    Hedge,
    SelfCorrect,
    None,
}

type SentenceRewrite = fn(&str, &Tuning, &mut dyn RandomSource) -> Result<(String, usize)>;

impl Restructure {
    fn rewrite(self) -> Option<SentenceRewrite> {
        match self {
            Restructure::SplitLong => Some(split_long),
            Restructure::Hedge => Some(insert_hedges),
            Restructure::SelfCorrect => Some(insert_self_corrections),
            Restructure::None => None,
        }
    }
}

/// What each pass does differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassPlan {
    pub restructure: Restructure,
    pub optimization: Option<Dictionary>,
    pub split_long_sentences: bool,
}

pub const PASS_PLANS: [PassPlan; 4] = [
    PassPlan {
        restructure: Restructure::SplitLong,
        optimization: Some(Dictionary::Vocabulary),
        split_long_sentences: true,
    },
    PassPlan {
        restructure: Restructure::Hedge,
        optimization: Some(Dictionary::Phrases),
        split_long_sentences: false,
    },
    PassPlan {
        restructure: Restructure::SelfCorrect,
        optimization: Some(Dictionary::Grammar),
        split_long_sentences: false,
    },
    PassPlan {
        restructure: Restructure::None,
        optimization: None,
        split_long_sentences: false,
    },
];

pub const PASS_COUNT: u8 = PASS_PLANS.len() as u8;

/// Plan for a 1-based pass number.
pub fn plan(pass: u8) -> Result<&'static PassPlan> {
    usize::from(pass)
        .checked_sub(1)
        .and_then(|idx| PASS_PLANS.get(idx))
        .ok_or(Error::UnknownPass(pass))
}

// ---------------------------------------------------------------------------
// Stage plumbing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct StageContext<'a> {
    pub tables: &'a PatternTables,
    pub tuning: &'a Tuning,
    pub pass: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StageOutput {
    pub text: String,
    pub changes: Vec<Change>,
    pub edits: usize,
}

impl StageOutput {
    pub fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            changes: Vec::new(),
            edits: 0,
        }
    }

    fn edited(text: String, edits: usize, change: Change) -> Self {
        Self {
            text,
            changes: vec![change],
            edits,
        }
    }
}

// ---------------------------------------------------------------------------
// Pattern removal
// ---------------------------------------------------------------------------

static SPACE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").unwrap());

static SPACE_BEFORE_PUNCT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]+([,.!?;:])").unwrap());

// A sentence whose every word was removed.
static EMPTY_SENTENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([.!?])[ \t]+[.!?]+").unwrap());

// A comma or semicolon left at the start of a sentence once its lead-in is gone.
static ORPHAN_PUNCT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(^|[.!?])[ \t]*[,;:]+[ \t]*").unwrap());

static LEADING_PUNCT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\s.!?,;:]+").unwrap());

fn tidy(text: &str) -> String {
    let text = SPACE_RUN_RE.replace_all(text, " ");
    let text = EMPTY_SENTENCE_RE.replace_all(&text, "$1");
    let text = SPACE_BEFORE_PUNCT_RE.replace_all(&text, "$1");
    let text = ORPHAN_PUNCT_RE.replace_all(&text, "$1 ");
    let text = LEADING_PUNCT_RE.replace(&text, "");
    let text = SPACE_RUN_RE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Delete detection-pattern matches and swap phrase-table triggers for a
/// random alternative.
pub fn pattern_removal(
    ctx: &StageContext<'_>,
    text: &str,
    rng: &mut dyn RandomSource,
) -> Result<StageOutput> {
    let mut result = text.to_string();
    let mut edits = 0;

    for re in &ctx.tables.detection {
        let found = re.find_iter(&result).count();
        if found > 0 {
            edits += found;
            result = re.replace_all(&result, "").into_owned();
        }
    }

    let (replaced, fired) = ctx.tables.phrases.apply(&result, rng)?;
    edits += fired;

    if edits == 0 {
        return Ok(StageOutput::unchanged(text));
    }
    Ok(StageOutput::edited(
        tidy(&replaced),
        edits,
        Change::new(
            ChangeKind::PatternRemoval,
            Some(ctx.pass),
            format!("Removed or replaced {edits} AI-typical expressions"),
        ),
    ))
}

// ---------------------------------------------------------------------------
// Restructuring
// ---------------------------------------------------------------------------

fn split_long(
    body: &str,
    tuning: &Tuning,
    rng: &mut dyn RandomSource,
) -> Result<(String, usize)> {
    let words = words(body);
    let n = words.len();
    if n <= tuning.split_min_words {
        return Ok((body.to_string(), 0));
    }

    let mut fragments = Vec::new();
    let mut start = 0;
    for fraction in tuning.split_offsets {
        let point = offset(n, fraction);
        if point > start && point < n {
            fragments.push(words[start..point].join(" "));
            start = point;
        }
    }
    fragments.push(words[start..].join(" "));
    if fragments.len() < 2 {
        return Ok((body.to_string(), 0));
    }

    let mut out = fragments[0].clone();
    for fragment in &fragments[1..] {
        let connector = pick(rng, CONNECTORS)?;
        out.push_str(&format!(". {connector} {}", fragment.to_lowercase()));
    }
    Ok((out, 1))
}

fn insert_hedges(
    body: &str,
    tuning: &Tuning,
    rng: &mut dyn RandomSource,
) -> Result<(String, usize)> {
    let mut words = words(body);
    let n = words.len();
    if n <= tuning.hedge_min_words {
        return Ok((body.to_string(), 0));
    }

    let mut edits = 0;
    for fraction in tuning.hedge_offsets {
        let point = offset(n, fraction);
        if point > 0 && point < words.len() && rng.chance(tuning.hedge_chance) {
            words.insert(point, pick(rng, HEDGES)?.to_string());
            edits += 1;
        }
    }
    Ok((words.join(" "), edits))
}

fn insert_self_corrections(
    body: &str,
    tuning: &Tuning,
    rng: &mut dyn RandomSource,
) -> Result<(String, usize)> {
    let mut words = words(body);
    let mut edits = 0;

    if rng.chance(tuning.self_correction_chance) && words.len() > tuning.self_correction_min_words
    {
        let pos = words.len() / 2;
        words.insert(pos, pick(rng, SELF_CORRECTIONS)?.to_string());
        edits += 1;
    }
    if rng.chance(tuning.aside_chance) {
        let pos = offset(words.len(), tuning.aside_offset);
        words.insert(pos, pick(rng, ASIDES)?.to_string());
        edits += 1;
    }

    if edits == 0 {
        return Ok((body.to_string(), 0));
    }
    Ok((words.join(" "), edits))
}

/// Sentence-level restructuring selected by the pass plan.
pub fn restructure(
    ctx: &StageContext<'_>,
    text: &str,
    rng: &mut dyn RandomSource,
) -> Result<StageOutput> {
    let Some(rewrite) = plan(ctx.pass)?.restructure.rewrite() else {
        return Ok(StageOutput::unchanged(text));
    };

    let mut sentences = split_sentences(text);
    let mut edits = 0;
    for sentence in sentences.iter_mut().filter(|s| !s.body.is_empty()) {
        let (body, n) = rewrite(&sentence.body, ctx.tuning, rng)?;
        sentence.body = body;
        edits += n;
    }

    if edits == 0 {
        return Ok(StageOutput::unchanged(text));
    }
    Ok(StageOutput::edited(
        join_sentences(&sentences),
        edits,
        Change::new(
            ChangeKind::Restructuring,
            Some(ctx.pass),
            format!("Applied {edits} structural rewrites for a more natural flow"),
        ),
    ))
}

// ---------------------------------------------------------------------------
// Optimization
// ---------------------------------------------------------------------------

/// Per-sentence dictionary substitution with the pass's dictionary.
pub fn optimize(
    ctx: &StageContext<'_>,
    text: &str,
    rng: &mut dyn RandomSource,
) -> Result<StageOutput> {
    let Some(dictionary) = plan(ctx.pass)?.optimization else {
        return Ok(StageOutput::unchanged(text));
    };
    let table = ctx.tables.dictionary(dictionary);

    let mut sentences = split_sentences(text);
    let mut edits = 0;
    for sentence in sentences.iter_mut().filter(|s| !s.body.is_empty()) {
        let (body, fired) = table.apply(&sentence.body, rng)?;
        sentence.body = body;
        edits += fired;
    }

    if edits == 0 {
        return Ok(StageOutput::unchanged(text));
    }
    Ok(StageOutput::edited(
        join_sentences(&sentences),
        edits,
        Change::new(
            ChangeKind::Optimization,
            Some(ctx.pass),
            format!("Substituted {edits} formal expressions"),
        ),
    ))
}

// ---------------------------------------------------------------------------
// Natural language
// ---------------------------------------------------------------------------

const STARTER_PASS: u8 = 1;

/// Extra rules for short texts: fixed phrase swaps, an informal starter and
/// a colon turned into a dash.
pub fn short_text(
    ctx: &StageContext<'_>,
    text: &str,
    rng: &mut dyn RandomSource,
) -> Result<StageOutput> {
    let tuning = ctx.tuning;
    let (mut result, mut edits) = ctx.tables.short_text.apply(text, rng)?;

    // Starters are added in the first pass only, so later passes never stack
    // a second one on top.
    let lead = result.trim_start().to_lowercase();
    let led_in = INFORMAL_LEAD_INS.iter().any(|l| lead.starts_with(l))
        || STARTERS.iter().any(|s| lead.starts_with(&s.to_lowercase()));
    if ctx.pass == STARTER_PASS
        && char_len(&result) < tuning.starter_max_chars
        && !is_blank(&result)
        && !led_in
    {
        let starter = pick(rng, STARTERS)?;
        result = format!("{starter}{}", result.trim().to_lowercase());
        edits += 1;
    }

    if result.contains(':') && char_len(&result) < tuning.colon_max_chars {
        result = result.replacen(':', " -", 1);
        edits += 1;
    }

    if edits == 0 {
        return Ok(StageOutput::unchanged(text));
    }
    Ok(StageOutput::edited(
        result,
        edits,
        Change::new(
            ChangeKind::ShortText,
            Some(ctx.pass),
            format!("Applied {edits} short-text transformations"),
        ),
    ))
}

pub fn natural_language(
    ctx: &StageContext<'_>,
    text: &str,
    rng: &mut dyn RandomSource,
) -> Result<StageOutput> {
    let tuning = ctx.tuning;
    let pass_plan = plan(ctx.pass)?;
    let short = char_len(text) < tuning.short_text_chars;

    let mut buffer = text.to_string();
    let mut changes = Vec::new();
    let mut edits = 0;

    if short {
        let out = short_text(ctx, &buffer, rng)?;
        buffer = out.text;
        edits += out.edits;
        changes.extend(out.changes);
    }

    let mut sentences = split_sentences(&buffer);
    let mut tweaks = 0;
    for sentence in sentences.iter_mut().filter(|s| !s.body.is_empty()) {
        if pass_plan.split_long_sentences
            && char_len(&sentence.body) > tuning.long_sentence_chars
            && rng.chance(tuning.long_sentence_split_chance)
        {
            let words = words(&sentence.body);
            let mid = words.len() / 2;
            if mid > 0 {
                sentence.body = format!(
                    "{}. {}",
                    words[..mid].join(" "),
                    capitalize(&words[mid..].join(" "))
                );
                tweaks += 1;
            }
        }
        if short && sentence.body.contains(FORMAL_LEAD_IN) {
            sentence.body = sentence
                .body
                .replacen(FORMAL_LEAD_IN, FORMAL_LEAD_IN_REPLACEMENT, 1);
            tweaks += 1;
        }
    }

    if tweaks > 0 {
        buffer = join_sentences(&sentences);
        edits += tweaks;
        changes.push(Change::new(
            ChangeKind::NaturalLanguage,
            Some(ctx.pass),
            format!("Made {tweaks} natural-language adjustments"),
        ));
    }

    Ok(StageOutput {
        text: buffer,
        changes,
        edits,
    })
}

// ---------------------------------------------------------------------------
// Final pass
// ---------------------------------------------------------------------------

/// Runs once after the last pass: scatter fillers, connectors and asides.
pub fn final_pass(
    ctx: &StageContext<'_>,
    text: &str,
    rng: &mut dyn RandomSource,
) -> Result<StageOutput> {
    let tuning = ctx.tuning;
    let mut sentences = split_sentences(text);
    let mut edits = 0;

    for (idx, sentence) in sentences.iter_mut().enumerate() {
        if sentence.body.is_empty() {
            continue;
        }
        let mut words = words(&sentence.body);
        let mut inserted = 0;

        if rng.chance(tuning.final_filler_chance) {
            let pos = words.len() / 2;
            words.insert(pos, pick(rng, FINAL_FILLERS)?.to_string());
            inserted += 1;
        }
        // The opening sentence never gets a connector.
        let connect = idx > 0 && rng.chance(tuning.final_connector_chance);
        if rng.chance(tuning.final_aside_chance) {
            let pos = offset(words.len(), tuning.aside_offset);
            words.insert(pos, pick(rng, ASIDES)?.to_string());
            inserted += 1;
        }

        let mut body = words.join(" ");
        if connect {
            let connector = pick(rng, CONNECTORS)?;
            body = format!("{connector} {}", body.to_lowercase());
            inserted += 1;
        }

        if inserted > 0 {
            sentence.body = body;
            edits += inserted;
        }
    }

    if edits == 0 {
        return Ok(StageOutput::unchanged(text));
    }
    Ok(StageOutput::edited(
        join_sentences(&sentences),
        edits,
        Change::new(
            ChangeKind::FinalPass,
            None,
            format!("Added {edits} final informal markers"),
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plans_cover_every_pass() {
        for pass in 1..=PASS_COUNT {
            assert!(plan(pass).is_ok());
        }
        assert!(matches!(plan(0), Err(Error::UnknownPass(0))));
        assert!(matches!(plan(5), Err(Error::UnknownPass(5))));
    }

    #[test]
    fn tidy_drops_orphans() {
        assert_eq!(tidy(" ."), "");
        assert_eq!(tidy("Hej. . Då."), "Hej. Då.");
        assert_eq!(tidy("Hej. , du  är  här ."), "Hej. du är här.");
        assert_eq!(tidy(", det funkar"), "det funkar");
    }
}
