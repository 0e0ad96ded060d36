use tracing::warn;

use crate::error::{Error, Result};
use crate::pipeline::Humanized;
use crate::stages::{Change, ChangeKind};
use crate::tables::{PatternTables, LAST_RESORT_INTERJECTION};
use crate::text::{is_blank, join_sentences, split_sentences};

const FALLBACK_CONFIDENCE: u8 = 80;

/// Sentence-by-sentence cleanup: strip a few formal connectives, nothing
/// random.
pub fn rewrite(tables: &PatternTables, text: &str) -> Result<Humanized> {
    let mut sentences = split_sentences(text);
    for sentence in &mut sentences {
        let mut body = sentence.body.clone();
        for re in &tables.fallback_connectives {
            body = re.replace_all(&body, "").into_owned();
        }
        sentence.body = body.split_whitespace().collect::<Vec<_>>().join(" ");
    }

    let result = join_sentences(&sentences).trim().to_string();
    if is_blank(&result) {
        return Err(Error::EmptyOutput);
    }

    Ok(Humanized {
        humanized_text: result,
        changes: vec![
            Change::new(
                ChangeKind::FallbackUsed,
                None,
                "Used a simple sentence-by-sentence rewrite",
            ),
            Change::new(
                ChangeKind::FallbackConfidence,
                None,
                format!("Estimated confidence: {FALLBACK_CONFIDENCE}%"),
            ),
        ],
    })
}

/// Lower-case the input behind a fixed interjection. Cannot fail.
pub fn last_resort(text: &str) -> Humanized {
    let body = text.trim().to_lowercase();
    let mut result = format!("{LAST_RESORT_INTERJECTION} {body}");
    if !result.ends_with(['.', '!', '?']) {
        result.push('.');
    }
    Humanized {
        humanized_text: result,
        changes: vec![Change::new(
            ChangeKind::LastResort,
            None,
            "Applied minimal processing to guarantee output",
        )],
    }
}

pub fn humanize(tables: &PatternTables, text: &str) -> Humanized {
    match rewrite(tables, text) {
        Ok(humanized) => humanized,
        Err(err) => {
            warn!(error = %err, "fallback rewrite failed, using last resort");
            last_resort(text)
        }
    }
}
