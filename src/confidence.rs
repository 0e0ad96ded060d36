use crate::tables::PatternTables;
use crate::text::{sentence_fragments, word_count};
use crate::tuning::Tuning;

// ---------------------------------------------------------------------------
// Informal markers
// ---------------------------------------------------------------------------

struct Marker {
    needles: &'static [&'static str],
    case_insensitive: bool,
    bonus: i32,
}

const MARKERS: &[Marker] = &[
    // Fillers
    Marker {
        needles: &["alltså", "liksom", "typ", "kanske", "möjligen"],
        case_insensitive: false,
        bonus: 8,
    },
    // Self-corrections
    Marker {
        needles: &["(tror jag)", "(eller?)", "(om jag fattat rätt)", "(kanske)", "(möjligen)"],
        case_insensitive: false,
        bonus: 10,
    },
    // Connectors
    Marker {
        needles: &["Men", "Och", "Fast", "Dessutom", "Sen"],
        case_insensitive: false,
        bonus: 5,
    },
    // Swedish expressions
    Marker {
        needles: &[
            "asså",
            "alltså",
            "liksom",
            "typ",
            "kanske",
            "möjligen",
            "tror jag",
            "eller hur",
            "va",
            "eller nåt sånt",
        ],
        case_insensitive: true,
        bonus: 7,
    },
    Marker {
        needles: &["?"],
        case_insensitive: false,
        bonus: 4,
    },
    Marker {
        needles: &["!"],
        case_insensitive: false,
        bonus: 3,
    },
    // Sentence starters
    Marker {
        needles: &["Men", "Och", "Fast", "Dessutom", "Sen", "Alltså", "Asså", "Liksom"],
        case_insensitive: false,
        bonus: 5,
    },
];

const PARENTHETICAL_BONUS: i32 = 6;
const VARIANCE_BONUS: i32 = 8;
const SHORT_MEAN_BONUS: i32 = 5;
const VERY_SHORT_MEAN_BONUS: i32 = 3;

fn marker_bonus(text: &str) -> i32 {
    let lowered = text.to_lowercase();
    MARKERS
        .iter()
        .filter(|m| {
            let haystack = if m.case_insensitive { &lowered } else { text };
            m.needles.iter().any(|n| haystack.contains(n))
        })
        .map(|m| m.bonus)
        .sum()
}

fn sentence_stats_bonus(text: &str, tuning: &Tuning) -> i32 {
    let lengths: Vec<f64> = sentence_fragments(text)
        .iter()
        .map(|s| word_count(s) as f64)
        .collect();
    if lengths.is_empty() {
        return 0;
    }
    let mean = lengths.iter().sum::<f64>() / lengths.len() as f64;
    let variance = lengths.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / lengths.len() as f64;

    let mut bonus = 0;
    if variance > tuning.confidence_variance_threshold {
        bonus += VARIANCE_BONUS;
    }
    if mean < tuning.confidence_short_mean {
        bonus += SHORT_MEAN_BONUS;
    }
    if mean < tuning.confidence_very_short_mean {
        bonus += VERY_SHORT_MEAN_BONUS;
    }
    bonus
}

/// Heuristic percentage that the text reads as human-written. Always within
/// `[confidence_min, confidence_max]`; this is not a measured probability.
pub fn estimate(tables: &PatternTables, tuning: &Tuning, text: &str) -> u8 {
    let matches = i32::try_from(tables.detection_count(text)).unwrap_or(i32::MAX);
    let mut score = tuning
        .confidence_base
        .saturating_sub(matches.saturating_mul(tuning.confidence_pattern_penalty));

    score = score.saturating_add(marker_bonus(text));
    if text.contains('(') && text.contains(')') {
        score = score.saturating_add(PARENTHETICAL_BONUS);
    }
    score = score.saturating_add(sentence_stats_bonus(text, tuning));

    let score = score
        .max(tuning.confidence_min)
        .min(tuning.confidence_max)
        .clamp(0, 100);
    u8::try_from(score).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_add_up() {
        // filler + expression + connector + starter
        assert_eq!(marker_bonus("Men alltså"), 8 + 7 + 5 + 5);
        assert_eq!(marker_bonus("ingenting här"), 0);
    }

    #[test]
    fn uneven_short_sentences_earn_bonuses() {
        let tuning = Tuning::default();
        let long = vec!["ord"; 20].join(" ");
        let text = format!("Ja. {long}.");
        // variance 90.25, mean 10.5
        assert_eq!(sentence_stats_bonus(&text, &tuning), 8 + 5);
        assert_eq!(sentence_stats_bonus("Ja. Nej.", &tuning), 5 + 3);
    }

    #[test]
    fn unvalidated_bounds_stay_percentages() {
        let tuning = Tuning {
            confidence_min: 250,
            confidence_max: 300,
            ..Tuning::default()
        };
        assert_eq!(estimate(PatternTables::builtin(), &tuning, "Hej."), 100);
    }

    #[test]
    fn score_is_clamped() {
        let tables = PatternTables::builtin();
        let tuning = Tuning::default();
        assert_eq!(estimate(tables, &tuning, "Furthermore thus hence moreover."), 90);
        assert_eq!(estimate(tables, &tuning, "Men alltså (typ)? Ja!"), 99);
    }
}
