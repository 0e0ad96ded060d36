use std::collections::HashSet;

use serde::Serialize;

use crate::tables::PatternTables;
use crate::text::{sentence_fragments, word_count};
use crate::tuning::Tuning;

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub detected_pattern_count: usize,
    pub human_score: i32,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionRisk {
    Low,
    Medium,
    High,
    Critical,
}

impl Analysis {
    pub fn detection_risk(&self) -> DetectionRisk {
        match self.human_score {
            s if s >= 8 => DetectionRisk::Low,
            s if s >= 6 => DetectionRisk::Medium,
            s if s >= 4 => DetectionRisk::High,
            _ => DetectionRisk::Critical,
        }
    }

    /// Rough percentage shown before any rewrite has run.
    pub fn preliminary_confidence(&self) -> i32 {
        (self.human_score * 8).max(20)
    }
}

// ---------------------------------------------------------------------------
// Penalties
// ---------------------------------------------------------------------------

fn formality_penalty(sentences: &[&str], tuning: &Tuning) -> i32 {
    let total_words: usize = sentences.iter().map(|s| word_count(s)).sum();
    let avg = total_words as f64 / sentences.len() as f64;
    if avg > tuning.formal_heavy_avg_words {
        tuning.formal_heavy_penalty
    } else if avg > tuning.formal_mild_avg_words {
        tuning.formal_mild_penalty
    } else {
        0
    }
}

fn repetition_penalty(sentences: &[&str], tuning: &Tuning) -> i32 {
    let starts: Vec<String> = sentences
        .iter()
        .filter_map(|s| s.split_whitespace().next())
        .map(str::to_lowercase)
        .collect();
    let unique: HashSet<&str> = starts.iter().map(String::as_str).collect();
    if (unique.len() as f64) < starts.len() as f64 * tuning.repetition_ratio {
        tuning.repetition_penalty
    } else {
        0
    }
}

fn suggestions(patterns: usize, formality: i32, repetition: i32) -> Vec<String> {
    let mut out = Vec::new();
    if patterns > 0 {
        out.push("AI-typical phrases".to_string());
    }
    if formality > 0 {
        out.push("Formal tone".to_string());
    }
    if repetition > 0 {
        out.push("Repetitive structure".to_string());
    }
    if out.is_empty() {
        out.push("Already fairly natural".to_string());
    }
    out
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn analyze(tables: &PatternTables, tuning: &Tuning, text: &str) -> Analysis {
    let sentences = sentence_fragments(text);
    if sentences.is_empty() {
        return Analysis {
            detected_pattern_count: 0,
            human_score: tuning.human_score_max,
            suggestions: vec!["No patterns detected".to_string()],
        };
    }

    let patterns = tables.detection_count(text);
    let formality = formality_penalty(&sentences, tuning);
    let repetition = repetition_penalty(&sentences, tuning);

    let pattern_penalty = i32::try_from(patterns).unwrap_or(i32::MAX);
    let human_score = tuning
        .human_score_max
        .saturating_sub(pattern_penalty)
        .saturating_sub(formality)
        .saturating_sub(repetition)
        .max(tuning.human_score_min)
        .min(tuning.human_score_max);

    Analysis {
        detected_pattern_count: patterns,
        human_score,
        suggestions: suggestions(patterns, formality, repetition),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_score(human_score: i32) -> Analysis {
        Analysis {
            detected_pattern_count: 0,
            human_score,
            suggestions: Vec::new(),
        }
    }

    #[test]
    fn risk_levels() {
        assert_eq!(with_score(10).detection_risk(), DetectionRisk::Low);
        assert_eq!(with_score(8).detection_risk(), DetectionRisk::Low);
        assert_eq!(with_score(7).detection_risk(), DetectionRisk::Medium);
        assert_eq!(with_score(4).detection_risk(), DetectionRisk::High);
        assert_eq!(with_score(3).detection_risk(), DetectionRisk::Critical);
    }

    #[test]
    fn preliminary_confidence_has_a_floor() {
        assert_eq!(with_score(10).preliminary_confidence(), 80);
        assert_eq!(with_score(1).preliminary_confidence(), 20);
    }

    #[test]
    fn inverted_bounds_do_not_panic() {
        let tuning = Tuning {
            human_score_min: 11,
            ..Tuning::default()
        };
        let result = analyze(PatternTables::builtin(), &tuning, "Hej där.");
        assert_eq!(result.human_score, 10);
    }

    #[test]
    fn formality_penalties_are_exclusive() {
        let tuning = Tuning::default();
        let heavy = vec!["ord"; 21].join(" ");
        let mild = vec!["ord"; 16].join(" ");
        assert_eq!(formality_penalty(&[heavy.as_str()], &tuning), 2);
        assert_eq!(formality_penalty(&[mild.as_str()], &tuning), 1);
        assert_eq!(formality_penalty(&["kort mening"], &tuning), 0);
    }
}
