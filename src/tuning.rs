use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Hyperparameters
// ---------------------------------------------------------------------------

/// Thresholds, chances and offsets used by the analyzer, the pipeline stages
/// and the confidence estimator. Chances are probabilities in `[0, 1]`;
/// offsets are fractions of a sentence's word count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // Analyzer
    pub formal_heavy_avg_words: f64,
    pub formal_mild_avg_words: f64,
    pub formal_heavy_penalty: i32,
    pub formal_mild_penalty: i32,
    pub repetition_ratio: f64,
    pub repetition_penalty: i32,
    pub human_score_min: i32,
    pub human_score_max: i32,

    // Restructuring
    pub split_min_words: usize,
    pub split_offsets: [f64; 2],
    pub hedge_min_words: usize,
    pub hedge_offsets: [f64; 2],
    pub hedge_chance: f64,
    pub self_correction_min_words: usize,
    pub self_correction_chance: f64,
    pub aside_chance: f64,
    pub aside_offset: f64,

    // Natural language
    pub short_text_chars: usize,
    pub long_sentence_chars: usize,
    pub long_sentence_split_chance: f64,
    pub starter_max_chars: usize,
    pub colon_max_chars: usize,

    // Final pass
    pub final_filler_chance: f64,
    pub final_connector_chance: f64,
    pub final_aside_chance: f64,

    // Confidence
    pub confidence_base: i32,
    pub confidence_pattern_penalty: i32,
    pub confidence_min: i32,
    pub confidence_max: i32,
    pub confidence_variance_threshold: f64,
    pub confidence_short_mean: f64,
    pub confidence_very_short_mean: f64,
}

pub const DEFAULT_TUNING: Tuning = Tuning {
    formal_heavy_avg_words: 20.0,
    formal_mild_avg_words: 15.0,
    formal_heavy_penalty: 2,
    formal_mild_penalty: 1,
    repetition_ratio: 0.7,
    repetition_penalty: 2,
    human_score_min: 1,
    human_score_max: 10,

    split_min_words: 10,
    split_offsets: [0.4, 0.7],
    hedge_min_words: 6,
    hedge_offsets: [0.3, 0.6],
    hedge_chance: 0.6,
    self_correction_min_words: 4,
    self_correction_chance: 0.3,
    aside_chance: 0.2,
    aside_offset: 0.7,

    short_text_chars: 150,
    long_sentence_chars: 100,
    long_sentence_split_chance: 0.2,
    starter_max_chars: 80,
    colon_max_chars: 120,

    final_filler_chance: 0.2,
    final_connector_chance: 0.3,
    final_aside_chance: 0.1,

    confidence_base: 95,
    confidence_pattern_penalty: 15,
    confidence_min: 90,
    confidence_max: 99,
    confidence_variance_threshold: 25.0,
    confidence_short_mean: 12.0,
    confidence_very_short_mean: 8.0,
};

impl Default for Tuning {
    fn default() -> Self {
        DEFAULT_TUNING
    }
}

impl Tuning {
    /// Parse a (possibly partial) TOML override; missing keys keep their
    /// default values.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let tuning: Tuning = toml::from_str(source)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        let unit = [
            ("repetition_ratio", self.repetition_ratio),
            ("split_offsets[0]", self.split_offsets[0]),
            ("split_offsets[1]", self.split_offsets[1]),
            ("hedge_offsets[0]", self.hedge_offsets[0]),
            ("hedge_offsets[1]", self.hedge_offsets[1]),
            ("hedge_chance", self.hedge_chance),
            ("self_correction_chance", self.self_correction_chance),
            ("aside_chance", self.aside_chance),
            ("aside_offset", self.aside_offset),
            ("long_sentence_split_chance", self.long_sentence_split_chance),
            ("final_filler_chance", self.final_filler_chance),
            ("final_connector_chance", self.final_connector_chance),
            ("final_aside_chance", self.final_aside_chance),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.human_score_min > self.human_score_max {
            return Err(Error::Config(format!(
                "human_score_min ({}) exceeds human_score_max ({})",
                self.human_score_min, self.human_score_max
            )));
        }
        if self.confidence_min > self.confidence_max {
            return Err(Error::Config(format!(
                "confidence_min ({}) exceeds confidence_max ({})",
                self.confidence_min, self.confidence_max
            )));
        }
        if !(0..=100).contains(&self.confidence_min) || !(0..=100).contains(&self.confidence_max) {
            return Err(Error::Config(
                "confidence bounds must be percentages".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(DEFAULT_TUNING.validate().is_ok());
        assert_eq!(Tuning::from_toml_str("").unwrap().hedge_chance, 0.6);
    }

    #[test]
    fn offsets_must_be_fractions() {
        let err = Tuning::from_toml_str("split_offsets = [0.4, 1.7]").unwrap_err();
        assert!(err.to_string().contains("split_offsets[1]"));
    }

    #[test]
    fn confidence_bounds_must_be_percentages() {
        let err = Tuning::from_toml_str("confidence_max = 150").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
