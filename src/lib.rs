//! Rewrite formal, machine-sounding prose into casual Swedish, score how
//! machine-like a text reads, and answer questions from a reference text.

pub mod analyzer;
pub mod confidence;
pub mod error;
pub mod fallback;
pub mod pdf;
pub mod pipeline;
pub mod qa;
pub mod random;
pub mod rewriter;
pub mod stages;
pub mod tables;
pub mod tuning;

mod text;

pub use analyzer::{Analysis, DetectionRisk};
pub use error::{Error, Result};
pub use pipeline::{FnStage, Humanized, Humanizer, Pipeline, Stage};
pub use qa::Answer;
pub use random::{ConstantRandom, RandomSource, RngSource};
pub use stages::{Change, ChangeKind, StageContext, StageOutput};
pub use tables::PatternTables;
pub use tuning::{Tuning, DEFAULT_TUNING};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Score `text` with the built-in tables and default tuning.
pub fn analyze(text: &str) -> Analysis {
    analyzer::analyze(PatternTables::builtin(), &DEFAULT_TUNING, text)
}

/// Humanize `text` with the built-in tables and default tuning.
pub fn humanize(text: &str, rng: &mut dyn RandomSource) -> Result<Humanized> {
    Humanizer::new().humanize(text, rng)
}
