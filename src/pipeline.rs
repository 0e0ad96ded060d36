use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analyzer::{self, Analysis};
use crate::confidence;
use crate::error::{Error, Result};
use crate::fallback;
use crate::random::RandomSource;
use crate::stages::{self, Change, ChangeKind, StageContext, StageOutput, PASS_COUNT};
use crate::tables::PatternTables;
use crate::text::is_blank;
use crate::tuning::Tuning;

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Humanized {
    pub humanized_text: String,
    pub changes: Vec<Change>,
}

impl Humanized {
    pub fn used_fallback(&self) -> bool {
        self.changes
            .iter()
            .any(|c| matches!(c.kind, ChangeKind::FallbackUsed | ChangeKind::LastResort))
    }
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(
        &self,
        ctx: &StageContext<'_>,
        text: &str,
        rng: &mut dyn RandomSource,
    ) -> Result<StageOutput>;
}

pub type StageFn = fn(&StageContext<'_>, &str, &mut dyn RandomSource) -> Result<StageOutput>;

/// A stage backed by a plain function.
#[derive(Clone, Copy)]
pub struct FnStage {
    name: &'static str,
    run: StageFn,
}

impl FnStage {
    pub const fn new(name: &'static str, run: StageFn) -> Self {
        Self { name, run }
    }
}

impl Stage for FnStage {
    fn name(&self) -> &'static str {
        self.name
    }

    fn apply(
        &self,
        ctx: &StageContext<'_>,
        text: &str,
        rng: &mut dyn RandomSource,
    ) -> Result<StageOutput> {
        (self.run)(ctx, text, rng)
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Runs `stages` once per pass, in order, then `finale` once.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
    finale: Vec<Box<dyn Stage>>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl Pipeline {
    pub fn standard() -> Self {
        Self {
            stages: vec![
                Box::new(FnStage::new("pattern_removal", stages::pattern_removal)),
                Box::new(FnStage::new("restructure", stages::restructure)),
                Box::new(FnStage::new("optimize", stages::optimize)),
                Box::new(FnStage::new("natural_language", stages::natural_language)),
            ],
            finale: vec![Box::new(FnStage::new("final_pass", stages::final_pass))],
        }
    }

    /// Append a stage that runs in every pass after the existing ones.
    pub fn with_stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages
            .iter()
            .chain(self.finale.iter())
            .map(|s| s.name())
            .collect()
    }

    pub fn run(
        &self,
        tables: &PatternTables,
        tuning: &Tuning,
        input: &str,
        rng: &mut dyn RandomSource,
    ) -> Result<(String, Vec<Change>)> {
        let mut text = input.to_string();
        let mut changes = Vec::new();

        for pass in 1..=PASS_COUNT {
            let ctx = StageContext {
                tables,
                tuning,
                pass,
            };
            for stage in &self.stages {
                text = apply_stage(stage.as_ref(), &ctx, &text, rng, &mut changes)?;
            }
        }

        let ctx = StageContext {
            tables,
            tuning,
            pass: PASS_COUNT,
        };
        for stage in &self.finale {
            text = apply_stage(stage.as_ref(), &ctx, &text, rng, &mut changes)?;
        }

        Ok((text, changes))
    }
}

fn apply_stage(
    stage: &dyn Stage,
    ctx: &StageContext<'_>,
    text: &str,
    rng: &mut dyn RandomSource,
    changes: &mut Vec<Change>,
) -> Result<String> {
    let out = stage.apply(ctx, text, rng)?;
    debug!(
        pass = ctx.pass,
        stage = stage.name(),
        edits = out.edits,
        "stage complete"
    );
    changes.extend(out.changes);
    Ok(out.text)
}

// ---------------------------------------------------------------------------
// Humanizer
// ---------------------------------------------------------------------------

pub struct Humanizer<'a> {
    tables: &'a PatternTables,
    tuning: Tuning,
    pipeline: Pipeline,
}

impl Default for Humanizer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Humanizer<'static> {
    pub fn new() -> Self {
        Self::with_tables(PatternTables::builtin())
    }
}

impl<'a> Humanizer<'a> {
    pub fn with_tables(tables: &'a PatternTables) -> Self {
        Self {
            tables,
            tuning: Tuning::default(),
            pipeline: Pipeline::standard(),
        }
    }

    /// Replace the default tuning. Rejects tuning that fails
    /// [`Tuning::validate`].
    pub fn with_tuning(mut self, tuning: Tuning) -> Result<Self> {
        tuning.validate()?;
        self.tuning = tuning;
        Ok(self)
    }

    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn analyze(&self, text: &str) -> Analysis {
        analyzer::analyze(self.tables, &self.tuning, text)
    }

    pub fn estimate(&self, text: &str) -> u8 {
        confidence::estimate(self.tables, &self.tuning, text)
    }

    /// Run the pipeline without the fallback chain.
    pub fn transform(&self, input: &str, rng: &mut dyn RandomSource) -> Result<Humanized> {
        let (text, mut changes) = self.pipeline.run(self.tables, &self.tuning, input, rng)?;
        let text = text.trim().to_string();
        if is_blank(&text) {
            return Err(Error::EmptyOutput);
        }

        let confidence = self.estimate(&text);
        changes.push(Change::new(
            ChangeKind::Confidence,
            None,
            format!("Final confidence estimate: {confidence}%"),
        ));
        info!(changes = changes.len(), confidence, "humanized text");

        Ok(Humanized {
            humanized_text: text,
            changes,
        })
    }

    /// Rewrite `input`. Blank input is rejected; anything else always yields
    /// some text, falling back to simpler rewrites if the pipeline fails.
    pub fn humanize(&self, input: &str, rng: &mut dyn RandomSource) -> Result<Humanized> {
        if input.trim().is_empty() {
            return Err(Error::EmptyInput);
        }
        match self.transform(input, rng) {
            Ok(humanized) => Ok(humanized),
            Err(err) => {
                warn!(error = %err, "pipeline failed, using fallback rewrite");
                Ok(fallback::humanize(self.tables, input))
            }
        }
    }
}
