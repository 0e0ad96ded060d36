use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use study_aid::{pdf, qa, rewriter, Answer, Humanizer, RandomSource, RngSource, Tuning};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "study-aid",
    about = "Make formal prose read casually, score it, and answer questions from notes",
    version
)]
struct Cli {
    /// TOML file overriding the default tuning
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for reproducible rewrites
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log filter (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score how machine-like the text reads
    Analyze {
        /// Files to read (stdin if none provided)
        files: Vec<PathBuf>,
    },
    /// Run the full multi-pass rewrite
    Humanize { files: Vec<PathBuf> },
    /// Light sentence-level variation only
    Rewrite { files: Vec<PathBuf> },
    /// Extract the text of a PDF
    Pdf { file: PathBuf },
    /// Answer questions (one per line) from a reference text
    Answer {
        #[arg(long)]
        questions: PathBuf,
        #[arg(long)]
        reference: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct AnswerReport<'a> {
    question: &'a str,
    #[serde(flatten)]
    answer: &'a Answer,
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Named files in order, or stdin when none are given.
fn read_inputs(files: &[PathBuf]) -> Result<Vec<(String, String)>> {
    if files.is_empty() {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("reading stdin")?;
        return Ok(vec![("<stdin>".to_string(), input)]);
    }
    files
        .iter()
        .map(|path| -> Result<(String, String)> {
            Ok((path.display().to_string(), read_file(path)?))
        })
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let tuning = match &cli.config {
        Some(path) => {
            Tuning::load(path).with_context(|| format!("loading config {}", path.display()))?
        }
        None => Tuning::default(),
    };
    let humanizer = Humanizer::new().with_tuning(tuning)?;
    let mut rng: Box<dyn RandomSource> = match cli.seed {
        Some(seed) => Box::new(RngSource::seeded(seed)),
        None => Box::new(RngSource::thread()),
    };

    match cli.command {
        Command::Analyze { files } => {
            for (_, text) in read_inputs(&files)? {
                print_json(&humanizer.analyze(&text))?;
            }
        }
        Command::Humanize { files } => {
            for (name, text) in read_inputs(&files)? {
                let result = humanizer
                    .humanize(&text, rng.as_mut())
                    .with_context(|| format!("humanizing {name}"))?;
                print_json(&result)?;
            }
        }
        Command::Rewrite { files } => {
            for (name, text) in read_inputs(&files)? {
                if text.trim().is_empty() {
                    bail!("{name}: input text is empty");
                }
                println!("{}", rewriter::rewrite(&text, rng.as_mut()));
            }
        }
        Command::Pdf { file } => {
            let text = pdf::extract_file(&file)
                .with_context(|| format!("extracting {}", file.display()))?;
            println!("{text}");
        }
        Command::Answer {
            questions,
            reference,
        } => {
            let questions = qa::parse_questions(&read_file(&questions)?);
            if questions.is_empty() {
                bail!("no questions given");
            }
            let reference = match reference {
                Some(path) => read_file(&path)?,
                None => String::new(),
            };
            let answers = qa::answer(questions.as_slice(), &reference);
            let report: Vec<AnswerReport<'_>> = questions
                .iter()
                .zip(&answers)
                .map(|(question, answer)| AnswerReport { question, answer })
                .collect();
            print_json(&report)?;
        }
    }
    Ok(())
}
