use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Blank input is rejected before any transformation runs.
    #[error("input text is empty")]
    EmptyInput,

    #[error("transformation produced empty text")]
    EmptyOutput,

    #[error("no pass plan for pass {0}")]
    UnknownPass(u8),

    #[error("cannot choose from an empty list")]
    EmptyChoice,

    #[error("invalid pattern table: {0}")]
    Table(String),

    #[error("invalid tuning: {0}")]
    Config(String),

    #[error("could not extract text from PDF: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
