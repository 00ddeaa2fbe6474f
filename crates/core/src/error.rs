use std::path::PathBuf;

use thiserror::Error;

/// Problems caught before any font is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no font file selected")]
    EmptySelection,

    #[error("at least 2 font files are required for merging, got {0}")]
    TooFewMergeInputs(usize),

    #[error("invalid weight '{0}': enter a whole number")]
    InvalidWeight(String),

    #[error("weight {0} is outside the range 100..=900")]
    WeightOutOfRange(u32),

    #[error("weight {0} is already selected")]
    DuplicateWeight(u16),

    #[error("no weights selected")]
    NoWeights,

    #[error("unsupported file: {}", .0.display())]
    UnsupportedFile(PathBuf),

    #[error("not a variable font: {}", .0.display())]
    NotVariableFont(PathBuf),

    #[error("unknown output format '{0}' (expected ttf, otf, woff or woff2)")]
    UnknownFormat(String),

    #[error("no output destination given")]
    MissingOutput,
}
