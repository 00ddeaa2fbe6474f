use std::result;

use read_fonts::ReadError;
use write_fonts::{BuilderError, error};

/// Error types for weight instancing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to parse font: {0}")]
    Parse(#[from] ReadError),

    #[error("not a variable font (no fvar table)")]
    NotVariableFont,

    #[error("no weight axis")]
    NoWeightAxis,

    #[error("CFF2 outlines are not supported")]
    Cff2Unsupported,

    #[error("no glyf table")]
    NoGlyf,

    #[error("no gvar table")]
    NoGvar,

    #[error("failed to build font: {0}")]
    Build(#[from] BuilderError),

    #[error("failed to write table: {0}")]
    Write(#[from] error::Error),
}

pub type Result<T> = result::Result<T, Error>;
