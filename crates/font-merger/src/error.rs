use std::result;

use font_types::Tag;
use read_fonts::ReadError;
use thiserror::Error;
use write_fonts::{BuilderError, error, tables::cmap::CmapConflict};

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("failed to read font: {0}")]
    ReadError(#[from] ReadError),

    #[error("failed to write font: {0}")]
    WriteError(#[from] error::Error),

    #[error("failed to build font: {0}")]
    BuilderError(#[from] BuilderError),

    #[error("failed to build cmap: {0}")]
    CmapError(#[from] CmapConflict),

    #[error("no fonts provided for merging")]
    NoFonts,

    #[error("font {index} has unitsPerEm {actual}, expected {expected}")]
    IncompatibleUnitsPerEm { index: usize, expected: u16, actual: u16 },

    #[error("font {index} has CFF outlines; only TrueType (glyf) fonts can be merged")]
    CffNotSupported { index: usize },

    #[error("font {index} is missing required table '{tag}'")]
    MissingTable { index: usize, tag: Tag },

    #[error("merged font would have {0} glyphs, more than the 65535 allowed")]
    TooManyGlyphs(usize),
}

pub type Result<T> = result::Result<T, MergeError>;
