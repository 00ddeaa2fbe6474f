use std::{io, result};

use read_fonts::ReadError;

/// Error types for flavor detection and conversion.
#[derive(Debug, thiserror::Error)]
pub enum FlavorError {
    #[error("unrecognized font signature {0:#010x}")]
    UnknownSignature(u32),

    #[error("font collections are not supported")]
    Collection,

    #[error("data too short: expected at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("malformed {format} data: {reason}")]
    Malformed { format: &'static str, reason: String },

    #[error("failed to parse sfnt: {0}")]
    Parse(#[from] ReadError),

    #[error("zlib stream error: {0}")]
    Zlib(#[source] io::Error),

    #[error("WOFF2 support is not available (rebuild with the `woff2` feature)")]
    Woff2Unavailable,

    #[error("brotli decompression failed: {0}")]
    Brotli(#[source] io::Error),

    #[error("WOFF2 encoding failed: {0}")]
    Woff2Encode(String),

    #[error("WOFF2 decoding failed: {0}")]
    Woff2Decode(String),

    #[error("{format} data decompresses to more than {limit} bytes")]
    DecompressionLimit { format: &'static str, limit: u64 },
}

impl FlavorError {
    pub(crate) fn malformed(format: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed { format, reason: reason.into() }
    }
}

pub type Result<T> = result::Result<T, FlavorError>;
