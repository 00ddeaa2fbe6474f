//! # Font merger
//!
//! Merge TrueType fonts into a single font. Glyphs of every input are kept,
//! in input order, and earlier fonts take precedence wherever fonts conflict.
//!
//! ## Example
//!
//! ```no_run
//! use typeforge_font_merger::merge_fonts_bytes;
//!
//! let latin = std::fs::read("latin.ttf").unwrap();
//! let arabic = std::fs::read("arabic.ttf").unwrap();
//! let merged = merge_fonts_bytes(&[&latin, &arabic]).unwrap();
//! std::fs::write("merged.ttf", merged).unwrap();
//! ```

mod error;
mod glyph_order;
mod merger;
mod strategies;
mod tables;

pub use error::{MergeError, Result};
pub use glyph_order::GlyphOrder;
pub use merger::{merge_fonts, merge_fonts_bytes};
