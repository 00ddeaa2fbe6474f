//! Glyph order of the merged font.
//!
//! Every glyph of every input font is kept, font after font, so a glyph of
//! font `i` moves to `offset(i) + gid`. The first font's glyph ids never change.
//! Names are made unique by suffixing later duplicates with `#1`, `#2`, and so on.

use std::{
    collections::{HashMap, HashSet},
    ops::Range,
};

use read_fonts::{
    FontRef, TableProvider,
    tables::post::Post,
    types::{GlyphId, GlyphId16},
};

use crate::{MergeError, Result};

#[derive(Debug, Clone)]
pub struct GlyphOrder {
    names: Vec<String>,
    /// Start of each font's glyphs, plus one trailing entry for the total.
    offsets: Vec<usize>,
}

impl GlyphOrder {
    pub fn compute(fonts: &[FontRef]) -> Result<Self> {
        let mut names = Vec::new();
        let mut offsets = Vec::with_capacity(fonts.len() + 1);
        let mut seen: HashSet<String> = HashSet::new();
        let mut next_suffix: HashMap<String, usize> = HashMap::new();

        for font in fonts {
            offsets.push(names.len());
            for name in source_names(font)? {
                let unique = if seen.contains(&name) {
                    let counter = next_suffix.entry(name.clone()).or_insert(1);
                    loop {
                        let candidate = format!("{name}#{counter}");
                        *counter += 1;
                        if !seen.contains(&candidate) {
                            break candidate;
                        }
                    }
                } else {
                    name
                };
                seen.insert(unique.clone());
                names.push(unique);
            }
        }
        offsets.push(names.len());

        if names.len() > usize::from(u16::MAX) {
            return Err(MergeError::TooManyGlyphs(names.len()));
        }
        Ok(Self { names, offsets })
    }

    /// Glyph names in merged order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn total_glyphs(&self) -> u16 {
        // bounded by `compute`
        self.names.len() as u16
    }

    /// Merged glyph ids occupied by font `font_idx`.
    pub fn font_range(&self, font_idx: usize) -> Range<usize> {
        self.offsets[font_idx]..self.offsets[font_idx + 1]
    }

    /// Merged id of glyph `gid` of font `font_idx`.
    pub fn remap(&self, font_idx: usize, gid: GlyphId) -> GlyphId16 {
        let merged = self.offsets[font_idx] + gid.to_u32() as usize;
        GlyphId16::new(merged.min(usize::from(u16::MAX)) as u16)
    }
}

/// Names from `post`, falling back to `glyphNNNNN` for unnamed glyphs.
fn source_names(font: &FontRef) -> Result<Vec<String>> {
    let num_glyphs = font.maxp()?.num_glyphs();
    let post = font.post().ok();
    Ok((0..num_glyphs)
        .map(|gid| {
            post.as_ref()
                .and_then(|p| glyph_name(p, gid))
                .unwrap_or_else(|| format!("glyph{gid:05}"))
        })
        .collect())
}

fn glyph_name(post: &Post, gid: u16) -> Option<String> {
    post.glyph_name(GlyphId16::new(gid)).map(str::to_owned)
}
