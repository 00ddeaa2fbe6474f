//! Character-set font subsetting around hb-subset.
//!
//! Operates purely on byte slices. The subset keeps `.notdef`, the glyphs
//! mapped from the requested characters and everything those glyphs reach
//! through composites and layout substitutions.
//!
//! # Example
//!
//! ```no_run
//! use typeforge_font_subsetter::Subsetter;
//!
//! let font_data: &[u8] = &[];
//! let subset = Subsetter::new().with_text("Hello\nworld").subset(font_data);
//! ```

use std::collections::BTreeSet;

use hb_subset::{Blob, FontFace, SubsetInput, Tag};

#[derive(Debug, thiserror::Error)]
pub enum SubsetError {
    #[error("failed to set up subsetter: {0}")]
    Setup(String),

    #[error("failed to load font for subsetting: {0}")]
    Load(String),

    #[error("subsetting failed: {0}")]
    Subset(String),
}

pub type Result<T> = std::result::Result<T, SubsetError>;

/// Font subsetter with builder pattern.
///
/// An empty character set is a valid request: the result keeps only `.notdef`.
#[derive(Debug, Default, Clone)]
pub struct Subsetter {
    chars: BTreeSet<char>,
    retain_glyph_names: bool,
    layout_features: Vec<[u8; 4]>,
    drop_tables: Vec<[u8; 4]>,
}

impl Subsetter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every character of `text`, ignoring line breaks.
    pub fn with_text(mut self, text: &str) -> Self {
        self.chars.extend(text.chars().filter(|c| !matches!(c, '\n' | '\r')));
        self
    }

    pub fn with_chars(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.chars.extend(chars);
        self
    }

    /// Sets whether to retain glyph names in the subset.
    pub fn retain_glyph_names(mut self, retain: bool) -> Self {
        self.retain_glyph_names = retain;
        self
    }

    /// Sets the layout features to retain.
    ///
    /// When none are given, hb-subset's default feature set applies.
    pub fn with_layout_features(mut self, features: impl IntoIterator<Item = [u8; 4]>) -> Self {
        self.layout_features = features.into_iter().collect();
        self
    }

    /// Tables removed from the output in addition to hb-subset's defaults.
    pub fn drop_tables(mut self, tables: impl IntoIterator<Item = [u8; 4]>) -> Self {
        self.drop_tables.extend(tables);
        self
    }

    pub fn chars(&self) -> &BTreeSet<char> {
        &self.chars
    }

    /// Subsets the font data and returns the result.
    pub fn subset(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut input = SubsetInput::new().map_err(|e| SubsetError::Setup(e.to_string()))?;

        if self.retain_glyph_names {
            input.flags().retain_glyph_names();
        }

        if !self.layout_features.is_empty() {
            let mut feature_set = input.layout_feature_tag_set();
            feature_set.clear();
            for tag in &self.layout_features {
                feature_set.insert(Tag::new(tag));
            }
        }

        {
            let mut unicode_set = input.unicode_set();
            for c in &self.chars {
                unicode_set.insert(*c);
            }
        }

        if !self.drop_tables.is_empty() {
            let mut drop_tables = input.drop_table_tag_set();
            for table in &self.drop_tables {
                drop_tables.insert(Tag::new(table));
            }
        }

        let blob = Blob::from_bytes(data).map_err(|e| SubsetError::Load(e.to_string()))?;
        let font = FontFace::new(blob).map_err(|e| SubsetError::Load(e.to_string()))?;
        let subset_font = input.subset_font(&font).map_err(|e| SubsetError::Subset(e.to_string()))?;
        let out = subset_font.underlying_blob().to_vec();
        log::debug!("subset to {} characters: {} -> {} bytes", self.chars.len(), data.len(), out.len());
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use skrifa::{FontRef, MetadataProvider, raw::TableProvider};

    use super::*;

    #[test]
    fn text_drops_line_breaks_and_duplicates() {
        let subsetter = Subsetter::new().with_text("ab\nba\r\nc");
        assert_eq!(subsetter.chars().iter().collect::<String>(), "abc");
    }

    #[test]
    fn builder_chain() {
        let subsetter = Subsetter::new()
            .with_chars(['x'])
            .retain_glyph_names(true)
            .with_layout_features([*b"kern", *b"liga"])
            .drop_tables([*b"DSIG"]);
        assert!(subsetter.retain_glyph_names);
        assert_eq!(subsetter.layout_features.len(), 2);
        assert_eq!(subsetter.drop_tables, vec![*b"DSIG"]);
    }

    #[test]
    fn subset_keeps_only_requested_characters() {
        let data = font_test_data::VAZIRMATN_VAR;
        let font = FontRef::new(data).unwrap();
        let mapped: Vec<char> = font
            .charmap()
            .mappings()
            .filter_map(|(cp, _)| char::from_u32(cp))
            .collect();
        assert!(!mapped.is_empty(), "test font maps no characters");

        let keep = mapped[0];
        let subset = Subsetter::new().with_chars([keep]).subset(data).unwrap();
        let subset_font = FontRef::new(&subset).unwrap();
        let charmap = subset_font.charmap();

        assert!(charmap.map(keep).is_some());
        assert_eq!(charmap.mappings().count(), 1);
        let glyphs = |f: &FontRef| f.maxp().unwrap().num_glyphs();
        assert!(glyphs(&subset_font) <= glyphs(&font));
    }

    #[test]
    fn empty_subset_keeps_notdef() {
        let subset = Subsetter::new().subset(font_test_data::VAZIRMATN_VAR).unwrap();
        let font = FontRef::new(&subset).unwrap();
        assert_eq!(font.charmap().mappings().count(), 0);
        assert!(font.maxp().unwrap().num_glyphs() >= 1);
    }
}
