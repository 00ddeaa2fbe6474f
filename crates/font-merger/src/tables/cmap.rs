//! cmap table merging

use std::collections::{BTreeMap, btree_map::Entry};

use read_fonts::{FontRef, types::GlyphId};
use skrifa::MetadataProvider;
use write_fonts::tables::cmap::Cmap;

use crate::{Result, glyph_order::GlyphOrder};

/// Merge character maps; the first font to map a code point keeps it.
pub fn merge_cmap(fonts: &[FontRef], order: &GlyphOrder) -> Result<Cmap> {
    let mut mappings: BTreeMap<u32, GlyphId> = BTreeMap::new();
    let mut shadowed = 0usize;

    for (font_idx, font) in fonts.iter().enumerate() {
        for (codepoint, gid) in font.charmap().mappings() {
            match mappings.entry(codepoint) {
                Entry::Vacant(slot) => {
                    slot.insert(order.remap(font_idx, gid).into());
                }
                Entry::Occupied(_) => shadowed += 1,
            }
        }
    }

    if shadowed > 0 {
        log::debug!("{shadowed} code points already mapped by an earlier font were skipped");
    }

    let cmap = Cmap::from_mappings(
        mappings
            .into_iter()
            .filter_map(|(codepoint, gid)| char::from_u32(codepoint).map(|ch| (ch, gid))),
    )?;
    Ok(cmap)
}
