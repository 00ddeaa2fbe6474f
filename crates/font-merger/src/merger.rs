//! Merge pipeline

use font_types::Tag;
use read_fonts::{FontRef, TableProvider};
use write_fonts::FontBuilder;

use crate::{
    MergeError, Result,
    glyph_order::GlyphOrder,
    tables::{
        cmap::merge_cmap, glyf::merge_glyf, head::merge_head, hhea::merge_hhea, hmtx::merge_hmtx,
        maxp::merge_maxp, os2::merge_os2, post::merge_post,
    },
};

const CFF: Tag = Tag::new(b"CFF ");
const CFF2: Tag = Tag::new(b"CFF2");

/// Tables rebuilt from every font.
const MERGED_TABLES: [Tag; 10] = [
    Tag::new(b"head"),
    Tag::new(b"hhea"),
    Tag::new(b"maxp"),
    Tag::new(b"OS/2"),
    Tag::new(b"post"),
    Tag::new(b"cmap"),
    Tag::new(b"hmtx"),
    Tag::new(b"glyf"),
    Tag::new(b"loca"),
    Tag::new(b"DSIG"),
];

/// Tables indexed by glyph id or tied to the source outlines; they would
/// not match the merged glyph set.
const INVALIDATED_TABLES: [Tag; 14] = [
    Tag::new(b"hdmx"),
    Tag::new(b"LTSH"),
    Tag::new(b"VDMX"),
    Tag::new(b"vhea"),
    Tag::new(b"vmtx"),
    Tag::new(b"VORG"),
    Tag::new(b"fvar"),
    Tag::new(b"avar"),
    Tag::new(b"gvar"),
    Tag::new(b"cvar"),
    Tag::new(b"HVAR"),
    Tag::new(b"VVAR"),
    Tag::new(b"MVAR"),
    Tag::new(b"STAT"),
];

/// Layout tables; only the first font's survive the merge.
const LAYOUT_TABLES: [Tag; 6] = [
    Tag::new(b"GDEF"),
    Tag::new(b"GSUB"),
    Tag::new(b"GPOS"),
    Tag::new(b"BASE"),
    Tag::new(b"JSTF"),
    Tag::new(b"kern"),
];

/// Merge fonts given as raw sfnt bytes.
///
/// Fonts earlier in `font_data` take precedence: they win code points mapped by
/// several fonts and supply every table that is not merged field by field.
pub fn merge_fonts_bytes(font_data: &[&[u8]]) -> Result<Vec<u8>> {
    let fonts = font_data
        .iter()
        .map(|data| FontRef::new(data))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    merge_fonts(&fonts)
}

/// Merge parsed fonts. See [`merge_fonts_bytes`].
pub fn merge_fonts(fonts: &[FontRef]) -> Result<Vec<u8>> {
    let (primary, _) = fonts.split_first().ok_or(MergeError::NoFonts)?;
    check_compatible(fonts)?;

    let order = GlyphOrder::compute(fonts)?;
    log::info!("merging {} fonts, {} glyphs", fonts.len(), order.total_glyphs());

    let (glyf, loca, loca_format) = merge_glyf(fonts, &order)?;
    let hmtx = merge_hmtx(fonts, &order)?;
    let number_of_h_metrics = hmtx.h_metrics.len() as u16;

    let mut builder = FontBuilder::new();
    builder.add_table(&merge_head(fonts, loca_format)?)?;
    builder.add_table(&merge_hhea(fonts, number_of_h_metrics)?)?;
    builder.add_table(&merge_maxp(fonts, order.total_glyphs())?)?;
    if let Some(os2) = merge_os2(fonts)? {
        builder.add_table(&os2)?;
    }
    builder.add_table(&merge_post(fonts, &order)?)?;
    builder.add_table(&merge_cmap(fonts, &order)?)?;
    builder.add_table(&hmtx)?;
    builder.add_table(&glyf)?;
    builder.add_table(&loca)?;

    for record in primary.table_directory.table_records() {
        let tag = record.tag();
        if MERGED_TABLES.contains(&tag) || builder.contains(tag) {
            continue;
        }
        if INVALIDATED_TABLES.contains(&tag) {
            log::warn!("dropping '{tag}', it does not fit the merged glyph set");
            continue;
        }
        if let Some(data) = primary.table_data(tag) {
            builder.add_raw(tag, data);
        }
    }

    for (index, font) in fonts.iter().enumerate().skip(1) {
        for tag in LAYOUT_TABLES.iter().filter(|tag| font.table_data(**tag).is_some()) {
            log::warn!("dropping '{tag}' of font {index}; layout comes from the first font only");
        }
    }

    Ok(builder.build())
}

/// All fonts need TrueType outlines and a shared `unitsPerEm`.
fn check_compatible(fonts: &[FontRef]) -> Result<()> {
    let mut expected = None;
    for (index, font) in fonts.iter().enumerate() {
        if font.table_data(CFF).is_some() || font.table_data(CFF2).is_some() {
            return Err(MergeError::CffNotSupported { index });
        }
        let units_per_em = font.head()?.units_per_em();
        match expected {
            None => expected = Some(units_per_em),
            Some(expected) if expected != units_per_em => {
                return Err(MergeError::IncompatibleUnitsPerEm { index, expected, actual: units_per_em });
            }
            Some(_) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_fonts() {
        assert!(matches!(merge_fonts_bytes(&[]), Err(MergeError::NoFonts)));
    }

    #[test]
    fn rejects_cff2() {
        let result = merge_fonts_bytes(&[font_test_data::VAZIRMATN_VAR, font_test_data::CANTARELL_VF_TRIMMED]);
        assert!(matches!(result, Err(MergeError::CffNotSupported { index: 1 })));
    }

    #[test]
    fn rejects_garbage() {
        let result = merge_fonts_bytes(&[b"definitely not a font"]);
        assert!(matches!(result, Err(MergeError::ReadError(_))));
    }
}
