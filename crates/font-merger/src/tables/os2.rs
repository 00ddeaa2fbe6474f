//! OS/2 table merging

use read_fonts::{FontRef, TableProvider, tables::os2::Os2 as ReadOs2};
use write_fonts::{
    from_obj::ToOwnedTable,
    tables::os2::{Os2, SelectionFlags},
};

use crate::{
    Result,
    strategies::{Bit, max, merge_bits, min, union},
};

const SELECTION_RULES: [Bit; 16] = [
    Bit::All, // italic
    Bit::Any, // underscore
    Bit::Any, // negative
    Bit::Any, // outlined
    Bit::Any, // strikeout
    Bit::All, // bold
    Bit::All, // regular
    Bit::All, // use typo metrics
    Bit::All, // wws
    Bit::All, // oblique
    Bit::First,
    Bit::First,
    Bit::First,
    Bit::First,
    Bit::First,
    Bit::First,
];

/// Merge `OS/2` over the fonts that have one.
///
/// Returns `None` when the first font has no `OS/2`; its version, vendor,
/// classification and `xAvgCharWidth` carry over unchanged.
pub fn merge_os2(fonts: &[FontRef]) -> Result<Option<Os2>> {
    let Some(Ok(source)) = fonts.first().map(|f| f.os2()) else {
        return Ok(None);
    };
    let tables: Vec<ReadOs2> = fonts.iter().filter_map(|f| f.os2().ok()).collect();
    let mut os2: Os2 = source.to_owned_table();

    os2.s_typo_ascender = max(tables.iter().map(|t| t.s_typo_ascender()))?;
    os2.s_typo_descender = min(tables.iter().map(|t| t.s_typo_descender()))?;
    os2.s_typo_line_gap = max(tables.iter().map(|t| t.s_typo_line_gap()))?;
    os2.us_win_ascent = max(tables.iter().map(|t| t.us_win_ascent()))?;
    os2.us_win_descent = max(tables.iter().map(|t| t.us_win_descent()))?;
    os2.us_first_char_index = min(tables.iter().map(|t| t.us_first_char_index()))?;
    os2.us_last_char_index = max(tables.iter().map(|t| t.us_last_char_index()))?;

    let selection: Vec<u16> = tables.iter().map(|t| t.fs_selection().bits()).collect();
    os2.fs_selection = SelectionFlags::from_bits_truncate(merge_bits(&selection, &SELECTION_RULES)?);

    os2.ul_unicode_range_1 = union(tables.iter().map(|t| t.ul_unicode_range_1())).unwrap_or(0);
    os2.ul_unicode_range_2 = union(tables.iter().map(|t| t.ul_unicode_range_2())).unwrap_or(0);
    os2.ul_unicode_range_3 = union(tables.iter().map(|t| t.ul_unicode_range_3())).unwrap_or(0);
    os2.ul_unicode_range_4 = union(tables.iter().map(|t| t.ul_unicode_range_4())).unwrap_or(0);

    // version-gated fields stay absent when the first font's version lacks them
    if os2.ul_code_page_range_1.is_some() {
        os2.ul_code_page_range_1 = union(tables.iter().filter_map(|t| t.ul_code_page_range_1()));
        os2.ul_code_page_range_2 = union(tables.iter().filter_map(|t| t.ul_code_page_range_2()));
    }
    if os2.sx_height.is_some() {
        os2.sx_height = tables.iter().filter_map(|t| t.sx_height()).max();
        os2.s_cap_height = tables.iter().filter_map(|t| t.s_cap_height()).max();
    }
    Ok(Some(os2))
}
