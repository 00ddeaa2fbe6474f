//! hhea table merging

use read_fonts::{FontRef, TableProvider};
use write_fonts::{
    from_obj::ToOwnedTable,
    tables::hhea::Hhea,
    types::{FWord, UfWord},
};

use super::read_all;
use crate::{
    Result,
    strategies::{first, max, min},
};

/// Merge `hhea`; the caret fields come from the first font.
pub fn merge_hhea(fonts: &[FontRef], number_of_h_metrics: u16) -> Result<Hhea> {
    let tables = read_all(fonts, |f| f.hhea())?;
    let mut hhea: Hhea = first(&tables)?.to_owned_table();

    hhea.ascender = FWord::new(max(tables.iter().map(|t| t.ascender().to_i16()))?);
    hhea.descender = FWord::new(min(tables.iter().map(|t| t.descender().to_i16()))?);
    hhea.line_gap = FWord::new(max(tables.iter().map(|t| t.line_gap().to_i16()))?);
    hhea.advance_width_max = UfWord::new(max(tables.iter().map(|t| t.advance_width_max().to_u16()))?);
    hhea.min_left_side_bearing =
        FWord::new(min(tables.iter().map(|t| t.min_left_side_bearing().to_i16()))?);
    hhea.min_right_side_bearing =
        FWord::new(min(tables.iter().map(|t| t.min_right_side_bearing().to_i16()))?);
    hhea.x_max_extent = FWord::new(max(tables.iter().map(|t| t.x_max_extent().to_i16()))?);
    hhea.number_of_h_metrics = number_of_h_metrics;
    Ok(hhea)
}
