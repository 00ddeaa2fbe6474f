//! maxp table merging

use read_fonts::{FontRef, TableProvider, tables::maxp::Maxp as ReadMaxp};
use write_fonts::{from_obj::ToOwnedTable, tables::maxp::Maxp};

use super::read_all;
use crate::{Result, strategies::first};

/// Merge `maxp`.
///
/// Limits that describe outlines take the maximum across fonts. Limits that
/// describe the font program (storage, function and instruction definitions,
/// instruction size) stay with the first font, whose `fpgm` and `prep` are kept.
pub fn merge_maxp(fonts: &[FontRef], num_glyphs: u16) -> Result<Maxp> {
    let tables = read_all(fonts, |f| f.maxp())?;
    let mut maxp: Maxp = first(&tables)?.to_owned_table();
    let largest = |field: fn(&ReadMaxp) -> Option<u16>| tables.iter().filter_map(field).max();

    maxp.num_glyphs = num_glyphs;
    if maxp.max_points.is_some() {
        maxp.max_points = largest(|t| t.max_points());
        maxp.max_contours = largest(|t| t.max_contours());
        maxp.max_composite_points = largest(|t| t.max_composite_points());
        maxp.max_composite_contours = largest(|t| t.max_composite_contours());
        maxp.max_zones = largest(|t| t.max_zones());
        maxp.max_twilight_points = largest(|t| t.max_twilight_points());
        maxp.max_stack_elements = largest(|t| t.max_stack_elements());
        maxp.max_component_elements = largest(|t| t.max_component_elements());
        maxp.max_component_depth = largest(|t| t.max_component_depth());
    }
    Ok(maxp)
}
