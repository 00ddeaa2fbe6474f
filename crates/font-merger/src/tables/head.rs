//! head table merging

use read_fonts::{FontRef, TableProvider};
use write_fonts::{
    from_obj::ToOwnedTable,
    tables::{
        head::{Flags, Head, MacStyle},
        loca::LocaFormat,
    },
    types::Fixed,
};

use super::read_all;
use crate::{
    Result,
    strategies::{Bit, first, max, merge_bits, min},
};

const FLAGS_RULES: [Bit; 16] = [
    Bit::Any,   // baseline at y=0
    Bit::Any,   // left sidebearing at x=0
    Bit::First, // instructions depend on point size
    Bit::Any,   // force ppem to integer
    Bit::Any,   // instructions may alter advance width
    Bit::First,
    Bit::First,
    Bit::First,
    Bit::First,
    Bit::First,
    Bit::First,
    Bit::Any, // lossless font data
    Bit::Any, // converted
    Bit::Any, // optimized for ClearType
    Bit::Any, // last resort
    Bit::First,
];

const MAC_STYLE_RULES: [Bit; 16] = [
    Bit::All, // bold
    Bit::All, // italic
    Bit::Any, // underline
    Bit::Any, // outline
    Bit::Any, // shadow
    Bit::All, // condensed
    Bit::All, // extended
    Bit::First,
    Bit::First,
    Bit::First,
    Bit::First,
    Bit::First,
    Bit::First,
    Bit::First,
    Bit::First,
    Bit::First,
];

/// Merge `head`, taking identity fields from the first font.
///
/// `unitsPerEm` is checked for equality before any table is merged.
pub fn merge_head(fonts: &[FontRef], loca_format: LocaFormat) -> Result<Head> {
    let tables = read_all(fonts, |f| f.head())?;
    let mut head: Head = first(&tables)?.to_owned_table();

    let flags: Vec<u16> = tables.iter().map(|t| t.flags().bits()).collect();
    let mac_styles: Vec<u16> = tables.iter().map(|t| t.mac_style().bits()).collect();

    head.font_revision = Fixed::from_bits(max(tables.iter().map(|t| t.font_revision().to_bits()))?);
    head.flags = Flags::from_bits_truncate(merge_bits(&flags, &FLAGS_RULES)?);
    head.mac_style = MacStyle::from_bits_truncate(merge_bits(&mac_styles, &MAC_STYLE_RULES)?);
    head.x_min = min(tables.iter().map(|t| t.x_min()))?;
    head.y_min = min(tables.iter().map(|t| t.y_min()))?;
    head.x_max = max(tables.iter().map(|t| t.x_max()))?;
    head.y_max = max(tables.iter().map(|t| t.y_max()))?;
    head.lowest_rec_ppem = max(tables.iter().map(|t| t.lowest_rec_ppem()))?;
    head.checksum_adjustment = 0;
    head.index_to_loc_format = match loca_format {
        LocaFormat::Short => 0,
        LocaFormat::Long => 1,
    };
    Ok(head)
}
