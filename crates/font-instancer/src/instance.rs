//! Weight instancing pipeline.

use read_fonts::{
    FontRef, TableProvider,
    types::{F2Dot14, Fixed, GlyphId, Tag},
};
use write_fonts::{
    FontBuilder,
    from_obj::ToOwnedTable,
    tables::{
        glyf::{GlyfLocaBuilder, Glyph},
        head::Head,
        loca::LocaFormat,
    },
};

use crate::{
    WGHT,
    error::{Error, Result},
    metrics::{self, Extents, MetricDeltas},
    outline::{GlyphVariations, resolve_composite_bounds},
    weight_axis_of,
};

/// Tables that only make sense in a variable font.
const DROPPED_TABLES: [Tag; 9] = [
    Tag::new(b"fvar"),
    Tag::new(b"gvar"),
    Tag::new(b"avar"),
    Tag::new(b"cvar"),
    Tag::new(b"HVAR"),
    Tag::new(b"MVAR"),
    Tag::new(b"VVAR"),
    Tag::new(b"STAT"),
    Tag::new(b"DSIG"),
];

const CFF2: Tag = Tag::new(b"CFF2");

/// A static instance produced by [`instantiate_weight`].
#[derive(Debug, Clone)]
pub struct Instance {
    pub data: Vec<u8>,
    /// Weight the font was pinned at, after clamping to the axis range.
    pub weight: f32,
    /// Whether the requested weight lay outside the axis range.
    pub clamped: bool,
}

/// Pin the `wght` axis at `weight` and return the resulting static font.
///
/// Weights outside the axis range are clamped to it. Other axes stay at their
/// defaults. The output's `OS/2.usWeightClass` is set to the pinned weight.
///
/// # Errors
///
/// - [`Error::NotVariableFont`] if the font has no `fvar` table
/// - [`Error::NoWeightAxis`] if `fvar` has no `wght` axis
/// - [`Error::Cff2Unsupported`] for CFF2 outlines
pub fn instantiate_weight(data: &[u8], weight: f32) -> Result<Instance> {
    let font = FontRef::new(data)?;
    let axis = weight_axis_of(&font)?;

    if font.table_data(CFF2).is_some() {
        return Err(Error::Cff2Unsupported);
    }
    let glyf = font.glyf().map_err(|_| Error::NoGlyf)?;
    let loca = font.loca(None).map_err(|_| Error::NoGlyf)?;
    let gvar = font.gvar().map_err(|_| Error::NoGvar)?;

    let pinned = axis.clamp(weight);
    let clamped = pinned != weight;
    if clamped {
        log::warn!("weight {weight} outside axis range {}..{}, using {pinned}", axis.min, axis.max);
    }

    let fvar = font.fvar()?;
    let avar = font.avar().ok();
    let mut coords = vec![F2Dot14::default(); fvar.axis_count() as usize];
    fvar.user_to_normalized(
        avar.as_ref(),
        [(WGHT, Fixed::from_f64(f64::from(pinned)))],
        &mut coords,
    );

    let num_glyphs = font.maxp()?.num_glyphs() as u32;
    let hmtx = font.hmtx()?;
    let hhea = font.hhea()?;
    let num_h_metrics = hhea.number_of_h_metrics() as usize;

    let variations = GlyphVariations::new(glyf, loca, gvar, &coords);
    let mut glyphs: Vec<Glyph> = Vec::with_capacity(num_glyphs as usize);
    let mut advances = Vec::with_capacity(num_glyphs as usize);
    let mut side_bearings = Vec::with_capacity(num_glyphs as usize);
    for gid in (0..num_glyphs).map(GlyphId::new) {
        let advance = i32::from(hmtx.advance(gid).unwrap_or(0)) + variations.advance_delta(gid);
        advances.push(advance.clamp(0, u16::MAX.into()) as u16);
        side_bearings.push(hmtx.side_bearing(gid).unwrap_or(0));
        glyphs.push(variations.glyph(gid)?);
    }
    resolve_composite_bounds(&mut glyphs);

    let extents = Extents::measure(&glyphs, &advances);
    let deltas = MetricDeltas::new(font.mvar().ok(), &coords);

    let mut glyf_builder = GlyfLocaBuilder::new();
    for glyph in &glyphs {
        glyf_builder.add_glyph(glyph)?;
    }
    let (new_glyf, new_loca, loca_format) = glyf_builder.build();

    let mut builder = FontBuilder::new();
    builder.add_table(&new_glyf)?;
    builder.add_table(&new_loca)?;
    builder.add_table(&metrics::build_hmtx(&glyphs, &advances, &side_bearings, num_h_metrics))?;
    builder.add_table(&metrics::build_hhea(&hhea, &extents, &deltas))?;

    let mut head: Head = font.head()?.to_owned_table();
    if let Some(bbox) = extents.bbox {
        head.x_min = bbox.x_min;
        head.y_min = bbox.y_min;
        head.x_max = bbox.x_max;
        head.y_max = bbox.y_max;
    }
    head.index_to_loc_format = match loca_format {
        LocaFormat::Short => 0,
        LocaFormat::Long => 1,
    };
    builder.add_table(&head)?;

    let weight_class = pinned.round() as u16;
    if let Ok(os2) = font.os2() {
        builder.add_table(&metrics::build_os2(&os2, weight_class, &deltas))?;
    }
    if let Ok(post) = font.post() {
        builder.add_table(&metrics::build_post(&post, &deltas))?;
    }

    for record in font.table_directory.table_records() {
        let tag = record.tag();
        if !DROPPED_TABLES.contains(&tag)
            && !builder.contains(tag)
            && let Some(table) = font.table_data(tag)
        {
            builder.add_raw(tag, table);
        }
    }

    log::debug!("instanced {num_glyphs} glyphs at wght={pinned}");
    Ok(Instance { data: builder.build(), weight: pinned, clamped })
}
