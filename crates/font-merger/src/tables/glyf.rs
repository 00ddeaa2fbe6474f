//! glyf/loca merging
//!
//! Outlines are concatenated in merged glyph order. Only the first font's
//! `fpgm`, `prep` and `cvt ` survive the merge, so per-glyph instructions
//! of every later font are stripped.

use read_fonts::{
    FontRef, TableProvider,
    tables::glyf::{CompositeGlyph as ReadComposite, Glyph as ReadGlyph},
    types::{GlyphId, Tag},
};
use write_fonts::{
    from_obj::ToOwnedTable,
    tables::{
        glyf::{Bbox, Component, CompositeGlyph, Glyf, GlyfLocaBuilder, Glyph},
        loca::{Loca, LocaFormat},
    },
};

use crate::{MergeError, Result, glyph_order::GlyphOrder};

pub fn merge_glyf(fonts: &[FontRef], order: &GlyphOrder) -> Result<(Glyf, Loca, LocaFormat)> {
    let mut builder = GlyfLocaBuilder::new();

    for (font_idx, font) in fonts.iter().enumerate() {
        let missing = |tag: &[u8; 4]| MergeError::MissingTable { index: font_idx, tag: Tag::new(tag) };
        let glyf = font.glyf().map_err(|_| missing(b"glyf"))?;
        let loca = font.loca(None).map_err(|_| missing(b"loca"))?;
        let keep_hinting = font_idx == 0;

        for gid in 0..order.font_range(font_idx).len() as u32 {
            let glyph = match loca.get_glyf(GlyphId::new(gid), &glyf)? {
                None => Glyph::Empty,
                Some(ReadGlyph::Simple(simple)) => {
                    let mut glyph: write_fonts::tables::glyf::SimpleGlyph = simple.to_owned_table();
                    if !keep_hinting {
                        glyph.instructions.clear();
                    }
                    Glyph::Simple(glyph)
                }
                Some(ReadGlyph::Composite(composite)) if keep_hinting => {
                    Glyph::Composite(composite.to_owned_table())
                }
                Some(ReadGlyph::Composite(composite)) => remap_composite(&composite, font_idx, order),
            };
            builder.add_glyph(&glyph)?;
        }
    }

    Ok(builder.build())
}

/// Rebuild a composite with component ids moved into merged order.
///
/// The rebuilt glyph carries no instructions.
fn remap_composite(composite: &ReadComposite, font_idx: usize, order: &GlyphOrder) -> Glyph {
    let bbox = Bbox {
        x_min: composite.x_min(),
        y_min: composite.y_min(),
        x_max: composite.x_max(),
        y_max: composite.y_max(),
    };
    let mut components = composite.components().map(|component| {
        Component::new(
            order.remap(font_idx, component.glyph.into()),
            component.anchor,
            component.transform,
            component.flags,
        )
    });

    let Some(first) = components.next() else {
        return Glyph::Empty;
    };
    let mut glyph = CompositeGlyph::new(first, bbox);
    for component in components {
        glyph.add_component(component, bbox);
    }
    Glyph::Composite(glyph)
}

