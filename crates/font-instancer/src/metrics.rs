//! Horizontal metrics and font-wide metric tables of a static instance.

use read_fonts::{
    tables::{
        hhea::Hhea,
        mvar::{Mvar, tags},
        os2::Os2,
        post::Post,
    },
    types::{F2Dot14, Tag},
};
use write_fonts::{
    from_obj::ToOwnedTable,
    tables::{
        glyf::{Bbox, Glyph},
        hhea::Hhea as WriteHhea,
        hmtx::{Hmtx, LongMetric},
        os2::Os2 as WriteOs2,
        post::Post as WritePost,
    },
};

use crate::outline::glyph_bbox;

/// `MVAR` deltas at one location. A font without `MVAR` yields zero deltas.
pub(crate) struct MetricDeltas<'a> {
    mvar: Option<Mvar<'a>>,
    coords: &'a [F2Dot14],
}

impl<'a> MetricDeltas<'a> {
    pub(crate) fn new(mvar: Option<Mvar<'a>>, coords: &'a [F2Dot14]) -> Self {
        Self { mvar, coords }
    }

    fn delta(&self, tag: Tag) -> i32 {
        self.mvar
            .as_ref()
            .and_then(|mvar| mvar.metric_delta(tag, self.coords).ok())
            .map(|delta| delta.to_i32())
            .unwrap_or(0)
    }

    fn apply(&self, tag: Tag, value: i16) -> i16 {
        saturate(i32::from(value) + self.delta(tag))
    }
}

fn saturate(value: i32) -> i16 {
    value.clamp(i16::MIN.into(), i16::MAX.into()) as i16
}

/// Font-wide bounds and horizontal extents accumulated over all glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Extents {
    pub bbox: Option<Bbox>,
    pub advance_width_max: u16,
    pub min_left_side_bearing: i16,
    pub min_right_side_bearing: i16,
    pub x_max_extent: i16,
}

impl Extents {
    pub(crate) fn measure(glyphs: &[Glyph], advances: &[u16]) -> Self {
        let mut extents = Extents {
            bbox: None,
            advance_width_max: advances.iter().copied().max().unwrap_or(0),
            min_left_side_bearing: i16::MAX,
            min_right_side_bearing: i16::MAX,
            x_max_extent: i16::MIN,
        };

        for (glyph, &advance) in glyphs.iter().zip(advances) {
            let Some(bbox) = glyph_bbox(glyph).filter(|b| *b != Bbox::default()) else {
                continue;
            };
            extents.bbox = Some(extents.bbox.map_or(bbox, |b| b.union(bbox)));

            let width = i32::from(bbox.x_max) - i32::from(bbox.x_min);
            let rsb = saturate(i32::from(advance) - i32::from(bbox.x_min) - width);
            extents.min_left_side_bearing = extents.min_left_side_bearing.min(bbox.x_min);
            extents.min_right_side_bearing = extents.min_right_side_bearing.min(rsb);
            extents.x_max_extent = extents.x_max_extent.max(bbox.x_max);
        }

        if extents.bbox.is_none() {
            extents.min_left_side_bearing = 0;
            extents.min_right_side_bearing = 0;
            extents.x_max_extent = 0;
        }
        extents
    }
}

/// Build `hmtx`, taking each side bearing from the glyph's `xMin`.
///
/// Empty glyphs keep their previous side bearing.
pub(crate) fn build_hmtx(
    glyphs: &[Glyph],
    advances: &[u16],
    old_side_bearings: &[i16],
    num_h_metrics: usize,
) -> Hmtx {
    let side_bearings = glyphs
        .iter()
        .zip(old_side_bearings)
        .map(|(glyph, old)| glyph_bbox(glyph).map_or(*old, |b| b.x_min));

    let mut hmtx = Hmtx { h_metrics: Vec::with_capacity(num_h_metrics), left_side_bearings: Vec::new() };
    for (gid, (advance, side_bearing)) in advances.iter().zip(side_bearings).enumerate() {
        if gid < num_h_metrics {
            hmtx.h_metrics.push(LongMetric { advance: *advance, side_bearing });
        } else {
            hmtx.left_side_bearings.push(side_bearing);
        }
    }
    hmtx
}

pub(crate) fn build_hhea(source: &Hhea, extents: &Extents, deltas: &MetricDeltas) -> WriteHhea {
    let mut hhea: WriteHhea = source.to_owned_table();
    hhea.ascender = deltas.apply(tags::HASC, source.ascender().to_i16()).into();
    hhea.descender = deltas.apply(tags::HDSC, source.descender().to_i16()).into();
    hhea.line_gap = deltas.apply(tags::HLGP, source.line_gap().to_i16()).into();
    hhea.caret_slope_rise = deltas.apply(tags::HCRS, source.caret_slope_rise());
    hhea.caret_slope_run = deltas.apply(tags::HCRN, source.caret_slope_run());
    hhea.caret_offset = deltas.apply(tags::HCOF, source.caret_offset());
    hhea.advance_width_max = extents.advance_width_max.into();
    hhea.min_left_side_bearing = extents.min_left_side_bearing.into();
    hhea.min_right_side_bearing = extents.min_right_side_bearing.into();
    hhea.x_max_extent = extents.x_max_extent.into();
    hhea
}

/// Rebuild `OS/2` with metric deltas applied and `usWeightClass` set to `weight`.
pub(crate) fn build_os2(source: &Os2, weight: u16, deltas: &MetricDeltas) -> WriteOs2 {
    let mut os2: WriteOs2 = source.to_owned_table();
    os2.us_weight_class = weight;

    os2.s_typo_ascender = deltas.apply(tags::HASC, source.s_typo_ascender());
    os2.s_typo_descender = deltas.apply(tags::HDSC, source.s_typo_descender());
    os2.s_typo_line_gap = deltas.apply(tags::HLGP, source.s_typo_line_gap());
    os2.y_strikeout_size = deltas.apply(tags::STRS, source.y_strikeout_size());
    os2.y_strikeout_position = deltas.apply(tags::STRO, source.y_strikeout_position());

    os2.y_subscript_x_size = deltas.apply(tags::SBXS, source.y_subscript_x_size());
    os2.y_subscript_y_size = deltas.apply(tags::SBYS, source.y_subscript_y_size());
    os2.y_subscript_x_offset = deltas.apply(tags::SBXO, source.y_subscript_x_offset());
    os2.y_subscript_y_offset = deltas.apply(tags::SBYO, source.y_subscript_y_offset());
    os2.y_superscript_x_size = deltas.apply(tags::SPXS, source.y_superscript_x_size());
    os2.y_superscript_y_size = deltas.apply(tags::SPYS, source.y_superscript_y_size());
    os2.y_superscript_x_offset = deltas.apply(tags::SPXO, source.y_superscript_x_offset());
    os2.y_superscript_y_offset = deltas.apply(tags::SPYO, source.y_superscript_y_offset());

    os2.sx_height = source.sx_height().map(|v| deltas.apply(tags::XHGT, v));
    os2.s_cap_height = source.s_cap_height().map(|v| deltas.apply(tags::CPHT, v));
    os2
}

pub(crate) fn build_post(source: &Post, deltas: &MetricDeltas) -> WritePost {
    let mut post: WritePost = source.to_owned_table();
    post.underline_position = deltas.apply(tags::UNDO, source.underline_position().to_i16()).into();
    post.underline_thickness = deltas.apply(tags::UNDS, source.underline_thickness().to_i16()).into();
    post
}
