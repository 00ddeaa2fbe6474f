//! hmtx table merging

use read_fonts::{FontRef, TableProvider, types::GlyphId};
use write_fonts::tables::hmtx::{Hmtx, LongMetric};

use crate::{Result, glyph_order::GlyphOrder};

pub fn merge_hmtx(fonts: &[FontRef], order: &GlyphOrder) -> Result<Hmtx> {
    let mut metrics = Vec::with_capacity(order.names().len());
    for (font_idx, font) in fonts.iter().enumerate() {
        let hmtx = font.hmtx()?;
        for gid in 0..order.font_range(font_idx).len() as u32 {
            let gid = GlyphId::new(gid);
            metrics.push(LongMetric {
                advance: hmtx.advance(gid).unwrap_or(0),
                side_bearing: hmtx.side_bearing(gid).unwrap_or(0),
            });
        }
    }
    Ok(pack(metrics))
}

/// Store a trailing run of equal advances as side bearings only.
fn pack(mut metrics: Vec<LongMetric>) -> Hmtx {
    let Some(last) = metrics.last().map(|m| m.advance) else {
        return Hmtx { h_metrics: metrics, left_side_bearings: Vec::new() };
    };
    let run = metrics.iter().rev().take_while(|m| m.advance == last).count();
    let long = metrics.len() - run + 1;
    let left_side_bearings = metrics.split_off(long).into_iter().map(|m| m.side_bearing).collect();
    Hmtx { h_metrics: metrics, left_side_bearings }
}
