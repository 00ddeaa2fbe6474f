//! Applying `gvar` deltas to glyph outlines.

use kurbo::{Affine, Rect};
use read_fonts::{
    tables::{
        glyf::{
            Anchor, CompositeGlyph as ReadComposite, CurvePoint, Glyf, Glyph as ReadGlyph,
            SimpleGlyph as ReadSimple,
        },
        gvar::Gvar,
        loca::Loca,
    },
    types::{F2Dot14, Fixed, GlyphId, Point},
};
use write_fonts::tables::glyf::{Bbox, Component, CompositeGlyph, Contour, Glyph, SimpleGlyph};

use crate::{error::Result, iup::interpolate_untouched};

const PHANTOM_POINTS: usize = 4;
const MAX_COMPONENT_DEPTH: usize = 64;

/// Glyph outlines and advance deltas at one normalized location.
pub(crate) struct GlyphVariations<'a> {
    glyf: Glyf<'a>,
    loca: Loca<'a>,
    gvar: Gvar<'a>,
    coords: &'a [F2Dot14],
}

impl<'a> GlyphVariations<'a> {
    pub(crate) fn new(glyf: Glyf<'a>, loca: Loca<'a>, gvar: Gvar<'a>, coords: &'a [F2Dot14]) -> Self {
        Self { glyf, loca, gvar, coords }
    }

    /// Horizontal advance delta, taken from the second phantom point.
    pub(crate) fn advance_delta(&self, gid: GlyphId) -> i32 {
        match self.gvar.phantom_point_deltas(&self.glyf, &self.loca, self.coords, gid) {
            Ok(Some(deltas)) => deltas[1].x.round().to_i32() - deltas[0].x.round().to_i32(),
            _ => 0,
        }
    }

    /// The glyph outline with deltas applied.
    ///
    /// Composite bounding boxes are placeholders until [`resolve_composite_bounds`] runs.
    pub(crate) fn glyph(&self, gid: GlyphId) -> Result<Glyph> {
        match self.loca.get_glyf(gid, &self.glyf)? {
            None => Ok(Glyph::Empty),
            Some(ReadGlyph::Simple(simple)) => self.simple(&simple, gid),
            Some(ReadGlyph::Composite(composite)) => Ok(self.composite(&composite, gid)),
        }
    }

    fn simple(&self, simple: &ReadSimple, gid: GlyphId) -> Result<Glyph> {
        let curve_points: Vec<_> = simple.points().collect();
        if curve_points.is_empty() {
            return Ok(Glyph::Empty);
        }
        let end_points: Vec<usize> =
            simple.end_pts_of_contours().iter().map(|e| e.get() as usize).collect();

        // Fixed keeps fractional deltas from separate tuples until the final rounding
        let mut coords: Vec<Point<Fixed>> = curve_points
            .iter()
            .map(|p| Point::new(Fixed::from_i32(p.x.into()), Fixed::from_i32(p.y.into())))
            .chain(std::iter::repeat_n(Point::default(), PHANTOM_POINTS))
            .collect();
        let outline_len = curve_points.len();

        if let Some(variation) = self.gvar.glyph_variation_data(gid)? {
            // sparse tuples interpolate against the default outline, not a partly varied one
            let reference: Vec<Point<i32>> =
                curve_points.iter().map(|p| Point::new(p.x.into(), p.y.into())).collect();
            for (tuple, scalar) in variation.active_tuples_at(self.coords) {
                let shifts = tuple.deltas().map(|delta| {
                    let shift: Point<Fixed> = delta.apply_scalar(scalar);
                    (delta.position as usize, shift)
                });
                if tuple.has_deltas_for_all_points() {
                    for (idx, shift) in shifts {
                        if let Some(point) = coords.get_mut(idx) {
                            point.x += shift.x;
                            point.y += shift.y;
                        }
                    }
                } else {
                    apply_sparse_tuple(&mut coords, &reference, &end_points, shifts);
                }
            }
        }

        let mut contours = Vec::with_capacity(end_points.len());
        let mut start = 0;
        for &end in &end_points {
            let contour: Vec<CurvePoint> = (start..=end.min(outline_len - 1))
                .map(|i| {
                    CurvePoint::new(
                        round_i16(coords[i].x),
                        round_i16(coords[i].y),
                        curve_points[i].on_curve,
                    )
                })
                .collect();
            contours.push(Contour::from(contour));
            start = end + 1;
        }

        let mut glyph = SimpleGlyph {
            bbox: Bbox::default(),
            contours,
            instructions: simple.instructions().to_vec(),
        };
        glyph.recompute_bounding_box();
        Ok(Glyph::Simple(glyph))
    }

    fn composite(&self, composite: &ReadComposite, gid: GlyphId) -> Glyph {
        let components: Vec<_> = composite.components().collect();

        let mut offsets: Vec<Point<Fixed>> = components
            .iter()
            .map(|c| match c.anchor {
                Anchor::Offset { x, y } => Point::new(Fixed::from_i32(x.into()), Fixed::from_i32(y.into())),
                Anchor::Point { .. } => Point::default(),
            })
            .collect();

        if let Ok(Some(variation)) = self.gvar.glyph_variation_data(gid) {
            for (tuple, scalar) in variation.active_tuples_at(self.coords) {
                for delta in tuple.deltas() {
                    if let Some(offset) = offsets.get_mut(delta.position as usize) {
                        let shift: Point<Fixed> = delta.apply_scalar(scalar);
                        offset.x += shift.x;
                        offset.y += shift.y;
                    }
                }
            }
        }

        let placeholder = Bbox {
            x_min: composite.x_min(),
            y_min: composite.y_min(),
            x_max: composite.x_max(),
            y_max: composite.y_max(),
        };
        let mut instanced = components.iter().zip(&offsets).map(|(component, offset)| {
            let anchor = match component.anchor {
                Anchor::Offset { .. } => Anchor::Offset { x: round_i16(offset.x), y: round_i16(offset.y) },
                point @ Anchor::Point { .. } => point,
            };
            Component::new(component.glyph, anchor, component.transform, component.flags)
        });

        let Some(first) = instanced.next() else {
            return Glyph::Empty;
        };
        let mut glyph = CompositeGlyph::new(first, placeholder);
        for component in instanced {
            glyph.add_component(component, placeholder);
        }
        Glyph::Composite(glyph)
    }
}

/// Add one tuple's explicit deltas to `coords`, inferring the rest of the outline.
fn apply_sparse_tuple(
    coords: &mut [Point<Fixed>],
    reference: &[Point<i32>],
    end_points: &[usize],
    explicit: impl IntoIterator<Item = (usize, Point<Fixed>)>,
) {
    let outline_len = reference.len();
    let mut touched = vec![false; outline_len];
    let mut shifts = vec![Point::<i32>::default(); outline_len];
    for (idx, shift) in explicit {
        if idx < outline_len {
            touched[idx] = true;
            shifts[idx] = Point::new(shift.x.to_i32(), shift.y.to_i32());
        }
    }
    interpolate_untouched(&mut shifts, &touched, reference, end_points);
    for (point, shift) in coords.iter_mut().zip(&shifts) {
        point.x += Fixed::from_i32(shift.x);
        point.y += Fixed::from_i32(shift.y);
    }
}

fn round_i16(value: Fixed) -> i16 {
    value.round().to_i32().clamp(i16::MIN.into(), i16::MAX.into()) as i16
}

pub(crate) fn glyph_bbox(glyph: &Glyph) -> Option<Bbox> {
    match glyph {
        Glyph::Simple(simple) => Some(simple.bbox),
        Glyph::Composite(composite) => Some(composite.bbox),
        Glyph::Empty => None,
    }
}

/// Recompute every composite's bounding box from its instanced components.
pub(crate) fn resolve_composite_bounds(glyphs: &mut [Glyph]) {
    let mut resolved: Vec<Option<Option<Bbox>>> = glyphs
        .iter()
        .map(|g| match g {
            Glyph::Composite(_) => None,
            other => Some(glyph_bbox(other)),
        })
        .collect();

    for gid in 0..glyphs.len() {
        if let Some(bbox) = composite_bbox(gid, glyphs, &mut resolved, 0)
            && let Glyph::Composite(composite) = &mut glyphs[gid]
        {
            composite.bbox = bbox;
        }
    }
}

fn composite_bbox(
    gid: usize,
    glyphs: &[Glyph],
    resolved: &mut [Option<Option<Bbox>>],
    depth: usize,
) -> Option<Bbox> {
    if let Some(known) = resolved.get(gid).copied().flatten() {
        return known;
    }
    let Some(Glyph::Composite(composite)) = glyphs.get(gid) else {
        return None;
    };
    if depth > MAX_COMPONENT_DEPTH {
        return Some(composite.bbox);
    }

    let mut bounds: Option<Rect> = None;
    for component in composite.components() {
        let Some(inner) = composite_bbox(component.glyph.to_u32() as usize, glyphs, resolved, depth + 1)
        else {
            continue;
        };
        let (dx, dy) = match component.anchor {
            Anchor::Offset { x, y } => (f64::from(x), f64::from(y)),
            Anchor::Point { .. } => (0.0, 0.0),
        };
        let t = component.transform;
        let affine = Affine::new([
            t.xx.to_f32().into(),
            t.yx.to_f32().into(),
            t.xy.to_f32().into(),
            t.yy.to_f32().into(),
            dx,
            dy,
        ]);
        let rect = Rect::new(
            inner.x_min.into(),
            inner.y_min.into(),
            inner.x_max.into(),
            inner.y_max.into(),
        );
        let placed = affine.transform_rect_bbox(rect);
        bounds = Some(bounds.map_or(placed, |b| b.union(placed)));
    }

    let bbox = bounds.map(Bbox::from);
    resolved[gid] = Some(bbox);
    bbox
}

#[cfg(test)]
mod tests {
    use read_fonts::tables::glyf::Transform;
    use write_fonts::types::GlyphId16;

    use super::*;

    fn square(x: i16, y: i16, size: i16) -> Glyph {
        let contour: Contour = vec![
            CurvePoint::new(x, y, true),
            CurvePoint::new(x + size, y, true),
            CurvePoint::new(x + size, y + size, true),
            CurvePoint::new(x, y + size, true),
        ]
        .into();
        let mut glyph = SimpleGlyph { bbox: Bbox::default(), contours: vec![contour], instructions: vec![] };
        glyph.recompute_bounding_box();
        Glyph::Simple(glyph)
    }

    fn reference(gid: u16, x: i16, y: i16) -> Component {
        Component::new(
            GlyphId16::new(gid),
            Anchor::Offset { x, y },
            Transform::default(),
            write_fonts::tables::glyf::ComponentFlags::default(),
        )
    }

    fn fixed(x: i32) -> Point<Fixed> {
        Point::new(Fixed::from_i32(x), Fixed::ZERO)
    }

    #[test]
    fn sparse_tuples_interpolate_against_default_outline() {
        let reference = vec![Point::new(0, 0), Point::new(50, 0), Point::new(100, 0)];
        let mut coords: Vec<_> = reference.iter().map(|p| fixed(p.x)).collect();

        apply_sparse_tuple(&mut coords, &reference, &[2], [(0, fixed(0)), (1, fixed(60))]);
        assert_eq!(coords, vec![fixed(0), fixed(110), fixed(160)]);

        // halfway between 0 and 100 in the default outline, not at 110 of 160
        apply_sparse_tuple(&mut coords, &reference, &[2], [(0, fixed(0)), (2, fixed(10))]);
        assert_eq!(coords, vec![fixed(0), fixed(115), fixed(170)]);
    }

    #[test]
    fn composite_bounds_follow_component_offsets() {
        let stale = Bbox { x_min: 0, y_min: 0, x_max: 1, y_max: 1 };
        let mut composite = CompositeGlyph::new(reference(0, 200, 0), stale);
        composite.add_component(reference(1, 0, 300), stale);
        let mut glyphs = vec![square(0, 0, 100), square(10, 10, 50), Glyph::Composite(composite)];

        resolve_composite_bounds(&mut glyphs);

        assert_eq!(
            glyph_bbox(&glyphs[2]),
            Some(Bbox { x_min: 10, y_min: 0, x_max: 300, y_max: 360 })
        );
    }

    #[test]
    fn nested_composites_resolve() {
        let stale = Bbox::default();
        let inner = CompositeGlyph::new(reference(0, 50, 0), stale);
        let outer = CompositeGlyph::new(reference(1, 0, 50), stale);
        let mut glyphs = vec![square(0, 0, 10), Glyph::Composite(inner), Glyph::Composite(outer)];

        resolve_composite_bounds(&mut glyphs);

        assert_eq!(glyph_bbox(&glyphs[2]), Some(Bbox { x_min: 50, y_min: 50, x_max: 60, y_max: 60 }));
    }
}
