//! Interpolation of untouched points for sparse glyph deltas.

use read_fonts::types::Point;

/// Fill in deltas for points without an explicit delta, contour by contour.
///
/// `end_points` holds the index of the last point of each contour.
pub(crate) fn interpolate_untouched(
    deltas: &mut [Point<i32>],
    touched: &[bool],
    points: &[Point<i32>],
    end_points: &[usize],
) {
    let mut start = 0;
    for &end in end_points {
        if end >= start && end < points.len() {
            interpolate_contour(&mut deltas[start..=end], &touched[start..=end], &points[start..=end]);
        }
        start = end + 1;
    }
}

fn interpolate_contour(deltas: &mut [Point<i32>], touched: &[bool], points: &[Point<i32>]) {
    let len = points.len();
    let touched_idx: Vec<usize> = (0..len).filter(|i| touched[*i]).collect();

    match touched_idx.as_slice() {
        [] => {}
        [only] => {
            let shift = deltas[*only];
            for (i, delta) in deltas.iter_mut().enumerate() {
                if i != *only {
                    *delta = shift;
                }
            }
        }
        _ => {
            let pairs = touched_idx.iter().zip(touched_idx.iter().cycle().skip(1));
            for (&from, &to) in pairs {
                let mut i = (from + 1) % len;
                while i != to {
                    deltas[i] = Point::new(
                        interpolate(points[from].x, points[to].x, points[i].x, deltas[from].x, deltas[to].x),
                        interpolate(points[from].y, points[to].y, points[i].y, deltas[from].y, deltas[to].y),
                    );
                    i = (i + 1) % len;
                }
            }
        }
    }
}

/// One-dimensional IUP: points between the two references shift proportionally,
/// points outside follow the nearer reference.
fn interpolate(c1: i32, c2: i32, c: i32, d1: i32, d2: i32) -> i32 {
    if c1 == c2 {
        return if d1 == d2 { d1 } else { 0 };
    }
    let (lo, hi, d_lo, d_hi) = if c1 < c2 { (c1, c2, d1, d2) } else { (c2, c1, d2, d1) };
    if c <= lo {
        d_lo
    } else if c >= hi {
        d_hi
    } else {
        let t = f64::from(c - lo) / f64::from(hi - lo);
        (f64::from(d_lo) + t * f64::from(d_hi - d_lo)).round() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point<i32>> {
        vec![Point::new(0, 0), Point::new(100, 0), Point::new(100, 100), Point::new(0, 100)]
    }

    #[test]
    fn single_touched_point_shifts_contour() {
        let mut deltas = vec![Point::new(5, -5), Point::default(), Point::default(), Point::default()];
        interpolate_untouched(&mut deltas, &[true, false, false, false], &square(), &[3]);
        assert!(deltas.iter().all(|d| *d == Point::new(5, -5)));
    }

    #[test]
    fn between_references_is_proportional() {
        let points = vec![Point::new(0, 0), Point::new(50, 0), Point::new(100, 0)];
        let mut deltas = vec![Point::new(0, 0), Point::default(), Point::new(10, 0)];
        interpolate_untouched(&mut deltas, &[true, false, true], &points, &[2]);
        assert_eq!(deltas[1], Point::new(5, 0));
    }

    #[test]
    fn outside_references_takes_nearest() {
        assert_eq!(interpolate(0, 100, -20, 3, 9), 3);
        assert_eq!(interpolate(0, 100, 120, 3, 9), 9);
        assert_eq!(interpolate(50, 50, 10, 4, 4), 4);
        assert_eq!(interpolate(50, 50, 10, 4, 2), 0);
    }

    #[test]
    fn untouched_contour_is_left_alone() {
        let mut deltas = vec![Point::default(); 4];
        interpolate_untouched(&mut deltas, &[false; 4], &square(), &[3]);
        assert!(deltas.iter().all(|d| *d == Point::default()));
    }
}
