//! Direction vectors of a polyline, used by the angle test.
//!
//! Two policies exist. The local tangent looks at the segment next to the
//! vertex nearest a reference point, so a curving road is judged by how it
//! runs at the junction. The chord is the straight first-to-last vector.

use super::math::distance_sq;
use crate::model::{Point, Polyline, Vec2};

/// Index of the vertex nearest to `reference`; ties keep the earliest vertex.
pub fn nearest_vertex(line: &Polyline, reference: Point) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in line.points.iter().enumerate() {
        let d2 = distance_sq(*p, reference);
        if best.map_or(true, |(_, bd)| d2 < bd) {
            best = Some((i, d2));
        }
    }
    best.map(|(i, _)| i)
}

/// Local direction near `reference`: from the nearest vertex to the next one,
/// or from the previous vertex when the nearest is the last. Zero when the
/// polyline has fewer than two points or the chosen segment has no length.
pub fn direction_vector(line: &Polyline, reference: Point) -> Vec2 {
    if line.len() < 2 {
        return Vec2::ZERO;
    }
    let Some(i) = nearest_vertex(line, reference) else {
        return Vec2::ZERO;
    };
    let pts = &line.points;
    if i + 1 < pts.len() {
        Vec2::between(pts[i], pts[i + 1])
    } else {
        Vec2::between(pts[i - 1], pts[i])
    }
}

/// Whole-line direction, first point to last point.
pub fn chord_vector(line: &Polyline) -> Vec2 {
    match line.endpoints() {
        Some((a, b)) if line.len() >= 2 => Vec2::between(a, b),
        _ => Vec2::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_forward_segment_from_nearest_vertex() {
        let line = Polyline::from_xy(&[(0.0, 0.0), (1.0, 0.0), (1.0, 5.0)]);
        assert_eq!(direction_vector(&line, Point::new(0.9, 0.1)), Vec2 { x: 0.0, y: 5.0 });
        assert_eq!(direction_vector(&line, Point::new(-1.0, 0.0)), Vec2 { x: 1.0, y: 0.0 });
    }

    #[test]
    fn last_vertex_uses_backward_segment() {
        let line = Polyline::from_xy(&[(0.0, 0.0), (1.0, 0.0), (1.0, 5.0)]);
        assert_eq!(direction_vector(&line, Point::new(1.0, 6.0)), Vec2 { x: 0.0, y: 5.0 });
    }

    #[test]
    fn ties_go_to_first_vertex() {
        let line = Polyline::from_xy(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0)]);
        // (1, 0) is equidistant from vertices 0 and 1
        assert_eq!(nearest_vertex(&line, Point::new(1.0, 0.0)), Some(0));
    }

    #[test]
    fn duplicate_points_give_zero_vector() {
        let line = Polyline::from_xy(&[(3.0, 3.0), (3.0, 3.0)]);
        assert_eq!(direction_vector(&line, Point::new(3.0, 3.0)), Vec2::ZERO);
        assert_eq!(chord_vector(&line), Vec2::ZERO);
    }

    #[test]
    fn short_polylines_give_zero_vector() {
        let single = Polyline::from_xy(&[(1.0, 1.0)]);
        assert_eq!(direction_vector(&single, Point::new(0.0, 0.0)), Vec2::ZERO);
        assert_eq!(chord_vector(&single), Vec2::ZERO);
        assert_eq!(chord_vector(&Polyline::default()), Vec2::ZERO);
    }

    #[test]
    fn chord_ignores_interior_shape() {
        let line = Polyline::from_xy(&[(0.0, 0.0), (5.0, 9.0), (2.0, 0.0)]);
        assert_eq!(chord_vector(&line), Vec2 { x: 2.0, y: 0.0 });
    }
}
