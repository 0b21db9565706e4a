// Robust segment-segment and polyline-polyline intersection in f64.
// `eps` is a distance in input units: points closer than `eps` to a line
// count as lying on it.

use super::bbox::Bbox;
use super::math::{distance_sq, length};
use super::tolerance::{clamp01, near_zero, EPS_DENOM, EPS_LEN, EPS_MERGE, EPS_PARALLEL};
use crate::model::{Point, Polyline, Vec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegIntersection {
    None,
    // Interior crossing (not at an endpoint within tolerance)
    Proper { t: f64, u: f64, x: f64, y: f64 },
    // Touch at or near an endpoint of either segment
    Touch { t: f64, u: f64, x: f64, y: f64 },
    // Collinear overlapping span: parameter ranges on each segment (ordered)
    CollinearOverlap { t0: f64, t1: f64, u0: f64, u1: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PolylineIntersection {
    Empty,
    Point(Point),
    MultiPoint(Vec<Point>),
    Overlap,
}

impl PolylineIntersection {
    pub fn single_point(&self) -> Option<Point> {
        match self {
            PolylineIntersection::Point(p) => Some(*p),
            _ => None,
        }
    }
}

#[inline]
fn orient(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

#[inline]
fn lerp(a: Point, b: Point, t: f64) -> Point {
    Point { x: a.x + (b.x - a.x) * t, y: a.y + (b.y - a.y) * t }
}

// Parameter of the projection of p onto segment cd.
fn project_param(p: Point, c: Point, d: Point) -> f64 {
    let vx = d.x - c.x; let vy = d.y - c.y;
    let vv = vx * vx + vy * vy;
    if vv <= EPS_LEN * EPS_LEN { 0.0 } else { ((p.x - c.x) * vx + (p.y - c.y) * vy) / vv }
}

fn point_on_segment(p: Point, c: Point, d: Point, eps: f64) -> Option<f64> {
    let (d2, u) = super::math::seg_distance_sq(p, c, d);
    if d2 <= eps * eps { Some(u) } else { None }
}

// Project CD onto the dominant axis of AB and compute the shared parameter span.
fn collinear_overlap(a: Point, b: Point, c: Point, d: Point, len_ab: f64, eps: f64) -> SegIntersection {
    let dxab = (b.x - a.x).abs();
    let dyab = (b.y - a.y).abs();
    let (pa1, pa2, pc1, pc2) = if dxab >= dyab { (a.x, b.x, c.x, d.x) } else { (a.y, b.y, c.y, d.y) };
    let span = pa2 - pa1;
    let t_c1 = (pc1 - pa1) / span;
    let t_c2 = (pc2 - pa1) / span;
    let mut lo = t_c1.min(t_c2);
    let mut hi = t_c1.max(t_c2);
    let eps_t = eps / len_ab;
    if hi < -eps_t || lo > 1.0 + eps_t { return SegIntersection::None; }
    lo = lo.max(0.0);
    hi = hi.min(1.0);
    if hi < lo {
        // Gap smaller than eps: collapse onto the nearer end of AB.
        let t = if lo <= 0.0 || hi <= 0.0 { 0.0 } else { 1.0 };
        lo = t;
        hi = t;
    }
    let u0 = clamp01(project_param(lerp(a, b, lo), c, d));
    let u1 = clamp01(project_param(lerp(a, b, hi), c, d));
    let (u0, u1) = if u0 <= u1 { (u0, u1) } else { (u1, u0) };
    SegIntersection::CollinearOverlap { t0: lo, t1: hi, u0, u1 }
}

pub fn intersect_segments(a: Point, b: Point, c: Point, d: Point, eps: f64) -> SegIntersection {
    let len_ab = length(Vec2::between(a, b));
    let len_cd = length(Vec2::between(c, d));

    // Degenerate segments behave as points
    if len_ab <= EPS_LEN || len_cd <= EPS_LEN {
        if len_ab <= EPS_LEN && len_cd <= EPS_LEN {
            return if distance_sq(a, c) <= eps * eps {
                SegIntersection::Touch { t: 0.0, u: 0.0, x: a.x, y: a.y }
            } else {
                SegIntersection::None
            };
        }
        if len_ab <= EPS_LEN {
            return match point_on_segment(a, c, d, eps) {
                Some(u) => SegIntersection::Touch { t: 0.0, u, x: a.x, y: a.y },
                None => SegIntersection::None,
            };
        }
        return match point_on_segment(c, a, b, eps) {
            Some(t) => SegIntersection::Touch { t, u: 0.0, x: c.x, y: c.y },
            None => SegIntersection::None,
        };
    }

    // Signed distances of each endpoint from the other segment's line
    let o1 = orient(a, b, c) / len_ab;
    let o2 = orient(a, b, d) / len_ab;
    let o3 = orient(c, d, a) / len_cd;
    let o4 = orient(c, d, b) / len_cd;

    let r = Vec2::between(a, b);
    let s = Vec2::between(c, d);
    let rxs = r.x * s.y - r.y * s.x;

    // A shared stretch needs parallel directions, not just small side distances:
    // lines fanning out from one point stay within `eps` of each other near it.
    let parallel = near_zero(rxs / (len_ab * len_cd), EPS_PARALLEL);
    if parallel && near_zero(o1, eps) && near_zero(o2, eps) && near_zero(o3, eps) && near_zero(o4, eps) {
        return collinear_overlap(a, b, c, d, len_ab, eps);
    }

    let inter1 = (o1 > 0.0 && o2 < 0.0) || (o1 < 0.0 && o2 > 0.0) || near_zero(o1, eps) || near_zero(o2, eps);
    let inter2 = (o3 > 0.0 && o4 < 0.0) || (o3 < 0.0 && o4 > 0.0) || near_zero(o3, eps) || near_zero(o4, eps);
    if !(inter1 && inter2) {
        return SegIntersection::None;
    }

    if near_zero(rxs / (len_ab * len_cd), EPS_DENOM) {
        // Parallel but not collinear (already handled)
        return SegIntersection::None;
    }
    let qp = Vec2::between(a, c);
    let t = (qp.x * s.y - qp.y * s.x) / rxs;
    let u = (qp.x * r.y - qp.y * r.x) / rxs;

    let eps_t = eps / len_ab;
    let eps_u = eps / len_cd;
    if t < -eps_t || t > 1.0 + eps_t || u < -eps_u || u > 1.0 + eps_u {
        return SegIntersection::None;
    }
    let x = a.x + t * r.x;
    let y = a.y + t * r.y;

    let is_touch = near_zero(t, eps_t) || near_zero(1.0 - t, eps_t)
        || near_zero(u, eps_u) || near_zero(1.0 - u, eps_u);
    if is_touch {
        SegIntersection::Touch { t: clamp01(t), u: clamp01(u), x, y }
    } else {
        SegIntersection::Proper { t, u, x, y }
    }
}

#[derive(Clone, Copy)]
struct Seg { a: Point, b: Point, bb: Bbox }

fn segments_of(line: &Polyline) -> Vec<Seg> {
    line.points
        .windows(2)
        .filter(|w| length(Vec2::between(w[0], w[1])) > EPS_LEN)
        .map(|w| Seg { a: w[0], b: w[1], bb: Bbox::of_segment(w[0], w[1]) })
        .collect()
}

fn push_unique(points: &mut Vec<Point>, p: Point, merge: f64) {
    let merge2 = merge * merge;
    if points.iter().all(|q| distance_sq(*q, p) > merge2) {
        points.push(p);
    }
}

/// Intersection of two polylines, classified the way the street predicate
/// needs it: one distinct point, several points, a shared stretch, or nothing.
/// Zero-length segments are ignored; points closer than `eps` merge.
pub fn intersect_polylines(a: &Polyline, b: &Polyline, eps: f64) -> PolylineIntersection {
    let sa = segments_of(a);
    let sb = segments_of(b);
    if sa.is_empty() || sb.is_empty() {
        return PolylineIntersection::Empty;
    }
    let merge = eps.max(EPS_MERGE);
    let mut points: Vec<Point> = Vec::new();
    for s in &sa {
        let bb = s.bb.expand(eps);
        for q in &sb {
            if !bb.overlaps(&q.bb) { continue; }
            match intersect_segments(s.a, s.b, q.a, q.b, eps) {
                SegIntersection::None => {}
                SegIntersection::Proper { x, y, .. } | SegIntersection::Touch { x, y, .. } => {
                    push_unique(&mut points, Point { x, y }, merge);
                }
                SegIntersection::CollinearOverlap { t0, t1, .. } => {
                    let len = length(Vec2::between(s.a, s.b));
                    if (t1 - t0) * len > merge {
                        return PolylineIntersection::Overlap;
                    }
                    push_unique(&mut points, lerp(s.a, s.b, 0.5 * (t0 + t1)), merge);
                }
            }
        }
    }
    match points.len() {
        0 => PolylineIntersection::Empty,
        1 => PolylineIntersection::Point(points[0]),
        _ => PolylineIntersection::MultiPoint(points),
    }
}
