use super::tolerance::{clamp, EPS_LEN, STRAIGHT_ANGLE_DEG};
use crate::model::{Point, Vec2};

#[inline]
pub fn distance_sq(a: Point, b: Point) -> f64 {
    let dx = b.x - a.x; let dy = b.y - a.y;
    dx * dx + dy * dy
}

#[inline]
pub fn distance(a: Point, b: Point) -> f64 { distance_sq(a, b).sqrt() }

#[inline]
pub fn dot(a: Vec2, b: Vec2) -> f64 { a.x * b.x + a.y * b.y }

#[inline]
pub fn length(v: Vec2) -> f64 { v.x.hypot(v.y) }

pub fn seg_distance_sq(p: Point, a: Point, b: Point) -> (f64, f64) {
    let vx = b.x - a.x; let vy = b.y - a.y;
    let wx = p.x - a.x; let wy = p.y - a.y;
    let vv = vx * vx + vy * vy;
    let mut t = if vv > 0.0 { (wx * vx + wy * vy) / vv } else { 0.0 };
    if t < 0.0 { t = 0.0; } else if t > 1.0 { t = 1.0; }
    let projx = a.x + t * vx; let projy = a.y + t * vy;
    let dx = p.x - projx; let dy = p.y - projy;
    (dx * dx + dy * dy, t)
}

/// Unsigned angle between two directions in degrees, in [0, 180].
/// `None` when either vector has no usable length.
pub fn angle_between_deg(v1: Vec2, v2: Vec2) -> Option<f64> {
    let m1 = length(v1);
    let m2 = length(v2);
    if m1 <= EPS_LEN || m2 <= EPS_LEN || !m1.is_finite() || !m2.is_finite() {
        return None;
    }
    let cos_theta = clamp(dot(v1, v2) / (m1 * m2), -1.0, 1.0);
    Some(cos_theta.acos().to_degrees())
}

/// Angle folded so that opposite directions count as aligned:
/// `min(θ, 180 − θ)`. Degenerate vectors score a full 180°.
pub fn fold_angle_deg(v1: Vec2, v2: Vec2) -> f64 {
    match angle_between_deg(v1, v2) {
        Some(theta) => theta.min(STRAIGHT_ANGLE_DEG - theta),
        None => STRAIGHT_ANGLE_DEG,
    }
}
