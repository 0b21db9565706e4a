// Centralized tolerances and helpers for the street predicate

pub const DEFAULT_ANGLE_THRESHOLD_DEG: f64 = 30.0;  // max deviation from collinear (degrees)
pub const DEFAULT_DISTANCE_TOLERANCE: f64 = 1e-6;   // touch distance in input units
pub const EPS_LEN: f64 = 1e-12;                     // zero-length vector threshold
pub const EPS_DENOM: f64 = 1e-15;                   // denominator guard for ratios
pub const EPS_MERGE: f64 = 1e-9;                    // floor for merging intersection points
pub const EPS_PARALLEL: f64 = 1e-12;                // sine of the angle below which segments are parallel

// Straight-angle reference for the acute/obtuse fold
pub const STRAIGHT_ANGLE_DEG: f64 = 180.0;

#[inline] pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 { x.max(lo).min(hi) }
#[inline] pub fn clamp01(x: f64) -> f64 { clamp(x, 0.0, 1.0) }
#[inline] pub fn near_zero(x: f64, eps: f64) -> bool { x.abs() <= eps }
