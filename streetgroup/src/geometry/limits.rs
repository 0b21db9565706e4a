// Centralized ingestion limits to harden against untrusted input (GeoJSON)

// Collection size caps
pub const MAX_RECORDS: usize = 200_000;

// Polylines
pub const MAX_POINTS_PER_POLYLINE: usize = 100_000;
pub const MAX_POINTS_TOTAL: usize = 5_000_000;

// Numeric bounds (covers lon/lat and projected metres)
pub const COORD_MIN: f64 = -1.0e9;
pub const COORD_MAX: f64 = 1.0e9;

// Render canvas
pub const CANVAS_MAX: u32 = 20_000;

#[inline]
pub fn in_coord_bounds(x: f64) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }

#[inline]
pub fn in_canvas_bounds(px: f64) -> bool { px.is_finite() && px >= 1.0 && px <= CANVAS_MAX as f64 }
