//! Pairwise street predicate.
//!
//! Two polylines belong to the same street when they touch and run in nearly
//! the same direction at the touch point. "Touch" is either endpoint
//! proximity or a single-point intersection; "direction" is either the local
//! tangent at the touch point or the first-to-last chord. The historical
//! variants are presets of this one predicate.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StreetError};
use crate::geometry::intersect::intersect_polylines;
use crate::geometry::limits::COORD_MAX;
use crate::geometry::math::{distance, fold_angle_deg};
use crate::geometry::tangent::{chord_vector, direction_vector};
use crate::geometry::tolerance::{
    DEFAULT_ANGLE_THRESHOLD_DEG, DEFAULT_DISTANCE_TOLERANCE, STRAIGHT_ANGLE_DEG,
};
use crate::model::{Point, Polyline, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjacencyMode {
    /// Some endpoint of one line lies within tolerance of an endpoint of the other.
    EndpointProximity,
    /// The lines intersect in exactly one point.
    Intersection,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionPolicy {
    LocalTangent,
    Chord,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectivityConfig {
    pub mode: AdjacencyMode,
    pub direction: DirectionPolicy,
    pub angle_threshold_deg: f64,
    pub distance_tolerance: f64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        ConnectivityConfig::intersection()
    }
}

impl ConnectivityConfig {
    /// Endpoint proximity judged on whole-line chords.
    pub fn endpoint() -> Self {
        ConnectivityConfig {
            mode: AdjacencyMode::EndpointProximity,
            direction: DirectionPolicy::Chord,
            angle_threshold_deg: DEFAULT_ANGLE_THRESHOLD_DEG,
            distance_tolerance: DEFAULT_DISTANCE_TOLERANCE,
        }
    }

    /// Single-point intersection judged on local tangents.
    pub fn intersection() -> Self {
        ConnectivityConfig {
            mode: AdjacencyMode::Intersection,
            direction: DirectionPolicy::LocalTangent,
            ..ConnectivityConfig::endpoint()
        }
    }

    /// Single-point intersection judged on whole-line chords.
    pub fn intersection_chord() -> Self {
        ConnectivityConfig {
            mode: AdjacencyMode::Intersection,
            direction: DirectionPolicy::Chord,
            ..ConnectivityConfig::endpoint()
        }
    }

    /// Preset by name: `endpoint`, `intersection` or `intersection-chord`.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "endpoint" => Some(Self::endpoint()),
            "intersection" => Some(Self::intersection()),
            "intersection-chord" | "intersection_chord" => Some(Self::intersection_chord()),
            _ => None,
        }
    }

    pub fn with_angle_threshold(mut self, degrees: f64) -> Self {
        self.angle_threshold_deg = degrees;
        self
    }

    pub fn with_distance_tolerance(mut self, tolerance: f64) -> Self {
        self.distance_tolerance = tolerance;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let a = self.angle_threshold_deg;
        if !a.is_finite() {
            return Err(StreetError::non_finite("angle_threshold_deg"));
        }
        if !(0.0..=STRAIGHT_ANGLE_DEG).contains(&a) {
            return Err(StreetError::out_of_range("angle_threshold_deg", 0.0, STRAIGHT_ANGLE_DEG, a));
        }
        let d = self.distance_tolerance;
        if !d.is_finite() {
            return Err(StreetError::non_finite("distance_tolerance"));
        }
        if !(0.0..=COORD_MAX).contains(&d) {
            return Err(StreetError::out_of_range("distance_tolerance", 0.0, COORD_MAX, d));
        }
        Ok(())
    }
}

/// Outcome of the angle test for an adjacent pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    pub touch: Point,
    /// Folded angle in degrees, in [0, 90]; 180 when a direction is degenerate.
    pub angle_deg: f64,
    pub connected: bool,
}

// Total order on polylines so the pair is always evaluated the same way round.
fn cmp_polylines(a: &Polyline, b: &Polyline) -> Ordering {
    for (p, q) in a.points.iter().zip(b.points.iter()) {
        let ord = p.x.total_cmp(&q.x).then(p.y.total_cmp(&q.y));
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.points.len().cmp(&b.points.len())
}

fn endpoint_touch(a: &Polyline, b: &Polyline, tolerance: f64) -> Option<Point> {
    let (a0, a1) = a.endpoints()?;
    let (b0, b1) = b.endpoints()?;
    let mut best: Option<(f64, Point)> = None;
    for (p, q) in [(a0, b0), (a0, b1), (a1, b0), (a1, b1)] {
        let d = distance(p, q);
        if d <= tolerance && best.map_or(true, |(bd, _)| d < bd) {
            let mid = Point { x: 0.5 * (p.x + q.x), y: 0.5 * (p.y + q.y) };
            best = Some((d, mid));
        }
    }
    best.map(|(_, p)| p)
}

/// Touch point of the pair under the configured adjacency mode.
pub fn adjacency(a: &Polyline, b: &Polyline, cfg: &ConnectivityConfig) -> Option<Point> {
    let (a, b) = if cmp_polylines(a, b) == Ordering::Greater { (b, a) } else { (a, b) };
    match cfg.mode {
        AdjacencyMode::EndpointProximity => endpoint_touch(a, b, cfg.distance_tolerance),
        AdjacencyMode::Intersection => intersect_polylines(a, b, cfg.distance_tolerance).single_point(),
    }
}

fn direction(line: &Polyline, touch: Point, policy: DirectionPolicy) -> Vec2 {
    match policy {
        DirectionPolicy::LocalTangent => direction_vector(line, touch),
        DirectionPolicy::Chord => chord_vector(line),
    }
}

/// Adjacency plus angle. `None` when the lines do not touch.
pub fn classify(a: &Polyline, b: &Polyline, cfg: &ConnectivityConfig) -> Option<Connection> {
    let touch = adjacency(a, b, cfg)?;
    let angle_deg = fold_angle_deg(direction(a, touch, cfg.direction), direction(b, touch, cfg.direction));
    Some(Connection { touch, angle_deg, connected: angle_deg < cfg.angle_threshold_deg })
}

pub fn are_connected(a: &Polyline, b: &Polyline, cfg: &ConnectivityConfig) -> bool {
    classify(a, b, cfg).map_or(false, |c| c.connected)
}
