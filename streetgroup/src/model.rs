use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn between(from: Point, to: Point) -> Self {
        Vec2 { x: to.x - from.x, y: to.y - from.y }
    }
}

/// Ordered vertex path. Fewer than two distinct points makes it degenerate;
/// degenerate polylines are kept but never connect to anything.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<Point>,
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Self {
        Polyline { points }
    }

    pub fn from_xy(coords: &[(f64, f64)]) -> Self {
        Polyline { points: coords.iter().map(|&(x, y)| Point { x, y }).collect() }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn endpoints(&self) -> Option<(Point, Point)> {
        Some((self.first()?, self.last()?))
    }

    pub fn is_degenerate(&self) -> bool {
        match self.points.first() {
            Some(p0) => self.points.iter().all(|p| p.x == p0.x && p.y == p0.y),
            None => true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    LineString(Polyline),
    /// Any other geometry kind; keeps its slot in the input but never
    /// connects and is never drawn.
    Other { kind: String },
}

impl Geometry {
    pub fn as_polyline(&self) -> Option<&Polyline> {
        match self {
            Geometry::LineString(p) => Some(p),
            Geometry::Other { .. } => None,
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            Geometry::LineString(_) => "LineString",
            Geometry::Other { kind } => kind,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StreetRecord {
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl StreetRecord {
    pub fn line(polyline: Polyline) -> Self {
        StreetRecord { geometry: Geometry::LineString(polyline), properties: serde_json::Map::new() }
    }

    pub fn other(kind: impl Into<String>) -> Self {
        StreetRecord { geometry: Geometry::Other { kind: kind.into() }, properties: serde_json::Map::new() }
    }

    pub fn polyline(&self) -> Option<&Polyline> {
        self.geometry.as_polyline()
    }
}
