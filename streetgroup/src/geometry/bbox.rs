use crate::model::{Point, Polyline};

/// Axis-aligned bounds (min_x, min_y, max_x, max_y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bbox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bbox {
    pub fn of_point(p: Point) -> Self {
        Bbox { min_x: p.x, min_y: p.y, max_x: p.x, max_y: p.y }
    }

    pub fn of_segment(a: Point, b: Point) -> Self {
        Bbox { min_x: a.x.min(b.x), min_y: a.y.min(b.y), max_x: a.x.max(b.x), max_y: a.y.max(b.y) }
    }

    pub fn of_polyline(line: &Polyline) -> Option<Self> {
        let mut it = line.points.iter();
        let mut bb = Bbox::of_point(*it.next()?);
        for p in it {
            bb.min_x = bb.min_x.min(p.x);
            bb.min_y = bb.min_y.min(p.y);
            bb.max_x = bb.max_x.max(p.x);
            bb.max_y = bb.max_y.max(p.y);
        }
        Some(bb)
    }

    pub fn union(a: Option<Bbox>, b: Option<Bbox>) -> Option<Bbox> {
        match (a, b) {
            (None, x) => x,
            (x, None) => x,
            (Some(a), Some(b)) => Some(Bbox {
                min_x: a.min_x.min(b.min_x),
                min_y: a.min_y.min(b.min_y),
                max_x: a.max_x.max(b.max_x),
                max_y: a.max_y.max(b.max_y),
            }),
        }
    }

    pub fn expand(&self, pad: f64) -> Bbox {
        Bbox { min_x: self.min_x - pad, min_y: self.min_y - pad, max_x: self.max_x + pad, max_y: self.max_y + pad }
    }

    /// Closed-interval overlap; touching boxes overlap.
    pub fn overlaps(&self, other: &Bbox) -> bool {
        !(self.max_x < other.min_x || other.max_x < self.min_x
            || self.max_y < other.min_y || other.max_y < self.min_y)
    }

    pub fn width(&self) -> f64 { self.max_x - self.min_x }
    pub fn height(&self) -> f64 { self.max_y - self.min_y }
}
