//! ESRI shapefile input. Only the `.shp` geometry stream is read; attribute
//! tables are not loaded, so records carry no properties.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use shapefile::{Shape, ShapeReader};

use crate::error::{Result, StreetError};
use crate::geometry::limits;
use crate::json::Budget;
use crate::model::{Point, Polyline, StreetRecord};

fn checked(name: &str, v: f64) -> Result<f64> {
    if !v.is_finite() {
        return Err(StreetError::non_finite(name));
    }
    if !limits::in_coord_bounds(v) {
        return Err(StreetError::out_of_range(name, limits::COORD_MIN, limits::COORD_MAX, v));
    }
    Ok(v)
}

// M and Z measures are dropped
fn xy_parts<P>(parts: &[Vec<P>], xy: impl Fn(&P) -> (f64, f64)) -> Vec<Vec<(f64, f64)>> {
    parts.iter().map(|part| part.iter().map(&xy).collect()).collect()
}

fn shape_record(shape: Shape, budget: &mut Budget) -> Result<StreetRecord> {
    let parts = match &shape {
        Shape::NullShape => return Ok(StreetRecord::other("null")),
        Shape::Polyline(l) => xy_parts(l.parts(), |p| (p.x, p.y)),
        Shape::PolylineM(l) => xy_parts(l.parts(), |p| (p.x, p.y)),
        Shape::PolylineZ(l) => xy_parts(l.parts(), |p| (p.x, p.y)),
        other => return Ok(StreetRecord::other(format!("{:?}", other.shapetype()))),
    };
    if parts.len() != 1 {
        return Ok(StreetRecord::other("MultiLineString"));
    }
    let part = &parts[0];
    budget.take(part.len())?;
    let points = part
        .iter()
        .map(|&(x, y)| Ok(Point { x: checked("x", x)?, y: checked("y", y)? }))
        .collect::<Result<Vec<Point>>>()?;
    Ok(StreetRecord::line(Polyline::new(points)))
}

/// Reads every shape of a `.shp` stream in file order. Single-part polylines
/// become lines; null shapes, multi-part polylines and every other shape type
/// are kept as non-line records so indices match the file.
pub fn load_shapes<T: Read + Seek>(source: T) -> Result<Vec<StreetRecord>> {
    let mut reader = ShapeReader::new(source)?;
    let mut budget = Budget::default();
    let mut records = Vec::new();
    for shape in reader.iter_shapes() {
        if records.len() >= limits::MAX_RECORDS {
            return Err(StreetError::LimitExceeded { what: "shapes", max: limits::MAX_RECORDS });
        }
        records.push(shape_record(shape?, &mut budget)?);
    }
    Ok(records)
}

pub fn load_shapefile(path: impl AsRef<Path>) -> Result<Vec<StreetRecord>> {
    let file = File::open(path)?;
    load_shapes(BufReader::new(file))
}
