use crate::algorithms::components::Clustering;
use crate::algorithms::graph_build::ConnectivityGraph;
use crate::error::{Result, StreetError};
use crate::geometry::limits;
use crate::model::{Color, Geometry, Point, Polyline, StreetRecord};
use serde::Serialize;
use serde_json::{Map, Value};

pub const DOC_VERSION: u64 = 1;

// Running point count across one load
#[derive(Default)]
pub(crate) struct Budget {
    points: usize,
}

impl Budget {
    pub(crate) fn take(&mut self, n: usize) -> Result<()> {
        if n > limits::MAX_POINTS_PER_POLYLINE {
            return Err(StreetError::LimitExceeded { what: "points per polyline", max: limits::MAX_POINTS_PER_POLYLINE });
        }
        self.points += n;
        if self.points > limits::MAX_POINTS_TOTAL {
            return Err(StreetError::LimitExceeded { what: "total points", max: limits::MAX_POINTS_TOTAL });
        }
        Ok(())
    }
}

fn parse_position(v: &Value) -> Result<Point> {
    let arr = v.as_array().ok_or_else(|| StreetError::geojson("position must be an array"))?;
    if arr.len() < 2 {
        return Err(StreetError::geojson("position needs at least two ordinates"));
    }
    let ord = |k: usize, name: &str| -> Result<f64> {
        let x = arr[k].as_f64().ok_or_else(|| StreetError::geojson(format!("{} must be a number", name)))?;
        if !x.is_finite() {
            return Err(StreetError::non_finite(name));
        }
        if !limits::in_coord_bounds(x) {
            return Err(StreetError::out_of_range(name, limits::COORD_MIN, limits::COORD_MAX, x));
        }
        Ok(x)
    };
    Ok(Point { x: ord(0, "x")?, y: ord(1, "y")? })
}

fn parse_line(coords: &Value, budget: &mut Budget) -> Result<Polyline> {
    let arr = coords.as_array().ok_or_else(|| StreetError::geojson("LineString coordinates must be an array"))?;
    budget.take(arr.len())?;
    let points = arr.iter().map(parse_position).collect::<Result<Vec<Point>>>()?;
    Ok(Polyline::new(points))
}

fn parse_geometry(g: &Value, budget: &mut Budget) -> Result<Geometry> {
    if g.is_null() {
        return Ok(Geometry::Other { kind: "null".to_string() });
    }
    let kind = g
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| StreetError::geojson("geometry without type"))?;
    match kind {
        "LineString" => {
            let coords = g.get("coordinates").ok_or_else(|| StreetError::geojson("LineString without coordinates"))?;
            Ok(Geometry::LineString(parse_line(coords, budget)?))
        }
        other => Ok(Geometry::Other { kind: other.to_string() }),
    }
}

fn parse_feature(f: &Value, budget: &mut Budget) -> Result<StreetRecord> {
    if f.get("type").and_then(Value::as_str) != Some("Feature") {
        return Err(StreetError::geojson("expected a Feature"));
    }
    let geometry = parse_geometry(f.get("geometry").unwrap_or(&Value::Null), budget)?;
    let properties = match f.get("properties") {
        Some(Value::Object(m)) => m.clone(),
        _ => Map::new(),
    };
    Ok(StreetRecord { geometry, properties })
}

/// GeoJSON `FeatureCollection`, single `Feature`, or bare geometry. Every
/// feature becomes one record in input order; only `LineString`s carry
/// geometry the grouping uses.
pub fn load_geojson_value(v: &Value) -> Result<Vec<StreetRecord>> {
    let mut budget = Budget::default();
    match v.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            let feats = v
                .get("features")
                .and_then(Value::as_array)
                .ok_or_else(|| StreetError::geojson("FeatureCollection without features array"))?;
            if feats.len() > limits::MAX_RECORDS {
                return Err(StreetError::LimitExceeded { what: "features", max: limits::MAX_RECORDS });
            }
            feats.iter().map(|f| parse_feature(f, &mut budget)).collect()
        }
        Some("Feature") => Ok(vec![parse_feature(v, &mut budget)?]),
        Some(_) => Ok(vec![StreetRecord { geometry: parse_geometry(v, &mut budget)?, properties: Map::new() }]),
        None => Err(StreetError::geojson("missing type")),
    }
}

/// Native document: `{"version": 1, "polylines": [[[x, y], ...], null, ...]}`.
/// An optional parallel `kinds` array names the geometry behind each `null`.
pub fn load_document_value(v: &Value) -> Result<Vec<StreetRecord>> {
    let version = v.get("version").and_then(Value::as_u64).unwrap_or(DOC_VERSION);
    if version != DOC_VERSION {
        return Err(StreetError::geojson(format!("unsupported document version {}", version)));
    }
    let lines = v
        .get("polylines")
        .and_then(Value::as_array)
        .ok_or_else(|| StreetError::geojson("document without polylines array"))?;
    if lines.len() > limits::MAX_RECORDS {
        return Err(StreetError::LimitExceeded { what: "polylines", max: limits::MAX_RECORDS });
    }
    let kinds = match v.get("kinds") {
        None | Some(Value::Null) => None,
        Some(Value::Array(k)) if k.len() == lines.len() => Some(k),
        Some(_) => return Err(StreetError::geojson("kinds must be an array as long as polylines")),
    };
    let mut budget = Budget::default();
    lines
        .iter()
        .enumerate()
        .map(|(i, l)| {
            if l.is_null() {
                let kind = kinds.and_then(|k| k[i].as_str()).unwrap_or("null");
                Ok(StreetRecord::other(kind))
            } else {
                Ok(StreetRecord::line(parse_line(l, &mut budget)?))
            }
        })
        .collect()
}

/// Dispatches on the document shape.
pub fn load_value(v: &Value) -> Result<Vec<StreetRecord>> {
    if v.get("polylines").is_some() {
        load_document_value(v)
    } else {
        load_geojson_value(v)
    }
}

pub fn load_str(text: &str) -> Result<Vec<StreetRecord>> {
    let v: Value = serde_json::from_str(text)?;
    load_value(&v)
}

pub fn to_document_value(records: &[StreetRecord]) -> Value {
    #[derive(Serialize)]
    struct Doc<'a> {
        version: u64,
        polylines: Vec<Option<Vec<[f64; 2]>>>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        kinds: Vec<&'a str>,
    }
    let polylines = records
        .iter()
        .map(|r| r.polyline().map(|l| l.points.iter().map(|p| [p.x, p.y]).collect()))
        .collect();
    let kinds = if records.iter().all(|r| r.polyline().is_some()) {
        Vec::new()
    } else {
        records.iter().map(|r| r.geometry.kind()).collect()
    };
    serde_json::to_value(Doc { version: DOC_VERSION, polylines, kinds }).unwrap_or(Value::Null)
}

/// Grouping result: one item per input index with its cluster and color.
pub fn result_to_json(graph: &ConnectivityGraph, clustering: &Clustering, colors: &[Color]) -> Value {
    #[derive(Serialize)]
    struct Item {
        index: u32,
        cluster: u32,
        color: String,
    }
    #[derive(Serialize)]
    struct Doc {
        version: u64,
        cluster_count: usize,
        edge_count: usize,
        edges: Vec<[u32; 2]>,
        items: Vec<Item>,
    }
    let items = clustering
        .labels()
        .iter()
        .enumerate()
        .map(|(i, &cluster)| Item {
            index: i as u32,
            cluster,
            color: colors.get(i).map(Color::to_hex).unwrap_or_default(),
        })
        .collect();
    let doc = Doc {
        version: DOC_VERSION,
        cluster_count: clustering.cluster_count(),
        edge_count: graph.edge_count(),
        edges: graph.edges().iter().map(|&(a, b)| [a, b]).collect(),
        items,
    };
    serde_json::to_value(doc).unwrap_or(Value::Null)
}
