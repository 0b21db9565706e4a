#![cfg(feature = "shapefile")]

use std::io::Cursor;

use streetgroup::geometry::limits;
use streetgroup::shp::load_shapes;
use streetgroup::{Polyline, StreetNetwork};

const POLYLINE: i32 = 3;

// Minimal `.shp` writer: `None` is a null shape, `Some(parts)` a polyline.
fn shp_bytes(shapes: &[Option<Vec<Vec<(f64, f64)>>>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (i, shape) in shapes.iter().enumerate() {
        let mut content = Vec::new();
        match shape {
            None => content.extend_from_slice(&0i32.to_le_bytes()),
            Some(parts) => {
                let n_points: usize = parts.iter().map(Vec::len).sum();
                content.extend_from_slice(&POLYLINE.to_le_bytes());
                for _ in 0..4 {
                    content.extend_from_slice(&0f64.to_le_bytes());
                }
                content.extend_from_slice(&(parts.len() as i32).to_le_bytes());
                content.extend_from_slice(&(n_points as i32).to_le_bytes());
                let mut start = 0i32;
                for part in parts {
                    content.extend_from_slice(&start.to_le_bytes());
                    start += part.len() as i32;
                }
                for &(x, y) in parts.iter().flatten() {
                    content.extend_from_slice(&x.to_le_bytes());
                    content.extend_from_slice(&y.to_le_bytes());
                }
            }
        }
        body.extend_from_slice(&(i as i32 + 1).to_be_bytes());
        body.extend_from_slice(&((content.len() / 2) as i32).to_be_bytes());
        body.extend_from_slice(&content);
    }
    let mut out = Vec::new();
    out.extend_from_slice(&9994i32.to_be_bytes());
    for _ in 0..5 {
        out.extend_from_slice(&0i32.to_be_bytes());
    }
    out.extend_from_slice(&(((100 + body.len()) / 2) as i32).to_be_bytes());
    out.extend_from_slice(&1000i32.to_le_bytes());
    out.extend_from_slice(&POLYLINE.to_le_bytes());
    for _ in 0..8 {
        out.extend_from_slice(&0f64.to_le_bytes());
    }
    out.extend_from_slice(&body);
    out
}

fn roads() -> Vec<Option<Vec<Vec<(f64, f64)>>>> {
    vec![
        Some(vec![vec![(0.0, 0.0), (1.0, 0.0)]]),
        None,
        Some(vec![vec![(0.0, 5.0), (1.0, 5.0)], vec![(2.0, 5.0), (3.0, 5.0)]]),
        Some(vec![vec![(1.0, 0.0), (2.0, 0.0)]]),
    ]
}

#[test]
fn shapes_keep_file_order() {
    let records = load_shapes(Cursor::new(shp_bytes(&roads()))).unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(records[0].polyline(), Some(&Polyline::from_xy(&[(0.0, 0.0), (1.0, 0.0)])));
    assert_eq!(records[1].geometry.kind(), "null");
    assert_eq!(records[2].geometry.kind(), "MultiLineString");
    assert!(records[2].polyline().is_none());
    assert_eq!(records[3].polyline(), Some(&Polyline::from_xy(&[(1.0, 0.0), (2.0, 0.0)])));
}

#[test]
fn shapefile_groups_like_geojson() {
    let path = std::env::temp_dir().join(format!("streetgroup-roads-{}.shp", std::process::id()));
    std::fs::write(&path, shp_bytes(&roads())).unwrap();
    let mut net = StreetNetwork::new();
    let added = net.load_path(&path);
    std::fs::remove_file(&path).ok();
    assert_eq!(added.unwrap(), 4);
    let out = net.group().unwrap();
    assert_eq!(out.graph.edges(), &[(0, 3)]);
    assert_eq!(out.clustering.labels(), &[0, 1, 2, 0]);
}

#[test]
fn shapefile_coordinates_are_validated() {
    let bad = shp_bytes(&[Some(vec![vec![(0.0, 0.0), (f64::NAN, 1.0)]])]);
    assert_eq!(load_shapes(Cursor::new(bad)).unwrap_err().code(), "non_finite");
    let far = shp_bytes(&[Some(vec![vec![(0.0, 0.0), (5.0e9, 1.0)]])]);
    assert_eq!(load_shapes(Cursor::new(far)).unwrap_err().code(), "out_of_range");
}

#[test]
fn shapefile_point_cap() {
    let long: Vec<(f64, f64)> = (0..=limits::MAX_POINTS_PER_POLYLINE).map(|i| (i as f64, 0.0)).collect();
    let bytes = shp_bytes(&[Some(vec![long])]);
    assert_eq!(load_shapes(Cursor::new(bytes)).unwrap_err().code(), "limit_exceeded");
}

#[test]
fn broken_header_is_rejected() {
    let mut bytes = shp_bytes(&roads());
    bytes[..4].copy_from_slice(&1234i32.to_be_bytes());
    assert_eq!(load_shapes(Cursor::new(bytes)).unwrap_err().code(), "invalid_shapefile");
    let mut net = StreetNetwork::new();
    assert_eq!(net.load_path("does/not/exist.shp").unwrap_err().code(), "io");
    assert!(net.is_empty());
}
