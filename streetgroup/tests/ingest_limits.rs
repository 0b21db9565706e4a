use serde_json::json;
use streetgroup::geometry::limits;
use streetgroup::json::{load_geojson_value, load_value};
use streetgroup::{StreetError, StreetNetwork};

#[test]
fn geojson_caps_exceeded_features() {
    let feature = json!({"type": "Feature", "properties": {}, "geometry": null});
    let features = vec![feature; limits::MAX_RECORDS + 1];
    let v = json!({"type": "FeatureCollection", "features": features});
    let err = load_geojson_value(&v).unwrap_err();
    assert!(matches!(err, StreetError::LimitExceeded { what: "features", .. }));
}

#[test]
fn polyline_point_cap() {
    let coords: Vec<[f64; 2]> = (0..=limits::MAX_POINTS_PER_POLYLINE).map(|i| [i as f64, 0.0]).collect();
    let v = json!({"version": 1, "polylines": [coords]});
    assert_eq!(load_value(&v).unwrap_err().code(), "limit_exceeded");
}

#[test]
fn invalid_numbers_rejected() {
    let v = json!({"version": 1, "polylines": [[[1.0e12, 0.0], [0.0, 0.0]]]});
    assert_eq!(load_value(&v).unwrap_err().code(), "out_of_range");
    let mut net = StreetNetwork::new();
    assert_eq!(net.add_polyline(&[(f64::INFINITY, 0.0)]).unwrap_err().code(), "non_finite");
}

#[test]
fn network_record_cap() {
    let mut net = StreetNetwork::new();
    let lines = vec![serde_json::Value::Null; limits::MAX_RECORDS];
    assert_eq!(net.load_value(&json!({"version": 1, "polylines": lines})).unwrap(), limits::MAX_RECORDS);
    assert_eq!(net.add_polyline(&[(0.0, 0.0), (1.0, 0.0)]).unwrap_err().code(), "limit_exceeded");
    assert_eq!(net.len(), limits::MAX_RECORDS);
}

#[test]
fn structural_errors_have_codes() {
    assert_eq!(load_geojson_value(&json!({"features": []})).unwrap_err().code(), "invalid_geojson");
    assert_eq!(load_geojson_value(&json!({"type": "FeatureCollection"})).unwrap_err().code(), "invalid_geojson");
    assert_eq!(
        load_geojson_value(&json!({"type": "FeatureCollection", "features": [{"type": "Thing"}]})).unwrap_err().code(),
        "invalid_geojson"
    );
    let mut net = StreetNetwork::new();
    assert_eq!(net.load_str("not json").unwrap_err().code(), "invalid_json");
}
