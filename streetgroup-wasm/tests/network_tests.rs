#![cfg(target_arch = "wasm32")]

use js_sys::Reflect;
use streetgroup_wasm::StreetNetwork;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn abc() -> StreetNetwork {
    let mut n = StreetNetwork::new();
    n.add_polyline(&[0.0, 0.0, 1.0, 0.0]).unwrap();
    n.add_polyline(&[1.0, 0.0, 2.0, 0.0]).unwrap();
    n.add_polyline(&[5.0, 5.0, 6.0, 5.0]).unwrap();
    n
}

#[wasm_bindgen_test]
fn groups_collinear_pair() {
    let mut n = abc();
    assert_eq!(n.group(), 2);
    assert_eq!(n.edge_count(), 1);
    assert_eq!(n.cluster_labels().to_vec(), vec![0, 0, 1]);
    assert_eq!(n.edges().to_vec(), vec![0, 1]);
    let rgba = n.colors_rgba().to_vec();
    assert_eq!(rgba.len(), 12);
    assert_eq!(&rgba[0..4], &rgba[4..8]);
    assert_eq!(rgba[3], 255);
}

#[wasm_bindgen_test]
fn cache_drops_on_change() {
    let mut n = abc();
    assert_eq!(n.group(), 2);
    n.add_polyline(&[6.0, 5.0, 7.0, 5.0]).unwrap();
    assert_eq!(n.group(), 2);
    assert_eq!(n.cluster_labels().to_vec(), vec![0, 0, 1, 1]);
    let r = n.set_angle_threshold_res(0.0);
    assert_eq!(Reflect::get(&r, &JsValue::from_str("ok")).unwrap(), JsValue::from_bool(true));
    assert_eq!(n.group(), 4);
}

#[wasm_bindgen_test]
fn geojson_round_trip_to_svg_and_json() {
    let mut n = StreetNetwork::new();
    let text = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{},"geometry":{"type":"LineString","coordinates":[[0,1],[2,1]]}},
        {"type":"Feature","properties":{},"geometry":{"type":"LineString","coordinates":[[1,0],[1,2]]}}]}"#;
    let r = n.load_geojson_res(text);
    assert_eq!(Reflect::get(&r, &JsValue::from_str("value")).unwrap().as_f64(), Some(2.0));
    assert_eq!(n.group(), 2);
    let svg = n.to_svg();
    assert_eq!(svg.matches("<path").count(), 2);
    let json = n.to_json();
    let count = Reflect::get(&json, &JsValue::from_str("cluster_count")).unwrap();
    assert_eq!(count.as_f64(), Some(2.0));
}

#[wasm_bindgen_test]
fn grid_toggle_keeps_grouping() {
    let mut n = abc();
    assert_eq!(n.group(), 2);
    assert!(!n.to_svg().contains("<line"));
    n.set_grid(true);
    assert!(n.to_svg().contains("<line"));
    assert_eq!(n.cluster_labels().to_vec(), vec![0, 0, 1]);
}
