#![cfg(target_arch = "wasm32")]

use js_sys::Reflect;
use streetgroup_wasm::StreetNetwork;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn is_err(v: &JsValue, code: &str) -> bool {
    if let Ok(ok) =
        Reflect::get(v, &JsValue::from_str("ok")).and_then(|x| x.as_bool().ok_or(JsValue::NULL))
    {
        if ok {
            return false;
        }
        if let Ok(err) = Reflect::get(v, &JsValue::from_str("error")) {
            if let Ok(c) = Reflect::get(&err, &JsValue::from_str("code")) {
                return c.as_string().map_or(false, |s| s == code);
            }
        }
    }
    false
}

#[wasm_bindgen_test]
fn bad_coordinates_return_typed_errors() {
    let mut n = StreetNetwork::new();
    assert!(is_err(&n.add_polyline_res(&[0.0, 0.0, 1.0]), "invalid_length"));
    assert!(is_err(&n.add_polyline_res(&[0.0, f64::NAN]), "non_finite"));
    assert!(is_err(&n.add_polyline_res(&[0.0, 5.0e9]), "out_of_range"));
    assert_eq!(n.polyline_count(), 0, "state mutated on error");
    assert_eq!(n.add_polyline(&[0.0, 0.0, 1.0]), None);
}

#[wasm_bindgen_test]
fn settings_are_validated() {
    let mut n = StreetNetwork::new();
    assert!(is_err(&n.set_angle_threshold_res(f64::INFINITY), "non_finite"));
    assert!(is_err(&n.set_angle_threshold_res(181.0), "out_of_range"));
    assert!(is_err(&n.set_distance_tolerance_res(-1.0), "out_of_range"));
    assert!(is_err(&n.set_mode_res("nearest"), "invalid_mode"));
    assert!(is_err(&n.set_canvas_res(0.0, 10.0), "out_of_range"));
    assert_eq!(n.angle_threshold(), 30.0);
    assert!(!is_err(&n.set_mode_res("endpoint"), "invalid_mode"));
}

#[wasm_bindgen_test]
fn loader_errors_keep_existing_records() {
    let mut n = StreetNetwork::new();
    n.add_polyline(&[0.0, 0.0, 1.0, 0.0]).unwrap();
    assert!(is_err(&n.load_geojson_res("{"), "invalid_json"));
    assert!(is_err(&n.load_geojson_res(r#"{"type":"FeatureCollection"}"#), "invalid_geojson"));
    assert_eq!(n.polyline_count(), 1);
}
