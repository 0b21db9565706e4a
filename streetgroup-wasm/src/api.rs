use crate::StreetNetwork;
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;
use crate::error;
use crate::interop::{arr_u32, arr_u8, new_obj, set_kv, to_js};
use streetgroup::geometry::limits;
use streetgroup::ConnectivityConfig;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn pairs(coords: &[f64]) -> Vec<(f64, f64)> {
    coords.chunks_exact(2).map(|c| (c[0], c[1])).collect()
}

#[wasm_bindgen]
impl StreetNetwork {
    #[wasm_bindgen(constructor)]
    pub fn new() -> StreetNetwork {
        crate::StreetNetwork::rs_new()
    }

    // Records
    /// Flat `[x0, y0, x1, y1, ...]`. Returns the new index, or undefined when rejected.
    pub fn add_polyline(&mut self, coords: &[f64]) -> Option<u32> {
        if coords.len() % 2 != 0 {
            return None;
        }
        let id = self.inner.add_polyline(&pairs(coords)).ok()?;
        self.last = None;
        Some(id)
    }
    pub fn add_polyline_res(&mut self, coords: &[f64]) -> JsValue {
        if coords.len() % 2 != 0 {
            let d = new_obj();
            set_kv(&d, "len", &JsValue::from_f64(coords.len() as f64));
            return error::err("invalid_length", "coordinates must be flat x,y pairs", Some(d.into()));
        }
        match self.inner.add_polyline(&pairs(coords)) {
            Ok(id) => {
                self.last = None;
                error::ok(JsValue::from_f64(id as f64))
            }
            Err(e) => error::from_street(&e),
        }
    }
    /// GeoJSON or native document text. Nothing is added on error.
    pub fn load_geojson_res(&mut self, text: &str) -> JsValue {
        match self.inner.load_str(text) {
            Ok(n) => {
                self.last = None;
                error::ok(JsValue::from_f64(n as f64))
            }
            Err(e) => {
                web_sys::console::warn_1(&JsValue::from_str(&format!("streetgroup: load failed: {}", e)));
                error::from_street(&e)
            }
        }
    }
    pub fn load_geojson_object_res(&mut self, value: JsValue) -> JsValue {
        let v: serde_json::Value = match serde_wasm_bindgen::from_value(value) {
            Ok(v) => v,
            Err(e) => return error::err("invalid_geojson", e.to_string(), None),
        };
        match self.inner.load_value(&v) {
            Ok(n) => {
                self.last = None;
                error::ok(JsValue::from_f64(n as f64))
            }
            Err(e) => error::from_street(&e),
        }
    }
    pub fn polyline_count(&self) -> u32 {
        self.inner.len() as u32
    }
    pub fn clear(&mut self) {
        self.inner.clear();
        self.last = None;
    }

    // Settings
    pub fn angle_threshold(&self) -> f64 {
        self.inner.config().connectivity.angle_threshold_deg
    }
    pub fn set_angle_threshold_res(&mut self, degrees: f64) -> JsValue {
        let mut cfg = self.inner.config().clone();
        cfg.connectivity.angle_threshold_deg = degrees;
        self.apply(cfg)
    }
    pub fn distance_tolerance(&self) -> f64 {
        self.inner.config().connectivity.distance_tolerance
    }
    pub fn set_distance_tolerance_res(&mut self, tolerance: f64) -> JsValue {
        let mut cfg = self.inner.config().clone();
        cfg.connectivity.distance_tolerance = tolerance;
        self.apply(cfg)
    }
    /// `endpoint`, `intersection` or `intersection-chord`; keeps the current
    /// threshold and tolerance.
    pub fn set_mode_res(&mut self, mode: &str) -> JsValue {
        let Some(preset) = ConnectivityConfig::preset(mode) else {
            return error::invalid_mode(mode);
        };
        let mut cfg = self.inner.config().clone();
        cfg.connectivity.mode = preset.mode;
        cfg.connectivity.direction = preset.direction;
        self.apply(cfg)
    }
    pub fn set_seed(&mut self, seed: u32) {
        self.inner.config_mut().palette.seed = seed as u64;
        self.last = None;
    }
    pub fn set_grid(&mut self, on: bool) {
        self.inner.config_mut().render.grid = on;
    }
    pub fn set_canvas_res(&mut self, width: f64, height: f64) -> JsValue {
        if !width.is_finite() { return error::non_finite("width"); }
        if !height.is_finite() { return error::non_finite("height"); }
        for (name, v) in [("width", width), ("height", height)] {
            if !limits::in_canvas_bounds(v) {
                return error::out_of_range(name, 1.0, limits::CANVAS_MAX as f64, v);
            }
        }
        let mut cfg = self.inner.config().clone();
        cfg.render.width = width;
        cfg.render.height = height;
        self.apply(cfg)
    }

    // Grouping
    /// Cluster count; 0 when the grouping could not run.
    pub fn group(&mut self) -> u32 {
        self.grouped().map_or(0, |g| g.cluster_count() as u32)
    }
    pub fn group_res(&mut self) -> JsValue {
        match self.grouped() {
            Ok(g) => {
                let o = new_obj();
                set_kv(&o, "clusters", &JsValue::from_f64(g.cluster_count() as f64));
                set_kv(&o, "edges", &JsValue::from_f64(g.graph.edge_count() as f64));
                error::ok(o.into())
            }
            Err(e) => error::from_street(&e),
        }
    }
    pub fn edge_count(&mut self) -> u32 {
        self.grouped().map_or(0, |g| g.graph.edge_count() as u32)
    }
    /// Cluster id per record, indexed like the input.
    pub fn cluster_labels(&mut self) -> js_sys::Uint32Array {
        match self.grouped() {
            Ok(g) => arr_u32(g.clustering.labels()),
            Err(_) => arr_u32(&[]),
        }
    }
    /// Flat edge list `[a0, b0, a1, b1, ...]`.
    pub fn edges(&mut self) -> js_sys::Uint32Array {
        match self.grouped() {
            Ok(g) => arr_u32(&g.graph.edges().iter().flat_map(|&(a, b)| [a, b]).collect::<Vec<u32>>()),
            Err(_) => arr_u32(&[]),
        }
    }
    /// RGBA bytes per record.
    pub fn colors_rgba(&mut self) -> js_sys::Uint8Array {
        match self.grouped() {
            Ok(g) => arr_u8(&g.colors.iter().flat_map(|c| [c.r, c.g, c.b, c.a]).collect::<Vec<u8>>()),
            Err(_) => arr_u8(&[]),
        }
    }
    pub fn to_svg(&mut self) -> String {
        let colors = match self.grouped() {
            Ok(g) => g.colors.clone(),
            Err(_) => return String::new(),
        };
        streetgroup::svg::render_svg(self.inner.records(), &colors, &self.inner.config().render)
    }
    pub fn to_json(&mut self) -> JsValue {
        match self.grouped() {
            Ok(g) => to_js(&g.to_json_value()),
            Err(_) => JsValue::NULL,
        }
    }
}

impl StreetNetwork {
    fn apply(&mut self, cfg: streetgroup::GroupingConfig) -> JsValue {
        match self.inner.set_config(cfg) {
            Ok(()) => {
                self.last = None;
                error::ok(JsValue::from_bool(true))
            }
            Err(e) => error::from_street(&e),
        }
    }
}

impl Default for StreetNetwork {
    fn default() -> Self {
        Self::new()
    }
}
