pub mod model;
pub mod error;
pub mod events;
pub mod color;
pub mod config;
pub mod pipeline;
pub mod json;
pub mod input;
#[cfg(feature = "shapefile")]
pub mod shp;
pub mod svg;
pub mod geometry {
    pub mod bbox;
    pub mod intersect;
    pub mod limits;
    pub mod math;
    pub mod tangent;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod components;
    pub mod connectivity;
    pub mod graph_build;
}

pub use algorithms::components::{partition, Clustering, UnionFind};
pub use algorithms::connectivity::{
    are_connected, classify, AdjacencyMode, Connection, ConnectivityConfig, DirectionPolicy,
};
pub use algorithms::graph_build::{build_graph, BuildOptions, ConnectivityGraph};
pub use color::{ColorScheme, Palette};
pub use config::GroupingConfig;
pub use error::{Result, StreetError};
pub use events::{NoopObserver, ProgressEvent, ProgressObserver, TracingObserver};
pub use model::{Color, Geometry, Point, Polyline, StreetRecord, Vec2};
pub use pipeline::GroupingOutput;
pub use svg::SvgOptions;

use std::path::Path;

use geometry::limits;
use serde_json::Value;

/// A street collection plus the settings used to group it. Records keep
/// their insertion index; every output is indexed the same way.
#[derive(Clone, Debug, Default)]
pub struct StreetNetwork {
    records: Vec<StreetRecord>,
    config: GroupingConfig,
    points: usize,
}

impl StreetNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GroupingConfig) -> Result<Self> {
        config.validate()?;
        Ok(StreetNetwork { config, ..Self::default() })
    }

    pub fn config(&self) -> &GroupingConfig { &self.config }
    pub fn config_mut(&mut self) -> &mut GroupingConfig { &mut self.config }

    pub fn set_config(&mut self, config: GroupingConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn len(&self) -> usize { self.records.len() }
    pub fn is_empty(&self) -> bool { self.records.is_empty() }
    pub fn records(&self) -> &[StreetRecord] { &self.records }

    pub fn clear(&mut self) {
        self.records.clear();
        self.points = 0;
    }

    fn check_capacity(&self, add_records: usize, add_points: usize) -> Result<()> {
        if self.records.len() + add_records > limits::MAX_RECORDS {
            return Err(StreetError::LimitExceeded { what: "records", max: limits::MAX_RECORDS });
        }
        if self.points + add_points > limits::MAX_POINTS_TOTAL {
            return Err(StreetError::LimitExceeded { what: "total points", max: limits::MAX_POINTS_TOTAL });
        }
        Ok(())
    }

    /// Adds one street from flat `(x, y)` pairs. Returns its index.
    pub fn add_polyline(&mut self, coords: &[(f64, f64)]) -> Result<u32> {
        if coords.len() > limits::MAX_POINTS_PER_POLYLINE {
            return Err(StreetError::LimitExceeded { what: "points per polyline", max: limits::MAX_POINTS_PER_POLYLINE });
        }
        for &(x, y) in coords {
            for (name, v) in [("x", x), ("y", y)] {
                if !v.is_finite() {
                    return Err(StreetError::non_finite(name));
                }
                if !limits::in_coord_bounds(v) {
                    return Err(StreetError::out_of_range(name, limits::COORD_MIN, limits::COORD_MAX, v));
                }
            }
        }
        self.add_record(StreetRecord::line(Polyline::from_xy(coords)))
    }

    /// Adds a record as-is; use the loaders for untrusted input.
    pub fn add_record(&mut self, record: StreetRecord) -> Result<u32> {
        let n = record.polyline().map_or(0, Polyline::len);
        self.check_capacity(1, n)?;
        self.points += n;
        self.records.push(record);
        Ok((self.records.len() - 1) as u32)
    }

    /// Appends every record of a GeoJSON or native document. Nothing is added
    /// on error. Returns how many records were added.
    pub fn load_value(&mut self, v: &Value) -> Result<usize> {
        let loaded = json::load_value(v)?;
        self.extend_checked(loaded)
    }

    pub fn load_geojson_value(&mut self, v: &Value) -> Result<usize> {
        let loaded = json::load_geojson_value(v)?;
        self.extend_checked(loaded)
    }

    fn extend_checked(&mut self, loaded: Vec<StreetRecord>) -> Result<usize> {
        let n_points: usize = loaded.iter().filter_map(StreetRecord::polyline).map(Polyline::len).sum();
        self.check_capacity(loaded.len(), n_points)?;
        let added = loaded.len();
        self.points += n_points;
        self.records.extend(loaded);
        tracing::debug!(added, total = self.records.len(), "records loaded");
        Ok(added)
    }

    /// Appends the records of a file; see [`input::load_path`].
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let loaded = input::load_path(path.as_ref())?;
        self.extend_checked(loaded)
    }

    pub fn load_str(&mut self, text: &str) -> Result<usize> {
        let v: Value = serde_json::from_str(text)?;
        self.load_value(&v)
    }

    pub fn group(&self) -> Result<GroupingOutput> {
        self.group_with_observer(&NoopObserver)
    }

    pub fn group_with_observer(&self, observer: &dyn ProgressObserver) -> Result<GroupingOutput> {
        pipeline::run(&self.records, &self.config, observer)
    }

    pub fn colors(&self) -> Result<Vec<Color>> {
        Ok(self.group()?.colors)
    }

    pub fn to_svg(&self) -> Result<String> {
        let out = self.group()?;
        Ok(out.render_svg(&self.records, &self.config.render))
    }

    pub fn to_json_value(&self) -> Result<Value> {
        Ok(self.group()?.to_json_value())
    }

    pub fn to_document_value(&self) -> Value {
        json::to_document_value(&self.records)
    }
}
