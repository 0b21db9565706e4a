use serde_json::Value;

use crate::algorithms::components::{partition, Clustering};
use crate::algorithms::graph_build::{build_graph, ConnectivityGraph};
use crate::config::GroupingConfig;
use crate::error::Result;
use crate::events::{ProgressEvent, ProgressObserver};
use crate::json;
use crate::model::{Color, Polyline, StreetRecord};
use crate::svg::{render_svg, SvgOptions};

// Stand-in for records that carry no line; has no bbox and never connects.
static NO_LINE: Polyline = Polyline { points: Vec::new() };

/// Result of one grouping run, indexed like the input records.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupingOutput {
    pub graph: ConnectivityGraph,
    pub clustering: Clustering,
    pub colors: Vec<Color>,
}

impl GroupingOutput {
    pub fn cluster_count(&self) -> usize {
        self.clustering.cluster_count()
    }

    pub fn to_json_value(&self) -> Value {
        json::result_to_json(&self.graph, &self.clustering, &self.colors)
    }

    pub fn render_svg(&self, records: &[StreetRecord], opts: &SvgOptions) -> String {
        render_svg(records, &self.colors, opts)
    }
}

/// Build, partition, color. The configuration is validated first; after
/// that nothing can fail.
pub fn run(records: &[StreetRecord], cfg: &GroupingConfig, observer: &dyn ProgressObserver) -> Result<GroupingOutput> {
    cfg.validate()?;
    let lines: Vec<&Polyline> = records.iter().map(|r| r.polyline().unwrap_or(&NO_LINE)).collect();
    let graph = build_graph(&lines, &cfg.connectivity, &cfg.build, observer);
    let clustering = partition(&graph);
    observer.on_event(&ProgressEvent::PartitionFinished { clusters: clustering.cluster_count() });
    let colors = cfg.palette.assign(&clustering);
    Ok(GroupingOutput { graph, clustering, colors })
}

/// Text in, grouping and rendered SVG out.
pub fn run_str(text: &str, cfg: &GroupingConfig, observer: &dyn ProgressObserver) -> Result<(Vec<StreetRecord>, GroupingOutput, String)> {
    let records = json::load_str(text)?;
    let out = run(&records, cfg, observer)?;
    let svg = out.render_svg(&records, &cfg.render);
    Ok((records, out, svg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NoopObserver;

    #[test]
    fn non_line_records_keep_their_slot() {
        let records = vec![
            StreetRecord::line(Polyline::from_xy(&[(0.0, 0.0), (1.0, 0.0)])),
            StreetRecord::other("Point"),
            StreetRecord::line(Polyline::from_xy(&[(1.0, 0.0), (2.0, 0.0)])),
        ];
        let out = run(&records, &GroupingConfig::default(), &NoopObserver).unwrap();
        assert_eq!(out.clustering.len(), 3);
        assert_eq!(out.graph.edges(), &[(0, 2)]);
        assert_eq!(out.cluster_count(), 2);
        assert_eq!(out.colors[0], out.colors[2]);
    }

    #[test]
    fn invalid_config_fails_before_work() {
        let mut cfg = GroupingConfig::default();
        cfg.connectivity.distance_tolerance = f64::NAN;
        assert_eq!(run(&[], &cfg, &NoopObserver).unwrap_err().code(), "non_finite");
    }

    #[test]
    fn run_str_renders() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{},"geometry":{"type":"LineString","coordinates":[[0,0],[1,0]]}}]}"#;
        let (records, out, svg) = run_str(text, &GroupingConfig::default(), &NoopObserver).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(out.cluster_count(), 1);
        assert_eq!(svg.matches("<path").count(), 1);
    }
}
