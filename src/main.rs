use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use streetgroup::input;
use streetgroup::{ConnectivityConfig, GroupingConfig, TracingObserver};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Group road centerlines into streets and color each street.
#[derive(Parser, Debug)]
#[command(name = "streetgroup")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Cluster road centerlines into streets by touch and angle")]
struct Cli {
    /// Shapefile (.shp), GeoJSON FeatureCollection or native polyline document
    input: PathBuf,

    /// SVG output path
    #[arg(short, long, default_value = "solution.svg")]
    output: PathBuf,

    /// Also write per-line cluster ids and colors as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// JSON configuration file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// endpoint, intersection or intersection-chord
    #[arg(long)]
    mode: Option<String>,

    /// Maximum folded angle in degrees for two lines to join
    #[arg(long)]
    angle: Option<f64>,

    /// Touch distance in input units
    #[arg(long)]
    tolerance: Option<f64>,

    /// Palette seed
    #[arg(long)]
    seed: Option<u64>,

    /// Evaluate every pair instead of bounding-box candidates
    #[arg(long)]
    no_prefilter: bool,

    /// Draw a coordinate grid behind the streets
    #[arg(long)]
    grid: bool,

    /// Skip the SVG
    #[arg(long)]
    no_svg: bool,
}

fn load_config(cli: &Cli) -> Result<GroupingConfig> {
    let mut cfg = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            GroupingConfig::from_json_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => GroupingConfig::default(),
    };
    apply_overrides(&mut cfg, cli)?;
    cfg.validate()?;
    Ok(cfg)
}

// Flags win over the config file; unset flags leave it alone.
fn apply_overrides(cfg: &mut GroupingConfig, cli: &Cli) -> Result<()> {
    if let Some(mode) = &cli.mode {
        let Some(preset) = ConnectivityConfig::preset(mode) else {
            bail!("unknown mode '{}': expected endpoint, intersection or intersection-chord", mode);
        };
        cfg.connectivity.mode = preset.mode;
        cfg.connectivity.direction = preset.direction;
    }
    if let Some(angle) = cli.angle {
        cfg.connectivity.angle_threshold_deg = angle;
    }
    if let Some(tol) = cli.tolerance {
        cfg.connectivity.distance_tolerance = tol;
    }
    if let Some(seed) = cli.seed {
        cfg.palette.seed = seed;
    }
    if cli.no_prefilter {
        cfg.build.prefilter = false;
    }
    if cli.grid {
        cfg.render.grid = true;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "streetgroup=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cfg = load_config(&cli)?;
    tracing::debug!(connectivity = ?cfg.connectivity, prefilter = cfg.build.prefilter, "configuration");

    let records = input::load_path(&cli.input).with_context(|| format!("loading {}", cli.input.display()))?;
    let lines = records.iter().filter(|r| r.polyline().is_some()).count();
    let degenerate = records.iter().filter_map(|r| r.polyline()).filter(|l| l.is_degenerate()).count();
    tracing::info!(records = records.len(), lines, degenerate, "input loaded");

    let out = streetgroup::pipeline::run(&records, &cfg, &TracingObserver)?;

    if !cli.no_svg {
        let svg = out.render_svg(&records, &cfg.render);
        fs::write(&cli.output, svg).with_context(|| format!("writing {}", cli.output.display()))?;
        tracing::info!(path = %cli.output.display(), "svg written");
    }
    if let Some(path) = &cli.json {
        let doc = serde_json::to_string_pretty(&out.to_json_value())?;
        fs::write(path, doc).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "json written");
    }

    println!(
        "{} streets from {} lines ({} connections)",
        out.cluster_count(),
        records.len(),
        out.graph.edge_count()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use streetgroup::{AdjacencyMode, DirectionPolicy};

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("streetgroup").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn no_flags_keep_the_file_values() {
        let mut cfg = GroupingConfig::from_json_str(
            r#"{"connectivity": {"angle_threshold_deg": 12.0}, "palette": {"seed": 7}}"#,
        )
        .unwrap();
        let before = cfg.clone();
        apply_overrides(&mut cfg, &cli(&["roads.shp"])).unwrap();
        assert_eq!(cfg, before);
    }

    #[test]
    fn flags_override_the_file() {
        let mut cfg = GroupingConfig::from_json_str(r#"{"connectivity": {"angle_threshold_deg": 12.0}}"#).unwrap();
        let args = cli(&[
            "roads.shp", "--mode", "endpoint", "--angle", "20", "--tolerance", "0.5", "--seed", "9", "--no-prefilter", "--grid",
        ]);
        apply_overrides(&mut cfg, &args).unwrap();
        assert_eq!(cfg.connectivity.mode, AdjacencyMode::EndpointProximity);
        assert_eq!(cfg.connectivity.direction, DirectionPolicy::Chord);
        assert_eq!(cfg.connectivity.angle_threshold_deg, 20.0);
        assert_eq!(cfg.connectivity.distance_tolerance, 0.5);
        assert_eq!(cfg.palette.seed, 9);
        assert!(!cfg.build.prefilter);
        assert!(cfg.render.grid);
    }

    #[test]
    fn mode_only_replaces_mode_and_direction() {
        let mut cfg = GroupingConfig::default();
        cfg.connectivity.angle_threshold_deg = 10.0;
        apply_overrides(&mut cfg, &cli(&["in.geojson", "--mode", "intersection-chord"])).unwrap();
        assert_eq!(cfg.connectivity.mode, AdjacencyMode::Intersection);
        assert_eq!(cfg.connectivity.direction, DirectionPolicy::Chord);
        assert_eq!(cfg.connectivity.angle_threshold_deg, 10.0);
    }

    #[test]
    fn unknown_mode_is_an_error() {
        let mut cfg = GroupingConfig::default();
        assert!(apply_overrides(&mut cfg, &cli(&["in.geojson", "--mode", "nearest"])).is_err());
    }

    #[test]
    fn invalid_override_fails_validation() {
        let args = cli(&["in.geojson", "--angle", "200"]);
        assert!(load_config(&args).is_err());
    }
}
