use serde::{Deserialize, Serialize};

use crate::algorithms::connectivity::ConnectivityConfig;
use crate::algorithms::graph_build::BuildOptions;
use crate::color::Palette;
use crate::error::{Result, StreetError};
use crate::svg::SvgOptions;

/// Everything one grouping run needs. Missing fields take their defaults, so
/// `{}` is a valid configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GroupingConfig {
    pub connectivity: ConnectivityConfig,
    pub build: BuildOptions,
    pub palette: Palette,
    pub render: SvgOptions,
}

impl GroupingConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let cfg: GroupingConfig =
            serde_json::from_str(text).map_err(|e| StreetError::InvalidConfig { message: e.to_string() })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        self.connectivity.validate()?;
        self.render.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::connectivity::{AdjacencyMode, DirectionPolicy};
    use crate::color::ColorScheme;

    #[test]
    fn empty_object_is_default() {
        let cfg = GroupingConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, GroupingConfig::default());
        assert_eq!(cfg.connectivity.mode, AdjacencyMode::Intersection);
        assert_eq!(cfg.connectivity.direction, DirectionPolicy::LocalTangent);
        assert!(cfg.build.prefilter);
    }

    #[test]
    fn partial_sections_fill_in() {
        let cfg = GroupingConfig::from_json_str(
            r#"{"connectivity": {"mode": "endpoint_proximity", "angle_threshold_deg": 15},
                "palette": {"scheme": "golden_hue"},
                "render": {"title": null}}"#,
        )
        .unwrap();
        assert_eq!(cfg.connectivity.mode, AdjacencyMode::EndpointProximity);
        assert_eq!(cfg.connectivity.angle_threshold_deg, 15.0);
        assert_eq!(cfg.connectivity.distance_tolerance, 1e-6);
        assert_eq!(cfg.palette.scheme, ColorScheme::GoldenHue);
        assert_eq!(cfg.render.title, None);
        assert_eq!(cfg.render.width, 3000.0);
    }

    #[test]
    fn rejects_unknown_and_invalid() {
        let e = GroupingConfig::from_json_str(r#"{"colour": {}}"#).unwrap_err();
        assert_eq!(e.code(), "invalid_config");
        let e = GroupingConfig::from_json_str(r#"{"connectivity": {"angle_threshold_deg": 270}}"#).unwrap_err();
        assert_eq!(e.code(), "out_of_range");
    }

    #[test]
    fn serializes_back() {
        let cfg = GroupingConfig::default();
        let again = GroupingConfig::from_json_str(&cfg.to_json_string()).unwrap();
        assert_eq!(again, cfg);
    }
}
