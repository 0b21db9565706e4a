use thiserror::Error;

/// Failures surfaced by loading, configuration and output. The grouping
/// algorithm itself never fails: degenerate geometry just stays unconnected.
#[derive(Debug, Error)]
pub enum StreetError {
    #[error("input is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid GeoJSON: {message}")]
    InvalidGeoJson { message: String },
    #[error("parameter '{param}' must be finite")]
    NonFinite { param: String },
    #[error("parameter '{param}' out of range [{min}, {max}]: got {got}")]
    OutOfRange { param: String, min: f64, max: f64, got: f64 },
    #[error("{what} exceeds limit of {max}")]
    LimitExceeded { what: &'static str, max: usize },
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
    #[cfg(feature = "shapefile")]
    #[error("invalid shapefile: {0}")]
    Shapefile(#[from] shapefile::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StreetError {
    /// Stable machine-readable code, shared with the wasm bindings.
    pub fn code(&self) -> &'static str {
        match self {
            StreetError::InvalidJson(_) => "invalid_json",
            StreetError::InvalidGeoJson { .. } => "invalid_geojson",
            StreetError::NonFinite { .. } => "non_finite",
            StreetError::OutOfRange { .. } => "out_of_range",
            StreetError::LimitExceeded { .. } => "limit_exceeded",
            StreetError::InvalidConfig { .. } => "invalid_config",
            #[cfg(feature = "shapefile")]
            StreetError::Shapefile(_) => "invalid_shapefile",
            StreetError::Io(_) => "io",
        }
    }

    pub(crate) fn geojson(message: impl Into<String>) -> Self {
        StreetError::InvalidGeoJson { message: message.into() }
    }

    pub(crate) fn non_finite(param: &str) -> Self {
        StreetError::NonFinite { param: param.to_string() }
    }

    pub(crate) fn out_of_range(param: &str, min: f64, max: f64, got: f64) -> Self {
        StreetError::OutOfRange { param: param.to_string(), min, max, got }
    }
}

pub type Result<T> = std::result::Result<T, StreetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(StreetError::non_finite("x").code(), "non_finite");
        assert_eq!(StreetError::out_of_range("angle", 0.0, 180.0, 200.0).code(), "out_of_range");
        assert_eq!(StreetError::LimitExceeded { what: "records", max: 1 }.code(), "limit_exceeded");
        let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(StreetError::from(bad).code(), "invalid_json");
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(StreetError::from(missing).code(), "io");
    }

    #[test]
    fn messages_name_the_parameter() {
        let e = StreetError::out_of_range("angle_threshold_deg", 0.0, 180.0, 200.0);
        assert!(e.to_string().contains("angle_threshold_deg"));
    }
}
