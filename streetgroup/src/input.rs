use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::json;
use crate::model::StreetRecord;

/// Loads a file, choosing the reader by extension: `.shp` goes through the
/// shapefile reader, anything else is parsed as GeoJSON or a native document.
pub fn load_path(path: &Path) -> Result<Vec<StreetRecord>> {
    #[cfg(feature = "shapefile")]
    {
        if is_shapefile(path) {
            return crate::shp::load_shapefile(path);
        }
    }
    let text = fs::read_to_string(path)?;
    json::load_str(&text)
}

pub fn is_shapefile(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("shp"))
}
