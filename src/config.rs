use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::MapError;

/// Where map files live and which extension they carry.
///
/// An explicit value owned by the caller and passed in where needed; the
/// editor session creates one at startup. Replaces the properties-resource
/// lookup the original editor did at class-init time.
#[derive(Debug, Clone, Deserialize)]
pub struct MapsConfig {
    maps_dir: PathBuf,
    extension: String,
}

impl MapsConfig {
    /// Config for maps under `maps_dir` with the given extension; a leading
    /// dot is added to the extension when missing.
    pub fn new(maps_dir: impl Into<PathBuf>, extension: &str) -> Self {
        MapsConfig {
            maps_dir: maps_dir.into(),
            extension: normalize_extension(extension),
        }
    }

    /// Read the config from a JSON file, e.g.
    /// `{"maps_dir": "maps", "extension": "map"}`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let text = fs::read_to_string(path)?;
        let config: MapsConfig = serde_json::from_str(&text).map_err(MapError::Config)?;
        Ok(MapsConfig::new(config.maps_dir, &config.extension))
    }

    /// Directory the map files live in.
    pub fn maps_dir(&self) -> &Path {
        &self.maps_dir
    }

    /// Extension including the leading dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Full path for the map called `name`.
    pub fn map_path(&self, name: &str) -> PathBuf {
        self.maps_dir.join(format!("{}{}", name, self.extension))
    }
}

fn normalize_extension(extension: &str) -> String {
    if extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{}", extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_gains_leading_dot() {
        let config = MapsConfig::new("maps", "map");
        assert_eq!(config.extension(), ".map");
        assert_eq!(config.map_path("cave"), PathBuf::from("maps/cave.map"));
    }

    #[test]
    fn extension_with_dot_kept_as_is() {
        let config = MapsConfig::new("maps", ".map");
        assert_eq!(config.extension(), ".map");
    }

    #[test]
    fn loads_json_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maps.json");
        fs::write(&path, r#"{"maps_dir": "data/maps", "extension": "map"}"#).unwrap();
        let config = MapsConfig::from_file(&path).unwrap();
        assert_eq!(config.map_path("keep"), PathBuf::from("data/maps/keep.map"));
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let err = MapsConfig::from_file("no/such/maps.json").unwrap_err();
        assert!(matches!(err, MapError::Io(_)));
    }
}
