use std::fmt;
use std::io;
use serde_json::Error as SerdeError;

/// Error type for the map data core.
#[derive(Debug)]
pub enum MapError {
    /// File I/O error (map file, atlas image, descriptor)
    Io(io::Error),
    /// A named tile set has no backing image/descriptor on disk
    TileSetNotFound(String),
    /// Tile set descriptor JSON could not be parsed
    Descriptor(SerdeError),
    /// Atlas image could not be decoded
    Image(image::ImageError),
    /// Maps configuration file could not be parsed
    Config(SerdeError),
    /// A stack operation was invoked on a cell that cannot satisfy it
    InvalidOperation(&'static str),
    /// A layer was given a mask level that fails validation
    InvalidMaskLevel(String),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Io(err) => write!(f, "I/O error: {}", err),
            MapError::TileSetNotFound(name) => {
                write!(f, "No backing resource for tile set '{}'", name)
            }
            MapError::Descriptor(err) => write!(f, "Failed to parse tile set descriptor: {}", err),
            MapError::Image(err) => write!(f, "Failed to decode atlas image: {}", err),
            MapError::Config(err) => write!(f, "Failed to parse maps config: {}", err),
            MapError::InvalidOperation(what) => write!(f, "Invalid operation: {}", what),
            MapError::InvalidMaskLevel(level) => write!(
                f,
                "Invalid mask level '{}' (expected an integer with optional V/S prefix)",
                level
            ),
        }
    }
}

impl From<io::Error> for MapError {
    fn from(err: io::Error) -> Self {
        MapError::Io(err)
    }
}

impl From<image::ImageError> for MapError {
    fn from(err: image::ImageError) -> Self {
        MapError::Image(err)
    }
}

impl std::error::Error for MapError {}
