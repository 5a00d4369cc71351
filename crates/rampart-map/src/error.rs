//! Map loading and validation errors.
//!
//! Any of these aborts startup; a server without a valid map cannot run.

use rampart_core::TilePos;
use std::error::Error;
use std::fmt;

/// Errors from loading or validating a map document.
#[derive(Debug)]
pub enum MapError {
    /// The document file could not be read.
    Io(std::io::Error),
    /// The document is not valid JSON or is missing required fields.
    Parse(serde_json::Error),
    /// `width` or `height` is not positive.
    InvalidDimensions {
        /// Declared width in tiles.
        width: i64,
        /// Declared height in tiles.
        height: i64,
    },
    /// `tileSize` is zero.
    InvalidTileSize,
    /// A terrain override references a tile outside the map.
    TileOutOfBounds {
        /// The offending tile.
        tile: TilePos,
    },
    /// A feature rectangle extends outside the map.
    FeatureOutOfBounds {
        /// Index of the offending feature in document order.
        index: usize,
    },
    /// A spawn point lies outside the map.
    SpawnOutOfBounds {
        /// The offending spawn tile.
        tile: TilePos,
    },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read map document: {e}"),
            Self::Parse(e) => write!(f, "failed to parse map document: {e}"),
            Self::InvalidDimensions { width, height } => {
                write!(f, "map dimensions must be positive, got {width}x{height}")
            }
            Self::InvalidTileSize => write!(f, "tileSize must be positive"),
            Self::TileOutOfBounds { tile } => {
                write!(f, "terrain override at {tile} is out of bounds")
            }
            Self::FeatureOutOfBounds { index } => {
                write!(f, "feature #{index} extends out of bounds")
            }
            Self::SpawnOutOfBounds { tile } => {
                write!(f, "spawn point at {tile} is out of bounds")
            }
        }
    }
}

impl Error for MapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MapError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for MapError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}
