//! Serde model of the JSON map document and its validated conversion
//! into a [`TileMap`].

use crate::error::MapError;
use crate::grid::TileMap;
use crate::terrain::{Feature, SpawnPoint, Terrain};
use indexmap::IndexMap;
use rampart_core::TilePos;
use serde::Deserialize;
use std::path::Path;

/// The raw map document as it appears on disk.
///
/// Parsed with serde, then validated and converted via
/// [`MapDocument::into_map`]. Field names follow the document's
/// camelCase convention.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDocument {
    /// Document format version string.
    pub version: String,
    /// Human-readable map name.
    pub name: String,
    /// Width in tiles.
    pub width: i64,
    /// Height in tiles.
    pub height: i64,
    /// World units per tile, used only for client projection.
    pub tile_size: u32,
    /// Default terrain plus sparse overrides.
    pub terrain: TerrainSection,
    /// Rectangular multi-tile regions.
    #[serde(default)]
    pub features: Vec<FeatureDoc>,
    /// Per-team spawn regions.
    #[serde(default)]
    pub spawn_points: Vec<SpawnPointDoc>,
}

/// The `terrain` section of the document.
#[derive(Clone, Debug, Deserialize)]
pub struct TerrainSection {
    /// Terrain applied to every tile without an override.
    pub default: TerrainDoc,
    /// Sparse per-tile overrides.
    #[serde(default)]
    pub tiles: Vec<TileOverrideDoc>,
}

/// A terrain record in the document.
#[derive(Clone, Debug, Deserialize)]
pub struct TerrainDoc {
    /// Terrain type name.
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether units may stand on the tile.
    pub passable: bool,
    /// Elevation for client rendering.
    #[serde(default)]
    pub height: f64,
}

/// A single tile override in the document.
#[derive(Clone, Debug, Deserialize)]
pub struct TileOverrideDoc {
    /// Tile column.
    pub x: i32,
    /// Tile row.
    pub y: i32,
    /// Terrain type name.
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether units may stand on the tile.
    pub passable: bool,
    /// Elevation for client rendering.
    #[serde(default)]
    pub height: f64,
}

/// A feature rectangle in the document.
#[derive(Clone, Debug, Deserialize)]
pub struct FeatureDoc {
    /// Feature type name.
    #[serde(rename = "type")]
    pub kind: String,
    /// Left edge tile column.
    pub x: i32,
    /// Top edge tile row.
    pub y: i32,
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    /// Whether units may stand inside the rectangle.
    pub passable: bool,
}

/// A spawn point in the document.
#[derive(Clone, Debug, Deserialize)]
pub struct SpawnPointDoc {
    /// Team index.
    pub team: u32,
    /// Spawn center column.
    pub x: i32,
    /// Spawn center row.
    pub y: i32,
    /// Search radius for a free placement tile.
    pub radius: u32,
}

impl MapDocument {
    /// Parse a document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a document from a file.
    pub fn load(path: &Path) -> Result<Self, MapError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Validate the document and convert it into the internal map
    /// representation.
    ///
    /// Rejects non-positive dimensions, a zero tile size, and any
    /// override tile, feature rectangle, or spawn point that reaches
    /// outside the map.
    pub fn into_map(self) -> Result<TileMap, MapError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(MapError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.tile_size == 0 {
            return Err(MapError::InvalidTileSize);
        }
        let width = self.width as i32;
        let height = self.height as i32;
        let in_bounds = |tile: TilePos| tile.x >= 0 && tile.x < width && tile.y >= 0 && tile.y < height;

        let mut overrides = IndexMap::new();
        for t in self.terrain.tiles {
            let tile = TilePos::new(t.x, t.y);
            if !in_bounds(tile) {
                return Err(MapError::TileOutOfBounds { tile });
            }
            overrides.insert(
                tile,
                Terrain {
                    kind: t.kind,
                    passable: t.passable,
                    height: t.height,
                },
            );
        }

        let mut features = Vec::with_capacity(self.features.len());
        for (index, feat) in self.features.into_iter().enumerate() {
            let origin = TilePos::new(feat.x, feat.y);
            let far = TilePos::new(
                feat.x + feat.width as i32 - 1,
                feat.y + feat.height as i32 - 1,
            );
            if feat.width == 0 || feat.height == 0 || !in_bounds(origin) || !in_bounds(far) {
                return Err(MapError::FeatureOutOfBounds { index });
            }
            features.push(Feature {
                kind: feat.kind,
                origin,
                width: feat.width,
                height: feat.height,
                passable: feat.passable,
            });
        }

        let mut spawn_points = Vec::with_capacity(self.spawn_points.len());
        for sp in self.spawn_points {
            let tile = TilePos::new(sp.x, sp.y);
            if !in_bounds(tile) {
                return Err(MapError::SpawnOutOfBounds { tile });
            }
            spawn_points.push(SpawnPoint {
                team: sp.team,
                tile,
                radius: sp.radius,
            });
        }

        Ok(TileMap::new(
            self.name,
            width,
            height,
            self.tile_size,
            Terrain {
                kind: self.terrain.default.kind,
                passable: self.terrain.default.passable,
                height: self.terrain.default.height,
            },
            overrides,
            features,
            spawn_points,
        ))
    }
}
