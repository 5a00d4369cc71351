//! Terrain records, feature rectangles, and spawn points.

use rampart_core::TilePos;

/// The terrain of a single tile.
#[derive(Clone, Debug, PartialEq)]
pub struct Terrain {
    /// Terrain type name, e.g. `"grass"` or `"rock"`. Opaque to the
    /// server; forwarded to clients for rendering.
    pub kind: String,
    /// Whether units may stand on this tile.
    pub passable: bool,
    /// Elevation, forwarded to clients for rendering.
    pub height: f64,
}

/// A rectangular multi-tile map feature (e.g. a lake or cliff band).
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    /// Feature type name, opaque to the server.
    pub kind: String,
    /// Top-left tile of the rectangle.
    pub origin: TilePos,
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    /// Whether units may stand inside the rectangle.
    pub passable: bool,
}

impl Feature {
    /// Whether `tile` lies inside this feature's rectangle.
    pub fn contains(&self, tile: TilePos) -> bool {
        tile.x >= self.origin.x
            && tile.x < self.origin.x + self.width as i32
            && tile.y >= self.origin.y
            && tile.y < self.origin.y + self.height as i32
    }
}

/// A per-team spawn region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnPoint {
    /// Team index this spawn belongs to.
    pub team: u32,
    /// Center tile of the spawn region.
    pub tile: TilePos,
    /// Search radius for a free placement tile.
    pub radius: u32,
}
