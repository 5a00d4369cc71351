//! The immutable tile grid: bounds, terrain lookup, and the static half
//! of the passability predicate.

use crate::terrain::{Feature, SpawnPoint, Terrain};
use indexmap::IndexMap;
use rampart_core::TilePos;

/// The match map, immutable after loading.
///
/// `terrain_passable` answers the static part of the passability
/// predicate: in bounds, terrain allows standing, and no impassable
/// feature covers the tile. Dynamic occupancy (building footprints,
/// unit positions and reservations) is the simulation's responsibility.
#[derive(Clone, Debug)]
pub struct TileMap {
    name: String,
    width: i32,
    height: i32,
    tile_size: u32,
    default_terrain: Terrain,
    overrides: IndexMap<TilePos, Terrain>,
    features: Vec<Feature>,
    spawn_points: Vec<SpawnPoint>,
}

impl TileMap {
    /// Assemble a map from already-validated parts. Use
    /// [`MapDocument::into_map`](crate::document::MapDocument::into_map)
    /// to construct one from a document.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: String,
        width: i32,
        height: i32,
        tile_size: u32,
        default_terrain: Terrain,
        overrides: IndexMap<TilePos, Terrain>,
        features: Vec<Feature>,
        spawn_points: Vec<SpawnPoint>,
    ) -> Self {
        Self {
            name,
            width,
            height,
            tile_size,
            default_terrain,
            overrides,
            features,
            spawn_points,
        }
    }

    /// Map name from the document.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width in tiles.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in tiles.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// World units per tile (client projection only).
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// The terrain applied to tiles without an override.
    pub fn default_terrain(&self) -> &Terrain {
        &self.default_terrain
    }

    /// Sparse terrain overrides in document order.
    pub fn override_tiles(&self) -> impl Iterator<Item = (TilePos, &Terrain)> {
        self.overrides.iter().map(|(tile, t)| (*tile, t))
    }

    /// Feature rectangles in document order.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Spawn points in document order.
    pub fn spawn_points(&self) -> &[SpawnPoint] {
        &self.spawn_points
    }

    /// Whether `tile` lies inside the map rectangle.
    pub fn in_bounds(&self, tile: TilePos) -> bool {
        tile.x >= 0 && tile.x < self.width && tile.y >= 0 && tile.y < self.height
    }

    /// The effective terrain at `tile` (override or default).
    ///
    /// Callers must check [`in_bounds`](Self::in_bounds) first; terrain
    /// for out-of-bounds tiles is meaningless.
    pub fn terrain_at(&self, tile: TilePos) -> &Terrain {
        self.overrides.get(&tile).unwrap_or(&self.default_terrain)
    }

    /// Static passability: in bounds, terrain passable, and not inside
    /// any impassable feature rectangle.
    pub fn terrain_passable(&self, tile: TilePos) -> bool {
        if !self.in_bounds(tile) {
            return false;
        }
        if !self.terrain_at(tile).passable {
            return false;
        }
        !self
            .features
            .iter()
            .any(|f| !f.passable && f.contains(tile))
    }

    /// Search outward from `center` in expanding Manhattan rings for the
    /// nearest tile satisfying `pred`, up to `max_radius` rings out.
    ///
    /// Ring cells are visited in a fixed scan order, so the result is
    /// deterministic. Returns `None` when no ring contains a match.
    pub fn nearest_matching(
        &self,
        center: TilePos,
        max_radius: u32,
        mut pred: impl FnMut(TilePos) -> bool,
    ) -> Option<TilePos> {
        if pred(center) {
            return Some(center);
        }
        for radius in 1..=max_radius as i32 {
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    if dx.abs() + dy.abs() != radius {
                        continue;
                    }
                    let tile = center.offset(dx, dy);
                    if self.in_bounds(tile) && pred(tile) {
                        return Some(tile);
                    }
                }
            }
        }
        None
    }

    /// [`nearest_matching`](Self::nearest_matching) specialized to
    /// static terrain passability.
    pub fn nearest_passable(&self, center: TilePos, max_radius: u32) -> Option<TilePos> {
        self.nearest_matching(center, max_radius, |tile| self.terrain_passable(tile))
    }
}
