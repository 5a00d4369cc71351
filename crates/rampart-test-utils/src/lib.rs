//! Shared test fixtures: canned maps and addresses.
//!
//! Maps are built through the public document API so fixtures exercise
//! the same loading path as production.

#![forbid(unsafe_code)]

use rampart_map::{MapDocument, TileMap};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// An all-grass map with impassable rock overrides and spawn points
/// (`(team, x, y, radius)`).
pub fn fixture_map(
    width: i32,
    height: i32,
    rocks: &[(i32, i32)],
    spawns: &[(u32, i32, i32, u32)],
) -> TileMap {
    let tiles: Vec<serde_json::Value> = rocks
        .iter()
        .map(|&(x, y)| {
            serde_json::json!({
                "x": x, "y": y, "type": "rock", "passable": false, "height": 1.0
            })
        })
        .collect();
    let points: Vec<serde_json::Value> = spawns
        .iter()
        .map(|&(team, x, y, radius)| {
            serde_json::json!({ "team": team, "x": x, "y": y, "radius": radius })
        })
        .collect();
    let doc = serde_json::json!({
        "version": "1",
        "name": "fixture",
        "width": width,
        "height": height,
        "tileSize": 32,
        "terrain": {
            "default": { "type": "grass", "passable": true, "height": 0.0 },
            "tiles": tiles
        },
        "spawnPoints": points
    });
    MapDocument::from_json(&doc.to_string())
        .expect("fixture document parses")
        .into_map()
        .expect("fixture document validates")
}

/// An all-grass map with no features or spawn points.
pub fn open_map(width: i32, height: i32) -> TileMap {
    fixture_map(width, height, &[], &[])
}

/// An all-grass map with impassable rock overrides at the given tiles.
pub fn map_with_rocks(width: i32, height: i32, rocks: &[(i32, i32)]) -> TileMap {
    fixture_map(width, height, rocks, &[])
}

/// An all-grass map with the given spawn points (team, x, y, radius).
pub fn map_with_spawns(width: i32, height: i32, spawns: &[(u32, i32, i32, u32)]) -> TileMap {
    fixture_map(width, height, &[], spawns)
}

/// A distinct loopback address per `n`, for fake client endpoints.
pub fn test_addr(n: u16) -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 40_000 + n)
}
