//! Rampart: an authoritative tick-driven server core for small-scale
//! real-time strategy matches.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Rampart sub-crates. For most users, adding `rampart` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use rampart::prelude::*;
//!
//! let doc = r#"{
//!     "version": "1", "name": "duel",
//!     "width": 16, "height": 16, "tileSize": 32,
//!     "terrain": { "default": { "type": "grass", "passable": true } },
//!     "spawnPoints": [ { "team": 0, "x": 3, "y": 3, "radius": 2 } ]
//! }"#;
//! let map = MapDocument::from_json(doc).unwrap().into_map().unwrap();
//!
//! let mut world = World::new(map, SimConfig::default()).unwrap();
//! world.step(std::time::Instant::now(), vec![]);
//! assert_eq!(world.tick(), TickId(1));
//! ```
//!
//! To run the full network edge instead, see
//! [`server::Server::start`], which owns the world and spawns the
//! ingress and tick threads.
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `rampart-core` | Ids, entities, commands, error taxonomy |
//! | [`map`] | `rampart-map` | Map document, terrain, tile-grid passability |
//! | [`sim`] | `rampart-sim` | World state, stepper, pathfinding, formations |
//! | [`proto`] | `rampart-proto` | Wire messages and the tagged-JSON codec |
//! | [`server`] | `rampart-server` | UDP ingress, tick loop, snapshot broadcast |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core ids, the entity model, commands, and errors (`rampart-core`).
pub use rampart_core as types;

/// Map document loading and tile-grid passability (`rampart-map`).
pub use rampart_map as map;

/// Wire protocol messages and codec (`rampart-proto`).
pub use rampart_proto as proto;

/// The UDP network edge and tick loop (`rampart-server`).
pub use rampart_server as server;

/// The authoritative simulation (`rampart-sim`).
pub use rampart_sim as sim;

/// Common imports for typical Rampart usage.
///
/// ```rust
/// use rampart::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use rampart_core::{
        ClientId, CommandPayload, Entity, EntityId, EntityKind, FormationKind, InputFrame,
        TickId, TilePos,
    };

    // Map
    pub use rampart_map::{MapDocument, MapError, TileMap};

    // Simulation
    pub use rampart_sim::{Client, FormationGroup, SimConfig, World};

    // Wire protocol
    pub use rampart_proto::{
        decode_client, decode_server, encode_client, encode_server, ClientMessage, ServerMessage,
    };

    // Server
    pub use rampart_server::{Server, ServerConfig};
}
