//! Map document loading, terrain, and tile-grid passability.
//!
//! The map is parsed once at startup from a JSON document and is
//! immutable for the lifetime of the match. This crate owns the static
//! half of the passability predicate (bounds, terrain, features); dynamic
//! occupancy (buildings, units) is layered on top by the simulation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod document;
pub mod error;
pub mod grid;
pub mod terrain;

pub use document::MapDocument;
pub use error::MapError;
pub use grid::TileMap;
pub use terrain::{Feature, SpawnPoint, Terrain};
