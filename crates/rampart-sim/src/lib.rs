//! Authoritative tick-driven simulation for Rampart.
//!
//! The [`World`] owns all match state (entities, clients, formation
//! groups, and the immutable map) and advances exactly one tick per
//! [`World::step`] call. Everything here is synchronous and
//! deterministic: the state after tick `n` is a pure function of the
//! state after tick `n-1` plus the multiset of applied input frames.
//! The network edge lives in `rampart-server`; this crate performs no
//! I/O and reads no clocks (the stepper is handed `now` explicitly).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod client;
mod commands;
pub mod config;
pub mod formation;
mod movement;
pub mod path;
mod step;
pub mod world;

pub use client::Client;
pub use config::{ConfigError, SimConfig};
pub use formation::FormationGroup;
pub use path::{find_path, PathScratch};
pub use world::World;
