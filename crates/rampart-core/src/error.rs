//! Error types shared across the Rampart workspace.
//!
//! Command rejections never reach the wire (the tick stepper logs them
//! at debug level and moves on), but they are explicit values so that
//! handlers stay testable and the rejection taxonomy stays visible.

use crate::id::{ClientId, EntityId, TilePos};
use std::error::Error;
use std::fmt;

/// Why a command was rejected during dispatch.
///
/// Every variant results in the same observable behavior: no state
/// change and no reply.
#[derive(Clone, Debug, PartialEq)]
pub enum CommandError {
    /// The issuing client is not registered.
    UnknownClient {
        /// The unrecognized client id.
        client: ClientId,
    },
    /// The referenced entity does not exist (it may have just died).
    UnknownEntity {
        /// The missing entity id.
        entity: EntityId,
    },
    /// A move command named no unit the client owns and can move.
    NoEligibleUnits,
    /// The client cannot afford the building.
    InsufficientFunds {
        /// Money required by the definition table.
        required: f64,
        /// Money the client currently holds.
        available: f64,
    },
    /// The requested kind cannot be placed via a build command.
    NotBuildable {
        /// Wire name of the rejected kind.
        kind: &'static str,
    },
    /// A footprint tile lies outside the map.
    OutOfBounds {
        /// The offending tile.
        tile: TilePos,
    },
    /// A footprint tile is blocked by terrain or an existing occupant.
    Impassable {
        /// The offending tile.
        tile: TilePos,
    },
    /// The attack target is owned by the attacker.
    OwnTarget {
        /// The target entity id.
        entity: EntityId,
    },
    /// The attack target's kind is not damageable.
    NotAttackable {
        /// The target entity id.
        entity: EntityId,
    },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownClient { client } => write!(f, "unknown client {client}"),
            Self::UnknownEntity { entity } => write!(f, "unknown entity {entity}"),
            Self::NoEligibleUnits => write!(f, "no eligible units in move command"),
            Self::InsufficientFunds {
                required,
                available,
            } => write!(f, "insufficient funds: need {required}, have {available}"),
            Self::NotBuildable { kind } => write!(f, "kind '{kind}' is not buildable"),
            Self::OutOfBounds { tile } => write!(f, "tile {tile} is out of bounds"),
            Self::Impassable { tile } => write!(f, "tile {tile} is impassable"),
            Self::OwnTarget { entity } => write!(f, "cannot attack own entity {entity}"),
            Self::NotAttackable { entity } => write!(f, "entity {entity} is not attackable"),
        }
    }
}

impl Error for CommandError {}
