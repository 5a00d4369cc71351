//! Wire protocol messages and the tagged-JSON codec.
//!
//! Every datagram payload is a tagged document `{"type": <tag>, "data":
//! <payload>}`. The protocol assumes loss: clients resend their last
//! few command frames for redundancy, and the server deduplicates by
//! per-client sequence number. Inbound numeric fields decode
//! tolerantly, so `3` and `3.0` are the same value on the wire.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod messages;
mod num;

pub use codec::{decode_client, decode_server, encode_client, encode_server, CodecError};
pub use messages::{
    AttackCommand, BuildCommand, ClientMessage, CommandFrame, EntityState, FeatureRect,
    HelloPayload, InputPayload, MoveCommand, PingPayload, PlayerState, PongPayload,
    ServerMessage, SnapshotPayload, TerrainData, TerrainTile, WelcomePayload, WireCommand,
};
