//! UDP network edge and tick loop for the Rampart RTS server.
//!
//! Two long-lived threads cooperate around one world lock:
//!
//! ```text
//! Clients (UDP)            Ingress Thread                Tick Thread
//!     |                        |                             |
//!     |--datagram------------->| decode                      |
//!     |                        | hello: lock world, admit,   |
//!     |<--welcome--------------| build welcome, unlock, send |
//!     |                        | input: lock world, filter   |
//!     |                        | stale frames, touch client, |
//!     |                        | unlock, frame_tx.try_send   |
//!     |                        |                             | frame_rx.try_recv() drain
//!     |                        |                             | lock world
//!     |                        |                             | world.step(now, frames)
//!     |                        |                             | build snapshot
//!     |                        |                             | unlock
//!     |<--snapshot---------------------------------------... | send to every client
//!     |                        |                             | sleep until next deadline
//! ```
//!
//! Neither thread ever holds the world lock across socket I/O, and the
//! frame channel is never touched while the lock is held.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
mod egress;
pub mod error;
mod handshake;
mod ingress;
pub mod server;
mod tick;

pub use config::{ServerConfig, ServerConfigError};
pub use error::ServerError;
pub use server::Server;
