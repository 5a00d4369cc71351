//! The ingress reader: blocking datagram receive loop.
//!
//! The reader decodes packets, handles handshakes and heartbeats, and
//! forwards fresh input frames to the tick thread. It takes the world
//! lock only between socket operations, never across them, and it never
//! mutates entities or money; its only writes are client admission and
//! `last_seen` refreshes.

use crate::config::ServerConfig;
use crate::handshake;
use crossbeam_channel::Sender;
use rampart_core::{ClientId, InputFrame};
use rampart_proto::{
    decode_client, encode_server, ClientMessage, HelloPayload, InputPayload, PongPayload,
    ServerMessage,
};
use rampart_sim::World;
use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Largest datagram payload the reader will accept.
const MAX_DATAGRAM: usize = 64 * 1024;

/// State owned by the ingress thread.
pub(crate) struct IngressReader {
    pub socket: Arc<UdpSocket>,
    pub world: Arc<Mutex<World>>,
    pub frames: Sender<InputFrame>,
    pub shutdown: Arc<AtomicBool>,
    pub net: ServerConfig,
}

impl IngressReader {
    /// Receive loop; runs until the shutdown flag is set. The socket
    /// read timeout guarantees the flag is observed promptly.
    pub fn run(self) {
        let mut buf = [0u8; MAX_DATAGRAM];
        loop {
            if self.shutdown.load(Ordering::Acquire) {
                break;
            }
            match self.socket.recv_from(&mut buf) {
                Ok((len, addr)) => self.handle_datagram(&buf[..len], addr),
                Err(e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    continue;
                }
                Err(e) => {
                    log::warn!("socket receive error: {e}");
                }
            }
        }
    }

    fn handle_datagram(&self, bytes: &[u8], addr: SocketAddr) {
        let message = match decode_client(bytes) {
            Ok(message) => message,
            Err(e) => {
                log::debug!("dropping malformed datagram from {addr}: {e}");
                return;
            }
        };
        match message {
            ClientMessage::Hello(hello) => self.handle_hello(&hello, addr),
            ClientMessage::Input(input) => self.handle_input(&input, addr),
            ClientMessage::Ping(_) => self.handle_ping(addr),
        }
    }

    /// Admit a new client, or re-send the welcome to a known address
    /// (a lost welcome would otherwise strand the client). One outbound
    /// send, after the lock is released.
    fn handle_hello(&self, hello: &HelloPayload, addr: SocketAddr) {
        let now = Instant::now();
        let welcome = {
            let Ok(mut world) = self.world.lock() else {
                return;
            };
            let id = match world.client_by_addr(addr).map(|c| c.id) {
                Some(id) => id,
                None => match world.admit_client(&hello.player_name, addr, now) {
                    Some(id) => {
                        log::info!(
                            "client {id} ({} / {}) joined from {addr}",
                            hello.player_name,
                            hello.client_version
                        );
                        id
                    }
                    None => {
                        log::info!("client budget exhausted, ignoring hello from {addr}");
                        return;
                    }
                },
            };
            world.touch_client(id, now);
            handshake::welcome_for(&world, id, &self.net)
        };
        self.send(&ServerMessage::Welcome(welcome), addr);
    }

    /// Filter the message's frames against the client's processed
    /// sequence and forward the fresh ones to the tick thread.
    fn handle_input(&self, input: &InputPayload, addr: SocketAddr) {
        let now = Instant::now();
        let fresh: Vec<InputFrame> = {
            let Ok(mut world) = self.world.lock() else {
                return;
            };
            let id = ClientId(input.client_id);
            let Some(client) = world.client(id) else {
                log::debug!("dropping input for unknown client {id} from {addr}");
                return;
            };
            let last_processed = client.last_processed_seq;
            world.touch_client(id, now);
            input
                .commands
                .iter()
                .filter(|frame| frame.sequence > last_processed)
                .map(|frame| frame.to_input_frame(id))
                .collect()
        };
        for frame in fresh {
            if self.frames.try_send(frame).is_err() {
                log::warn!("input queue full, dropping a frame from {addr}");
            }
        }
    }

    /// Heartbeat: refresh liveness and reply. Unknown senders get no
    /// reply.
    fn handle_ping(&self, addr: SocketAddr) {
        let now = Instant::now();
        let known = {
            let Ok(mut world) = self.world.lock() else {
                return;
            };
            world.touch_client_by_addr(addr, now).is_some()
        };
        if known {
            self.send(&ServerMessage::Pong(PongPayload {}), addr);
        }
    }

    fn send(&self, message: &ServerMessage, addr: SocketAddr) {
        match encode_server(message) {
            Ok(bytes) => {
                if let Err(e) = self.socket.send_to(&bytes, addr) {
                    log::warn!("send to {addr} failed: {e}");
                }
            }
            Err(e) => log::error!("failed to encode outbound message: {e}"),
        }
    }
}
