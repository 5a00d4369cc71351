//! Server lifecycle: spawn the ingress and tick threads, and join them
//! on shutdown.

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::ingress::IngressReader;
use crate::tick::TickRunner;
use rampart_map::TileMap;
use rampart_sim::{SimConfig, World};
use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// A running server: one datagram socket, one ingress thread, one tick
/// thread, one world.
///
/// Dropping the server shuts it down; [`shutdown`](Server::shutdown)
/// does so explicitly and joins both threads.
pub struct Server {
    world: Arc<Mutex<World>>,
    local_addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    ingress_thread: Option<JoinHandle<()>>,
    tick_thread: Option<JoinHandle<()>>,
}

impl Server {
    /// Validate configuration, bind the socket, and spawn both threads.
    pub fn start(map: TileMap, sim: SimConfig, net: ServerConfig) -> Result<Server, ServerError> {
        sim.validate()?;
        net.validate()?;
        let period = Duration::from_secs_f64(sim.dt());

        let socket = UdpSocket::bind(net.bind_addr)?;
        socket.set_read_timeout(Some(net.socket_read_timeout))?;
        let local_addr = socket.local_addr()?;
        let socket = Arc::new(socket);

        let world = Arc::new(Mutex::new(World::new(map, sim)?));
        let shutdown = Arc::new(AtomicBool::new(false));
        let (frame_tx, frame_rx) = crossbeam_channel::bounded(net.input_queue_capacity);

        let reader = IngressReader {
            socket: Arc::clone(&socket),
            world: Arc::clone(&world),
            frames: frame_tx,
            shutdown: Arc::clone(&shutdown),
            net,
        };
        let ingress_thread = thread::Builder::new()
            .name("rampart-ingress".into())
            .spawn(move || reader.run())
            .map_err(|e| ServerError::ThreadSpawn {
                reason: format!("ingress thread: {e}"),
            })?;

        let runner = TickRunner {
            socket: Arc::clone(&socket),
            world: Arc::clone(&world),
            frames: frame_rx,
            shutdown: Arc::clone(&shutdown),
            period,
        };
        let tick_thread = thread::Builder::new()
            .name("rampart-tick".into())
            .spawn(move || runner.run())
            .map_err(|e| ServerError::ThreadSpawn {
                reason: format!("tick thread: {e}"),
            })?;

        log::info!("rampart server listening on {local_addr}");
        Ok(Server {
            world,
            local_addr,
            shutdown,
            ingress_thread: Some(ingress_thread),
            tick_thread: Some(tick_thread),
        })
    }

    /// The bound socket address (with the real port when bound to 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Shared handle to the world, for inspection in tests and tools.
    pub fn world(&self) -> Arc<Mutex<World>> {
        Arc::clone(&self.world)
    }

    /// Stop both threads and join them. The ingress thread wakes within
    /// its socket read timeout; the tick thread within one tick period.
    pub fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.tick_thread.take() {
            if handle.join().is_err() {
                log::error!("tick thread panicked");
            }
        }
        if let Some(handle) = self.ingress_thread.take() {
            if handle.join().is_err() {
                log::error!("ingress thread panicked");
            }
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.shutdown();
    }
}
