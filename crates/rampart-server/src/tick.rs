//! The tick thread: fixed-cadence stepping and snapshot broadcast.

use crate::egress;
use crossbeam_channel::Receiver;
use rampart_core::InputFrame;
use rampart_proto::ServerMessage;
use rampart_sim::World;
use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// State owned by the tick thread.
pub(crate) struct TickRunner {
    pub socket: Arc<UdpSocket>,
    pub world: Arc<Mutex<World>>,
    pub frames: Receiver<InputFrame>,
    pub shutdown: Arc<AtomicBool>,
    pub period: Duration,
}

impl TickRunner {
    /// Main tick loop. Paces on a monotonic deadline schedule
    /// (`next_deadline += period`) rather than sleeping a fixed amount,
    /// so tick cadence does not drift with step cost.
    pub fn run(self) {
        let mut next_deadline = Instant::now() + self.period;
        loop {
            if self.shutdown.load(Ordering::Acquire) {
                break;
            }

            // 1. Drain the input queue.
            let mut frames: Vec<InputFrame> = Vec::new();
            while let Ok(frame) = self.frames.try_recv() {
                frames.push(frame);
            }

            // 2. Step the world and serialize the snapshot under the
            //    lock; sending happens after release.
            let now = Instant::now();
            let broadcastable = {
                let Ok(mut world) = self.world.lock() else {
                    log::error!("world lock poisoned, stopping tick loop");
                    break;
                };
                world.step(now, frames);
                let snapshot = egress::build_snapshot(&world);
                let recipients: Vec<SocketAddr> =
                    world.clients().values().map(|c| c.addr).collect();
                (snapshot, recipients)
            };
            let (snapshot, recipients) = broadcastable;
            if !recipients.is_empty() {
                egress::broadcast(
                    &self.socket,
                    &ServerMessage::Snapshot(snapshot),
                    &recipients,
                );
            }

            // 3. Sleep until the next deadline. If a step overran badly,
            //    re-anchor instead of racing to catch up.
            next_deadline += self.period;
            let now = Instant::now();
            if now > next_deadline + self.period {
                log::warn!("tick overran its budget, re-anchoring cadence");
                next_deadline = now + self.period;
            }
            let remaining = next_deadline.saturating_duration_since(now);
            if !remaining.is_zero() {
                std::thread::sleep(remaining);
            }
        }
    }
}
