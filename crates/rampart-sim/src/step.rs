//! The per-tick algorithm: sort, evict, apply, advance, produce.

use crate::commands;
use crate::formation;
use crate::movement;
use crate::world::World;
use rampart_core::{ClientId, InputFrame};
use std::time::Instant;

impl World {
    /// Advance the world by exactly one tick.
    ///
    /// `frames` is the full drain of the input queue; `now` is the tick
    /// boundary timestamp used for liveness eviction. The phase order is
    /// fixed:
    ///
    /// 1. sort frames into `(tick, client, sequence)` order,
    /// 2. evict timed-out clients and their entities,
    /// 3. apply frames, skipping redundant sequences,
    /// 4. retire finished formation groups,
    /// 5. advance unit movement,
    /// 6. credit building income,
    /// 7. increment the tick counter.
    ///
    /// Two frames stamped with the same tick apply together here in
    /// deterministic order no matter how they raced over the network.
    pub fn step(&mut self, now: Instant, mut frames: Vec<InputFrame>) {
        frames.sort_by_key(InputFrame::sort_key);

        let timeout = self.config().client_timeout;
        let expired: Vec<ClientId> = self
            .clients()
            .values()
            .filter(|c| now.duration_since(c.last_seen) > timeout)
            .map(|c| c.id)
            .collect();
        for id in expired {
            log::info!("client {id} timed out, evicting");
            self.remove_client(id);
        }

        for frame in frames {
            let Some(client) = self.client_mut(frame.client) else {
                log::debug!("dropping frame from unknown client {}", frame.client);
                continue;
            };
            if frame.sequence <= client.last_processed_seq {
                continue; // redundant resend
            }
            client.last_processed_seq = frame.sequence;
            for command in &frame.commands {
                if let Err(err) = commands::dispatch(self, frame.client, command) {
                    log::debug!("client {} command rejected: {err}", frame.client);
                }
            }
        }

        formation::update_groups(self);
        movement::advance_units(self);
        self.produce_income();
        self.advance_tick();
    }

    /// Credit every income-producing entity's owner for one tick's worth
    /// of production.
    fn produce_income(&mut self) {
        let dt = self.config().dt();
        let earned: Vec<(ClientId, f64)> = self
            .entities()
            .values()
            .filter(|e| e.owner != ClientId::NEUTRAL)
            .filter_map(|e| {
                let rate = e.kind.def().income_per_second;
                (rate > 0.0).then_some((e.owner, rate * dt))
            })
            .collect();
        for (owner, amount) in earned {
            if let Some(client) = self.client_mut(owner) {
                client.money += amount;
            }
        }
    }
}
