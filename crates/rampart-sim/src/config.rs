//! Simulation tuning parameters and their startup validation.

use std::error::Error;
use std::fmt;
use std::time::Duration;

/// Errors detected during [`SimConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// `tick_rate_hz` is zero.
    InvalidTickRate,
    /// `movement_speed` is not finite and positive.
    InvalidMovementSpeed {
        /// The invalid value.
        value: f64,
    },
    /// `reroute_threshold` is zero (units would re-route every tick).
    InvalidRerouteThreshold,
    /// `attack_damage` is not positive.
    InvalidAttackDamage {
        /// The invalid value.
        value: i32,
    },
    /// `starting_money` is not finite and non-negative.
    InvalidStartingMoney {
        /// The invalid value.
        value: f64,
    },
    /// `max_clients` is zero.
    NoClientBudget,
    /// `client_timeout` is zero.
    InvalidClientTimeout,
    /// `goal_search_radius` is zero (impassable targets could never
    /// relocate).
    InvalidGoalSearchRadius,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTickRate => write!(f, "tick_rate_hz must be at least 1"),
            Self::InvalidMovementSpeed { value } => {
                write!(f, "movement_speed must be finite and positive, got {value}")
            }
            Self::InvalidRerouteThreshold => write!(f, "reroute_threshold must be at least 1"),
            Self::InvalidAttackDamage { value } => {
                write!(f, "attack_damage must be positive, got {value}")
            }
            Self::InvalidStartingMoney { value } => {
                write!(f, "starting_money must be finite and non-negative, got {value}")
            }
            Self::NoClientBudget => write!(f, "max_clients must be at least 1"),
            Self::InvalidClientTimeout => write!(f, "client_timeout must be non-zero"),
            Self::InvalidGoalSearchRadius => {
                write!(f, "goal_search_radius must be at least 1")
            }
        }
    }
}

impl Error for ConfigError {}

/// Tunable simulation parameters.
///
/// Defaults match the nominal values the protocol advertises to clients.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Simulation steps per second.
    pub tick_rate_hz: u32,
    /// Unit movement speed in tiles per second.
    pub movement_speed: f64,
    /// Consecutive blocked ticks before a unit recomputes its path.
    pub reroute_threshold: u32,
    /// Hit points removed per attack command.
    pub attack_damage: i32,
    /// Money a client starts with at handshake.
    pub starting_money: f64,
    /// Workers spawned around the headquarters at handshake.
    pub starting_workers: u32,
    /// Maximum concurrently connected clients.
    pub max_clients: usize,
    /// A client whose last ingress is older than this is evicted at the
    /// next tick boundary.
    pub client_timeout: Duration,
    /// How far outward to search when relocating an impassable goal or
    /// legalizing a formation slot.
    pub goal_search_radius: u32,
    /// Seed for spawn-placement jitter. Identical seeds place starting
    /// entities identically.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 20,
            movement_speed: 4.0,
            reroute_threshold: 20,
            attack_damage: 25,
            starting_money: 500.0,
            starting_workers: 3,
            max_clients: 8,
            client_timeout: Duration::from_secs(10),
            goal_search_radius: 8,
            seed: 0,
        }
    }
}

impl SimConfig {
    /// Seconds simulated per tick.
    pub fn dt(&self) -> f64 {
        1.0 / f64::from(self.tick_rate_hz)
    }

    /// Validate all structural invariants. Invalid configuration aborts
    /// startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::InvalidTickRate);
        }
        if !self.movement_speed.is_finite() || self.movement_speed <= 0.0 {
            return Err(ConfigError::InvalidMovementSpeed {
                value: self.movement_speed,
            });
        }
        if self.reroute_threshold == 0 {
            return Err(ConfigError::InvalidRerouteThreshold);
        }
        if self.attack_damage <= 0 {
            return Err(ConfigError::InvalidAttackDamage {
                value: self.attack_damage,
            });
        }
        if !self.starting_money.is_finite() || self.starting_money < 0.0 {
            return Err(ConfigError::InvalidStartingMoney {
                value: self.starting_money,
            });
        }
        if self.max_clients == 0 {
            return Err(ConfigError::NoClientBudget);
        }
        if self.client_timeout.is_zero() {
            return Err(ConfigError::InvalidClientTimeout);
        }
        if self.goal_search_radius == 0 {
            return Err(ConfigError::InvalidGoalSearchRadius);
        }
        Ok(())
    }
}
