//! Data-driven fleet tuning.
//!
//! All balance numbers live here so they can be overridden from a RON file
//! without touching simulation code. The defaults reproduce the classic
//! rules.
//!
//! # Example RON
//!
//! ```ron
//! FleetConfig(
//!     shuttle: ShipStats(speed: 300.0, health: 10),
//!     falcon: ShipStats(speed: 4000.0, health: 5),
//!     escort_range: 300.0,
//! )
//! ```
//!
//! Fields left out keep their default value.

use serde::{Deserialize, Serialize};

use crate::error::{FleetError, Result};
use crate::motion::check_speed;

/// Movement and durability of one spaceship kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipStats {
    /// Distance covered per tick, in simulation units.
    pub speed: f64,
    /// Health at construction.
    pub health: u32,
}

impl ShipStats {
    /// Create stats for a kind.
    #[must_use]
    pub const fn new(speed: f64, health: u32) -> Self {
        Self { speed, health }
    }
}

/// Tuning for the whole simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// Crystal hauler.
    pub shuttle: ShipStats,
    /// Site patroller.
    pub bomber: ShipStats,
    /// Rocket launcher.
    pub destroyer: ShipStats,
    /// Shuttle raider.
    pub falcon: ShipStats,
    /// Rocket flight speed per tick.
    pub rocket_speed: f64,
    /// Health ceiling for every spaceship.
    pub max_health: u32,
    /// Cargo hold size for every spaceship.
    pub max_cargo: u32,
    /// Farthest distance at which a raider can win against a shuttle.
    pub ambush_range: f64,
    /// Radius within which a bomber protects a shuttle.
    pub escort_range: f64,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            shuttle: ShipStats::new(300.0, 10),
            bomber: ShipStats::new(1000.0, 1),
            destroyer: ShipStats::new(2000.0, 1),
            falcon: ShipStats::new(3000.0, 5),
            rocket_speed: 3000.0,
            max_health: 20,
            max_cargo: 5,
            ambush_range: 100.0,
            escort_range: 250.0,
        }
    }
}

impl FleetConfig {
    /// Parse a config from RON text.
    ///
    /// # Errors
    ///
    /// Returns [`FleetError::ConfigParse`] on malformed input and
    /// [`FleetError::InvalidSpeed`] if any speed is negative.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        let config: Self =
            ron::from_str(text).map_err(|e| FleetError::ConfigParse(e.to_string()))?;
        for speed in [
            config.shuttle.speed,
            config.bomber.speed,
            config.destroyer.speed,
            config.falcon.speed,
            config.rocket_speed,
        ] {
            check_speed(speed)?;
        }
        Ok(config)
    }
}
