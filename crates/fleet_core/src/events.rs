//! Events generated during a simulation tick.
//!
//! The core never prints. Anything a front end may want to announce is
//! collected here and returned from [`Simulation::tick`].
//!
//! [`Simulation::tick`]: crate::simulation::Simulation::tick

use serde::{Deserialize, Serialize};

use crate::combat::AmbushOutcome;
use crate::math::Point;

/// Which leg of a transport job a docking completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DockAction {
    /// Crystals were loaded at a station.
    Loaded,
    /// Crystals were delivered to a star.
    Delivered,
}

/// A shuttle docked and moved crystals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockEvent {
    /// The shuttle.
    pub ship: String,
    /// The site docked at.
    pub site: String,
    /// Load or delivery.
    pub action: DockAction,
    /// Crystals moved in the burst.
    pub crystals: u64,
}

/// A falcon raid on a shuttle was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbushReport {
    /// The falcon.
    pub attacker: String,
    /// The shuttle.
    pub defender: String,
    /// Who came out on top.
    pub outcome: AmbushOutcome,
    /// Crystals the attacker kept.
    pub plundered: u32,
}

/// A rocket hit its impact point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detonation {
    /// Where it hit.
    pub point: Point,
    /// Falcons destroyed by the blast.
    pub destroyed: Vec<String>,
}

/// Everything notable that happened in one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickEvents {
    /// Shuttle dockings.
    pub docks: Vec<DockEvent>,
    /// Raid resolutions.
    pub ambushes: Vec<AmbushReport>,
    /// Rocket impacts.
    pub detonations: Vec<Detonation>,
}

impl TickEvents {
    /// Whether nothing notable happened.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docks.is_empty() && self.ambushes.is_empty() && self.detonations.is_empty()
    }
}
