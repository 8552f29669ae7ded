//! # Fleet Core
//!
//! Deterministic simulation core for the crystal fleet.
//!
//! This crate contains **only** simulation logic:
//! - No rendering
//! - No console IO
//! - No randomness
//!
//! Everything the world does happens inside [`simulation::Simulation::tick`],
//! in a fixed order, so two runs fed the same commands stay identical.
//!
//! ## Crate Structure
//!
//! - [`simulation`] - Registry and tick loop
//! - [`spaceship`] - Shuttles, bombers, destroyers and falcons
//! - [`sites`] - Space stations and fortress stars
//! - [`agents`] - Crew ranks
//! - [`logistics`] - Shuttle transport jobs
//! - [`patrol`] - Bomber site sweep
//! - [`combat`] - Falcon raids
//! - [`projectile`] - Destroyer rockets
//! - [`math`] - Vectors and distance units

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod agents;
pub mod combat;
pub mod config;
pub mod error;
pub mod events;
pub mod logistics;
pub mod math;
pub mod motion;
pub mod patrol;
pub mod projectile;
pub mod simulation;
pub mod sites;
pub mod snapshot;
pub mod spaceship;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::agents::{Agent, Rank};
    pub use crate::combat::AmbushOutcome;
    pub use crate::config::FleetConfig;
    pub use crate::error::{Category, FleetError, Result};
    pub use crate::events::{AmbushReport, Detonation, DockAction, DockEvent, TickEvents};
    pub use crate::math::{Point, Vec2, SCALE};
    pub use crate::simulation::Simulation;
    pub use crate::sites::{Site, SiteKind};
    pub use crate::snapshot::{EntityKind, EntitySnapshot, WorldSnapshot};
    pub use crate::spaceship::{ShipClass, ShipKind, Spaceship, Status};
}
