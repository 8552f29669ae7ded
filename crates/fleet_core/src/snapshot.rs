//! Read-only world snapshots for renderers and tooling.

use serde::{Deserialize, Serialize};

use crate::math::Point;

/// What an entity in a snapshot is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Crystal hauler.
    Shuttle,
    /// Site patroller.
    Bomber,
    /// Rocket launcher.
    Destroyer,
    /// Shuttle raider.
    Falcon,
    /// Producing site.
    SpaceStation,
    /// Storage site.
    FortressStar,
    /// Rocket in flight.
    Rocket,
}

/// One entity's position and vitals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Entity name. Rockets are all called `"* "`.
    pub name: String,
    /// Entity kind.
    pub kind: EntityKind,
    /// Location in simulation units.
    pub location: Point,
    /// Health, for spaceships.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<u32>,
    /// Hold contents, for spaceships.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cargo: Option<u32>,
    /// Stored crystals, for sites.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crystals: Option<u64>,
}

/// Every live entity at one tick, grouped by category in name order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Tick the snapshot was taken at.
    pub tick: u64,
    /// Sites.
    pub sites: Vec<EntitySnapshot>,
    /// Spaceships.
    pub ships: Vec<EntitySnapshot>,
    /// Rockets in flight.
    pub rockets: Vec<EntitySnapshot>,
}

impl WorldSnapshot {
    /// Sites, then ships, then rockets.
    pub fn entities(&self) -> impl Iterator<Item = &EntitySnapshot> {
        self.sites
            .iter()
            .chain(self.ships.iter())
            .chain(self.rockets.iter())
    }
}
