//! Raid resolution between a falcon and a shuttle.
//!
//! A raid always costs the shuttle one health point. After that the raider
//! wins only if all of the following hold:
//! - the raider is within ambush range of the shuttle
//! - the shuttle is now weaker than the raider
//! - no live bomber is escorting the shuttle
//!
//! A winning raider heals one point and takes the shuttle's cargo; the
//! shuttle abandons its jobs. A losing raider takes one point of damage.

use serde::{Deserialize, Serialize};

use crate::events::AmbushReport;
use crate::spaceship::Spaceship;

/// Result of a raid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmbushOutcome {
    /// The raider plundered the shuttle.
    RaiderWins,
    /// The shuttle fought back and damaged the raider.
    DefenderHolds,
}

/// Decide a raid from its inputs alone.
///
/// `defender_health` is the shuttle's health after the opening hit.
#[must_use]
pub fn ambush_outcome(
    distance: f64,
    defender_health: u32,
    attacker_health: u32,
    escorted: bool,
    ambush_range: f64,
) -> AmbushOutcome {
    if distance <= ambush_range && defender_health < attacker_health && !escorted {
        AmbushOutcome::RaiderWins
    } else {
        AmbushOutcome::DefenderHolds
    }
}

/// Play out a raid, mutating both ships.
pub(crate) fn resolve_ambush(
    attacker: &mut Spaceship,
    defender: &mut Spaceship,
    escorted: bool,
    ambush_range: f64,
) -> AmbushReport {
    defender.hurt();

    let outcome = ambush_outcome(
        attacker.location().distance(defender.location()),
        defender.health(),
        attacker.health(),
        escorted,
        ambush_range,
    );

    let mut plundered = 0;
    match outcome {
        AmbushOutcome::RaiderWins => {
            attacker.heal();
            // Cargo that does not fit in the raider's hold is lost.
            while defender.remove_cargo() {
                if attacker.add_cargo() {
                    plundered += 1;
                }
            }
            defender.stop();
        }
        AmbushOutcome::DefenderHolds => attacker.hurt(),
    }

    AmbushReport {
        attacker: attacker.name().to_string(),
        defender: defender.name().to_string(),
        outcome,
        plundered,
    }
}
