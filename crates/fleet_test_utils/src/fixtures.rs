//! Test fixtures and helpers.
//!
//! Pre-built fleets for consistent testing. Every builder returns a fresh
//! [`Simulation`] so tests can run them side by side.
//!
//! Coordinates passed to the builders are in display units, the same units
//! the console uses.

use fleet_core::agents::Rank;
use fleet_core::math::{Point, Vec2};
use fleet_core::simulation::Simulation;

/// A point in display units.
#[must_use]
pub fn at(x: f64, y: f64) -> Point {
    Vec2::scaled(x, y)
}

/// Simulation with one free agent of each rank.
///
/// Agents are named `Kirk` (midshipman), `Riker` (commander) and `Adama`
/// (admiral).
///
/// # Panics
///
/// Never panics on a fresh simulation.
#[must_use]
pub fn crewed_simulation() -> Simulation {
    let mut sim = Simulation::new();
    for (name, rank) in [
        ("Kirk", Rank::Shipman),
        ("Riker", Rank::Commander),
        ("Adama", Rank::Admiral),
    ] {
        sim.create_agent(name, rank).expect("fresh agent name");
    }
    sim
}

/// One shuttle hauling from `Mir` (10 crystals, +2 per tick) to `DS`.
///
/// The station is 0.6 display units from the shuttle, the star 1.2.
///
/// # Panics
///
/// Never panics on a fresh simulation.
#[must_use]
pub fn transport_scenario() -> Simulation {
    let mut sim = crewed_simulation();
    sim.create_space_station("Mir", at(0.6, 0.0), 10, 2)
        .expect("fresh site name");
    sim.create_fortress_star("DS", at(1.2, 0.0), 0)
        .expect("fresh site name");
    sim.create_shuttle("Mule", "Kirk", at(0.0, 0.0))
        .expect("free midshipman");
    sim.start_transport("Mule", "Mir", "DS")
        .expect("valid transport");
    sim
}

/// A loaded shuttle on a long haul with a falcon closing in.
///
/// # Panics
///
/// Never panics on a fresh simulation.
#[must_use]
pub fn raid_scenario() -> Simulation {
    let mut sim = crewed_simulation();
    sim.create_space_station("Mir", at(0.0, 0.0), 50, 1)
        .expect("fresh site name");
    sim.create_fortress_star("DS", at(40.0, 0.0), 0)
        .expect("fresh site name");
    sim.create_shuttle("Mule", "Kirk", at(0.0, 0.0))
        .expect("free midshipman");
    sim.start_transport("Mule", "Mir", "DS")
        .expect("valid transport");
    sim.create_falcon("Raptor", at(0.0, 20.0))
        .expect("fresh ship name");
    sim.attack("Raptor", "Mule").expect("shuttle target");
    sim
}

/// A bomber sweeping a ring of four stars.
///
/// # Panics
///
/// Never panics on a fresh simulation.
#[must_use]
pub fn patrol_scenario() -> Simulation {
    let mut sim = crewed_simulation();
    for (name, x, y) in [
        ("North", 0.0, 10.0),
        ("East", 10.0, 0.0),
        ("South", 0.0, -10.0),
        ("West", -10.0, 0.0),
    ] {
        sim.create_fortress_star(name, at(x, y), 0)
            .expect("fresh site name");
    }
    sim.create_bomber("Lancer", "Riker", "North")
        .expect("free commander");
    sim
}

/// A destroyer firing at a falcon parked on the impact point.
///
/// # Panics
///
/// Never panics on a fresh simulation.
#[must_use]
pub fn rocket_scenario() -> Simulation {
    let mut sim = crewed_simulation();
    sim.create_destroyer("Hammer", "Adama", at(0.0, 0.0))
        .expect("free admiral");
    sim.create_falcon("Raptor", at(7.0, 0.0))
        .expect("fresh ship name");
    sim.shoot("Hammer", at(7.0, 0.0)).expect("destroyer fires");
    sim
}

/// A large mixed fleet for stress tests and benchmarks.
///
/// `size` shuttle routes are created, each with its own station, star and
/// midshipman, plus a falcon raiding every second shuttle and a destroyer
/// on course.
///
/// # Panics
///
/// Never panics on a fresh simulation.
#[must_use]
pub fn busy_fleet(size: usize) -> Simulation {
    let mut sim = Simulation::new();
    for i in 0..size {
        let lane = i as f64;
        let station = format!("Station{i}");
        let star = format!("Star{i}");
        let agent = format!("Cadet{i}");
        let shuttle = format!("Shuttle{i}");

        sim.create_space_station(&station, at(0.0, lane), 20, 3)
            .expect("fresh site name");
        sim.create_fortress_star(&star, at(25.0, lane), 0)
            .expect("fresh site name");
        sim.create_agent(&agent, Rank::Shipman)
            .expect("fresh agent name");
        sim.create_shuttle(&shuttle, &agent, at(5.0, lane))
            .expect("free midshipman");
        sim.start_transport(&shuttle, &station, &star)
            .expect("valid transport");

        if i % 2 == 0 {
            let falcon = format!("Falcon{i}");
            sim.create_falcon(&falcon, at(12.0, lane + 8.0))
                .expect("fresh ship name");
            sim.attack(&falcon, &shuttle).expect("shuttle target");
        }
    }

    sim.create_agent("Adama", Rank::Admiral)
        .expect("fresh agent name");
    sim.create_destroyer("Hammer", "Adama", at(-5.0, -5.0))
        .expect("free admiral");
    sim.set_course("Hammer", 45.0, None).expect("destroyer course");
    sim
}
