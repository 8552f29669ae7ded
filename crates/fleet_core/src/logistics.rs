//! Shuttle transport jobs.
//!
//! A job has two legs. On the pickup leg the shuttle flies to the station
//! and, once sitting exactly on it, loads crystals one at a time until the
//! hold is full or the station is empty. On the delivery leg it flies to
//! the star, unloads everything, and heals one point. Both transfers happen
//! in the tick the shuttle is found docked, before sites produce.

use std::collections::BTreeMap;

use crate::events::{DockAction, DockEvent};
use crate::sites::Site;
use crate::spaceship::Spaceship;

/// Move crystals from `station` into the hold until full or dry.
///
/// Returns the number of crystals loaded.
pub fn load_burst(ship: &mut Spaceship, station: &mut Site) -> u64 {
    let mut loaded = 0;
    while ship.cargo_space() > 0 && station.remove_crystals(1) == 1 {
        ship.add_cargo();
        loaded += 1;
    }
    loaded
}

/// Empty the hold onto `star`.
///
/// Returns the number of crystals delivered.
pub fn unload_burst(ship: &mut Spaceship, star: &mut Site) -> u64 {
    let mut delivered = 0;
    while ship.remove_cargo() {
        star.add_crystals(1);
        delivered += 1;
    }
    delivered
}

/// Work on the shuttle's front job. Runs before the shuttle moves.
pub(crate) fn shuttle_step(
    ship: &mut Spaceship,
    sites: &mut BTreeMap<String, Site>,
) -> Option<DockEvent> {
    let job = ship.current_job()?.clone();
    let here = ship.location();

    if let Some(station_name) = job.station {
        let station = sites.get_mut(&station_name)?;
        if station.location() != here {
            ship.steer_to(station);
            return None;
        }
        let crystals = load_burst(ship, station);
        ship.mark_loaded();
        return Some(DockEvent {
            ship: ship.name().to_string(),
            site: station_name,
            action: DockAction::Loaded,
            crystals,
        });
    }

    let star = sites.get_mut(&job.star)?;
    if star.location() != here {
        ship.steer_to(star);
        return None;
    }
    let crystals = unload_burst(ship, star);
    ship.heal();
    ship.finish_job();
    Some(DockEvent {
        ship: ship.name().to_string(),
        site: job.star,
        action: DockAction::Delivered,
        crystals,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::agents::{Agent, Rank};
    use crate::config::FleetConfig;
    use crate::math::Vec2;
    use crate::spaceship::{ShipKind, Status};

    fn shuttle() -> Spaceship {
        Spaceship::new(
            "Mule",
            ShipKind::Shuttle {
                jobs: VecDeque::new(),
            },
            Some(Agent::new("Kirk", Rank::Shipman)),
            Vec2::ZERO,
            &FleetConfig::default(),
        )
    }

    fn sites() -> BTreeMap<String, Site> {
        let mut sites = BTreeMap::new();
        sites.insert(
            "DS".to_string(),
            Site::fortress_star("DS", Vec2::new(600.0, 0.0), 0),
        );
        sites.insert(
            "Mir".to_string(),
            Site::space_station("Mir", Vec2::ZERO, 3, 0),
        );
        sites
    }

    #[test]
    fn test_load_burst_conserves_crystals() {
        let mut ship = shuttle();
        let mut station = Site::space_station("Mir", Vec2::ZERO, 12, 0);
        ship.add_cargo();

        let loaded = load_burst(&mut ship, &mut station);

        assert_eq!(loaded, 4);
        assert_eq!(loaded + station.crystals(), 12);
        assert_eq!(ship.cargo(), 5);
    }

    #[test]
    fn test_load_burst_drains_small_station() {
        let mut ship = shuttle();
        let mut station = Site::space_station("Mir", Vec2::ZERO, 2, 0);
        assert_eq!(load_burst(&mut ship, &mut station), 2);
        assert_eq!(station.crystals(), 0);
        assert_eq!(ship.cargo(), 2);
    }

    #[test]
    fn test_unload_burst_empties_hold() {
        let mut ship = shuttle();
        let mut star = Site::fortress_star("DS", Vec2::ZERO, 10);
        ship.add_cargo();
        ship.add_cargo();
        assert_eq!(unload_burst(&mut ship, &mut star), 2);
        assert_eq!(star.crystals(), 12);
        assert_eq!(ship.cargo(), 0);
    }

    #[test]
    fn test_full_job_cycle() {
        let mut sites = sites();
        let mut ship = shuttle();
        let (station, star) = (sites["Mir"].clone(), sites["DS"].clone());
        ship.queue_transport(&station, &star).unwrap();

        // Already sitting on the station: load right away.
        let dock = shuttle_step(&mut ship, &mut sites).unwrap();
        assert_eq!(dock.action, DockAction::Loaded);
        assert_eq!(dock.crystals, 3);
        ship.advance();

        // Next tick heads for the star.
        assert!(shuttle_step(&mut ship, &mut sites).is_none());
        assert_eq!(ship.status(), Status::Moving);
        ship.advance();
        ship.advance();
        assert_eq!(ship.status(), Status::Docked);

        let dock = shuttle_step(&mut ship, &mut sites).unwrap();
        assert_eq!(dock.action, DockAction::Delivered);
        assert_eq!(dock.crystals, 3);
        assert_eq!(sites["DS"].crystals(), 3);
        assert_eq!(ship.health(), 11);
        assert_eq!(ship.pending_jobs(), 0);
    }

    #[test]
    fn test_idle_shuttle_does_nothing() {
        let mut sites = sites();
        let mut ship = shuttle();
        assert!(shuttle_step(&mut ship, &mut sites).is_none());
        assert_eq!(ship.status(), Status::Stopped);
    }
}
