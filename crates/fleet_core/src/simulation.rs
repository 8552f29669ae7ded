//! The world registry and tick loop.
//!
//! [`Simulation`] owns every spaceship, site, free agent and rocket. Other
//! code reaches entities only through it, by name. Nothing is ever removed
//! except rockets, which vanish when they detonate.
//!
//! # Tick order
//!
//! Each tick runs, in this order:
//! 1. **Spaceships** in name order. Dead ships are skipped.
//! 2. **Sites** in name order (station production).
//! 3. **Rockets** in launch order, detonating on arrival.
//!
//! Because sites run after ships, a shuttle loading at a station sees the
//! crystal count from before this tick's production.
//!
//! # Example
//!
//! ```
//! use fleet_core::agents::Rank;
//! use fleet_core::math::Vec2;
//! use fleet_core::simulation::Simulation;
//!
//! let mut sim = Simulation::new();
//! sim.create_space_station("Mir", Vec2::scaled(0.0, 0.0), 10, 2).unwrap();
//! sim.create_fortress_star("DS", Vec2::scaled(1.0, 0.0), 0).unwrap();
//! sim.create_agent("Kirk", Rank::Shipman).unwrap();
//! sim.create_shuttle("Mule", "Kirk", Vec2::scaled(0.0, 0.0)).unwrap();
//! sim.start_transport("Mule", "Mir", "DS").unwrap();
//!
//! for _ in 0..6 {
//!     sim.tick();
//! }
//! assert_eq!(sim.site("DS").unwrap().crystals(), 5);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, VecDeque};
use std::hash::{Hash, Hasher};

use crate::agents::{Agent, Rank};
use crate::combat::resolve_ambush;
use crate::config::FleetConfig;
use crate::error::{Category, FleetError, Result};
use crate::events::{Detonation, TickEvents};
use crate::logistics::shuttle_step;
use crate::math::Point;
use crate::patrol::patrol_step;
use crate::projectile::Rocket;
use crate::sites::{Site, SiteKind};
use crate::snapshot::{EntityKind, EntitySnapshot, WorldSnapshot};
use crate::spaceship::{ShipClass, ShipKind, Spaceship, Status};

/// Name every rocket is displayed under.
pub const ROCKET_NAME: &str = "* ";

/// The fleet simulation.
#[derive(Debug, Clone)]
pub struct Simulation {
    tick: u64,
    config: FleetConfig,
    ships: BTreeMap<String, Spaceship>,
    sites: BTreeMap<String, Site>,
    agents: BTreeMap<String, Agent>,
    rockets: Vec<Rocket>,
}

impl Simulation {
    /// Create an empty simulation with default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(FleetConfig::default())
    }

    /// Create an empty simulation with custom tuning.
    #[must_use]
    pub fn with_config(config: FleetConfig) -> Self {
        Self {
            tick: 0,
            config,
            ships: BTreeMap::new(),
            sites: BTreeMap::new(),
            agents: BTreeMap::new(),
            rockets: Vec::new(),
        }
    }

    /// Number of ticks run so far.
    #[must_use]
    pub const fn get_tick(&self) -> u64 {
        self.tick
    }

    /// Active tuning.
    #[must_use]
    pub const fn config(&self) -> &FleetConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    /// Add an unassigned agent to the pool.
    ///
    /// # Errors
    ///
    /// Fails if any agent, free or crewing a ship, already has the name.
    pub fn create_agent(&mut self, name: &str, rank: Rank) -> Result<()> {
        if self.agent(name).is_ok() {
            return Err(FleetError::duplicate(Category::Agent, name));
        }
        self.agents.insert(name.to_string(), Agent::new(name, rank));
        tracing::info!(agent = name, rank = rank.label(), "Agent created");
        Ok(())
    }

    /// Add a crystal-producing station.
    pub fn create_space_station(
        &mut self,
        name: &str,
        location: Point,
        crystals: u64,
        production_rate: u64,
    ) -> Result<()> {
        self.insert_site(Site::space_station(
            name,
            location,
            crystals,
            production_rate,
        ))
    }

    /// Add a fortress star.
    pub fn create_fortress_star(&mut self, name: &str, location: Point, crystals: u64) -> Result<()> {
        self.insert_site(Site::fortress_star(name, location, crystals))
    }

    fn insert_site(&mut self, site: Site) -> Result<()> {
        if self.sites.contains_key(site.name()) {
            return Err(FleetError::duplicate(Category::Site, site.name()));
        }
        tracing::info!(site = site.name(), kind = site.kind().label(), "Site created");
        self.sites.insert(site.name().to_string(), site);
        Ok(())
    }

    /// Build a shuttle crewed by a free midshipman.
    pub fn create_shuttle(&mut self, name: &str, agent: &str, location: Point) -> Result<()> {
        self.ensure_ship_name_free(name)?;
        let agent = self.take_agent(name, ShipClass::Shuttle, agent)?;
        let kind = ShipKind::Shuttle {
            jobs: VecDeque::new(),
        };
        self.insert_ship(Spaceship::new(name, kind, Some(agent), location, &self.config));
        Ok(())
    }

    /// Build a bomber at `site`, crewed by a free commander.
    ///
    /// The bomber's patrol covers every other site that exists right now.
    pub fn create_bomber(&mut self, name: &str, agent: &str, site: &str) -> Result<()> {
        self.ensure_ship_name_free(name)?;
        let location = self.site(site)?.location();
        let agent = self.take_agent(name, ShipClass::Bomber, agent)?;
        let pending = self
            .sites
            .keys()
            .filter(|other| other.as_str() != site)
            .cloned()
            .collect();
        let kind = ShipKind::Bomber {
            start: site.to_string(),
            pending,
        };
        self.insert_ship(Spaceship::new(name, kind, Some(agent), location, &self.config));
        Ok(())
    }

    /// Build a destroyer crewed by a free admiral.
    pub fn create_destroyer(&mut self, name: &str, agent: &str, location: Point) -> Result<()> {
        self.ensure_ship_name_free(name)?;
        let agent = self.take_agent(name, ShipClass::Destroyer, agent)?;
        self.insert_ship(Spaceship::new(
            name,
            ShipKind::Destroyer,
            Some(agent),
            location,
            &self.config,
        ));
        Ok(())
    }

    /// Build an uncrewed falcon.
    pub fn create_falcon(&mut self, name: &str, location: Point) -> Result<()> {
        self.ensure_ship_name_free(name)?;
        let kind = ShipKind::Falcon { target: None };
        self.insert_ship(Spaceship::new(name, kind, None, location, &self.config));
        Ok(())
    }

    fn ensure_ship_name_free(&self, name: &str) -> Result<()> {
        if self.ships.contains_key(name) {
            return Err(FleetError::duplicate(Category::Spaceship, name));
        }
        Ok(())
    }

    /// Pull an agent out of the free pool for a new ship of `class`.
    ///
    /// Validates everything before removing, so a failure leaves the pool
    /// untouched.
    fn take_agent(&mut self, ship: &str, class: ShipClass, agent: &str) -> Result<Agent> {
        let rank = self.agent(agent)?.rank();
        if let Some(required) = class.required_rank() {
            if rank != required {
                return Err(FleetError::WrongRank {
                    ship: ship.to_string(),
                    kind: class.label(),
                    required: required.label(),
                });
            }
        }
        self.agents
            .remove(agent)
            .ok_or_else(|| FleetError::AgentAlreadyAssigned(agent.to_string()))
    }

    fn insert_ship(&mut self, ship: Spaceship) {
        tracing::info!(
            ship = ship.name(),
            class = ship.class().label(),
            "Spaceship created"
        );
        self.ships.insert(ship.name().to_string(), ship);
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Find a spaceship by name.
    pub fn spaceship(&self, name: &str) -> Result<&Spaceship> {
        self.ships
            .get(name)
            .ok_or_else(|| FleetError::not_found(Category::Spaceship, name))
    }

    /// Find a site by name.
    pub fn site(&self, name: &str) -> Result<&Site> {
        self.sites
            .get(name)
            .ok_or_else(|| FleetError::not_found(Category::Site, name))
    }

    /// Find an agent by name, free or crewing a ship.
    pub fn agent(&self, name: &str) -> Result<&Agent> {
        if let Some(agent) = self.agents.get(name) {
            return Ok(agent);
        }
        self.ships
            .values()
            .filter_map(Spaceship::agent)
            .find(|agent| agent.name() == name)
            .ok_or_else(|| FleetError::not_found(Category::Agent, name))
    }

    /// All spaceships in name order.
    pub fn spaceships(&self) -> impl Iterator<Item = &Spaceship> {
        self.ships.values()
    }

    /// All sites in name order.
    pub fn sites(&self) -> impl Iterator<Item = &Site> {
        self.sites.values()
    }

    /// Unassigned agents in name order.
    pub fn free_agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    /// Rockets in flight, in launch order.
    #[must_use]
    pub fn rockets(&self) -> &[Rocket] {
        &self.rockets
    }

    /// Whether a live bomber is within escort range of `point`.
    ///
    /// Dead bombers never escort, even when parked next to the shuttle.
    #[must_use]
    pub fn bomber_nearby(&self, point: Point) -> bool {
        self.ships.values().any(|ship| {
            ship.class() == ShipClass::Bomber
                && ship.is_alive()
                && ship.location().distance(point) <= self.config.escort_range
        })
    }

    /// Derived status of a spaceship.
    pub fn status(&self, name: &str) -> Result<Status> {
        Ok(self.spaceship(name)?.status())
    }

    /// One-line description of a spaceship.
    pub fn describe(&self, name: &str) -> Result<String> {
        Ok(self.spaceship(name)?.describe())
    }

    // ------------------------------------------------------------------
    // Orders
    // ------------------------------------------------------------------

    fn ship_for_orders(&mut self, name: &str) -> Result<&mut Spaceship> {
        let ship = self
            .ships
            .get_mut(name)
            .ok_or_else(|| FleetError::not_found(Category::Spaceship, name))?;
        if !ship.is_alive() {
            return Err(FleetError::Dead(name.to_string()));
        }
        Ok(ship)
    }

    /// Fly a bearing in degrees, optionally changing speed (falcons only).
    pub fn set_course(&mut self, name: &str, angle: f64, speed: Option<f64>) -> Result<()> {
        let ship = self.ship_for_orders(name)?;
        match speed {
            Some(speed) => ship.set_course_with_speed(angle, speed),
            None => ship.set_course(angle),
        }
    }

    /// Fly to a point, optionally changing speed (falcons only).
    pub fn set_position(&mut self, name: &str, point: Point, speed: Option<f64>) -> Result<()> {
        let ship = self.ship_for_orders(name)?;
        match speed {
            Some(speed) => ship.go_with_speed(point, speed),
            None => ship.go(point),
        }
    }

    /// Fly to a named site.
    pub fn set_destination(&mut self, name: &str, site: &str) -> Result<()> {
        self.ship_for_orders(name)?;
        let site = self
            .sites
            .get(site)
            .ok_or_else(|| FleetError::not_found(Category::Site, site))?;
        let ship = self
            .ships
            .get_mut(name)
            .ok_or_else(|| FleetError::not_found(Category::Spaceship, name))?;
        ship.go_to(site)
    }

    /// Halt a spaceship and drop its queued work.
    pub fn stop(&mut self, name: &str) -> Result<()> {
        self.ship_for_orders(name)?.stop();
        Ok(())
    }

    /// Send a falcon after a shuttle.
    pub fn attack(&mut self, name: &str, target: &str) -> Result<()> {
        self.ship_for_orders(name)?;
        let victim = self.spaceship(target)?.clone();
        self.ship_for_orders(name)?.attack(&victim)
    }

    /// Fire a rocket from a destroyer.
    pub fn shoot(&mut self, name: &str, point: Point) -> Result<()> {
        let rocket_speed = self.config.rocket_speed;
        let rocket = self.ship_for_orders(name)?.shoot(point, rocket_speed)?;
        tracing::info!(ship = name, target = %point, "Rocket launched");
        self.rockets.push(rocket);
        Ok(())
    }

    /// Queue a station-to-star delivery on a shuttle.
    pub fn start_transport(&mut self, name: &str, station: &str, star: &str) -> Result<()> {
        self.ship_for_orders(name)?;
        let station = self
            .sites
            .get(station)
            .ok_or_else(|| FleetError::not_found(Category::Site, station))?;
        let star = self
            .sites
            .get(star)
            .ok_or_else(|| FleetError::not_found(Category::Site, star))?;
        let ship = self
            .ships
            .get_mut(name)
            .ok_or_else(|| FleetError::not_found(Category::Spaceship, name))?;
        ship.queue_transport(station, star)
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// Advance the simulation by one tick.
    ///
    /// Returns the notable events of the tick.
    pub fn tick(&mut self) -> TickEvents {
        let mut events = TickEvents::default();

        let names: Vec<String> = self.ships.keys().cloned().collect();
        for name in &names {
            self.update_ship(name, &mut events);
        }

        for site in self.sites.values_mut() {
            site.update();
        }

        self.run_rockets(&mut events);

        self.tick += 1;

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            tracing::debug!(tick = self.tick, state_hash = hash, "Simulation state hash");
        }

        events
    }

    /// Update one ship. The ship is taken out of the registry for the
    /// duration so it can interact with the rest of the world.
    fn update_ship(&mut self, name: &str, events: &mut TickEvents) {
        let Some(mut ship) = self.ships.remove(name) else {
            return;
        };

        if ship.is_alive() {
            match ship.class() {
                ShipClass::Shuttle => {
                    if let Some(dock) = shuttle_step(&mut ship, &mut self.sites) {
                        tracing::info!(
                            ship = %dock.ship,
                            site = %dock.site,
                            crystals = dock.crystals,
                            "Shuttle docked"
                        );
                        events.docks.push(dock);
                    }
                    ship.advance();
                }
                ShipClass::Bomber => {
                    ship.advance();
                    patrol_step(&mut ship, &self.sites);
                }
                ShipClass::Destroyer => ship.advance(),
                ShipClass::Falcon => self.falcon_step(&mut ship, events),
            }
        }

        self.ships.insert(name.to_string(), ship);
    }

    /// Chase the pursued shuttle's live position, then raid it.
    fn falcon_step(&mut self, falcon: &mut Spaceship, events: &mut TickEvents) {
        let Some(target) = falcon.pursuit_target().map(str::to_string) else {
            falcon.advance();
            return;
        };

        let victim_location = match self.ships.get(&target) {
            Some(victim) if victim.is_alive() => victim.location(),
            _ => {
                tracing::warn!(
                    falcon = falcon.name(),
                    target = %target,
                    "Target lost, engagement dropped"
                );
                falcon.stop();
                return;
            }
        };

        falcon.pursue(victim_location);
        falcon.advance();

        let escorted = self.bomber_nearby(victim_location);
        if let Some(victim) = self.ships.get_mut(&target) {
            let report = resolve_ambush(falcon, victim, escorted, self.config.ambush_range);
            tracing::info!(
                attacker = %report.attacker,
                defender = %report.defender,
                outcome = ?report.outcome,
                plundered = report.plundered,
                "Ambush resolved"
            );
            events.ambushes.push(report);
        }
        falcon.stop();
    }

    fn run_rockets(&mut self, events: &mut TickEvents) {
        let mut in_flight = Vec::with_capacity(self.rockets.len());
        for mut rocket in std::mem::take(&mut self.rockets) {
            rocket.update();
            if rocket.has_landed() {
                events.detonations.push(self.detonate(&rocket));
            } else {
                in_flight.push(rocket);
            }
        }
        self.rockets = in_flight;
    }

    /// Destroy every live falcon sitting exactly on the impact point.
    fn detonate(&mut self, rocket: &Rocket) -> Detonation {
        let point = rocket.location();
        let mut destroyed = Vec::new();
        for ship in self.ships.values_mut() {
            if ship.class() == ShipClass::Falcon && ship.is_alive() && ship.location() == point {
                ship.die();
                destroyed.push(ship.name().to_string());
            }
        }
        tracing::info!(point = %point, destroyed = destroyed.len(), "Rocket detonated");
        Detonation { point, destroyed }
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Positions and vitals of every entity.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        let sites = self
            .sites
            .values()
            .map(|site| EntitySnapshot {
                name: site.name().to_string(),
                kind: match site.kind() {
                    SiteKind::SpaceStation { .. } => EntityKind::SpaceStation,
                    SiteKind::FortressStar => EntityKind::FortressStar,
                },
                location: site.location(),
                health: None,
                cargo: None,
                crystals: Some(site.crystals()),
            })
            .collect();

        let ships = self
            .ships
            .values()
            .map(|ship| EntitySnapshot {
                name: ship.name().to_string(),
                kind: match ship.class() {
                    ShipClass::Shuttle => EntityKind::Shuttle,
                    ShipClass::Bomber => EntityKind::Bomber,
                    ShipClass::Destroyer => EntityKind::Destroyer,
                    ShipClass::Falcon => EntityKind::Falcon,
                },
                location: ship.location(),
                health: Some(ship.health()),
                cargo: Some(ship.cargo()),
                crystals: None,
            })
            .collect();

        let rockets = self
            .rockets
            .iter()
            .map(|rocket| EntitySnapshot {
                name: ROCKET_NAME.to_string(),
                kind: EntityKind::Rocket,
                location: rocket.location(),
                health: None,
                cargo: None,
                crystals: None,
            })
            .collect();

        WorldSnapshot {
            tick: self.tick,
            sites,
            ships,
            rockets,
        }
    }

    /// Hash of the full simulation state.
    ///
    /// Two simulations fed the same commands produce the same hash.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.tick.hash(&mut hasher);

        self.ships.len().hash(&mut hasher);
        for ship in self.ships.values() {
            ship.name().hash(&mut hasher);
            hash_point(ship.location(), &mut hasher);
            hash_point(ship.destination(), &mut hasher);
            ship.speed().to_bits().hash(&mut hasher);
            ship.health().hash(&mut hasher);
            ship.cargo().hash(&mut hasher);
            ship.site_name().hash(&mut hasher);
            ship.course_degrees().map(f64::to_bits).hash(&mut hasher);
            match ship.kind() {
                ShipKind::Shuttle { jobs } => jobs.hash(&mut hasher),
                ShipKind::Bomber { pending, .. } => pending.hash(&mut hasher),
                ShipKind::Destroyer => {}
                ShipKind::Falcon { target } => target.hash(&mut hasher),
            }
        }

        self.sites.len().hash(&mut hasher);
        for site in self.sites.values() {
            site.name().hash(&mut hasher);
            site.crystals().hash(&mut hasher);
        }

        self.agents.len().hash(&mut hasher);

        self.rockets.len().hash(&mut hasher);
        for rocket in &self.rockets {
            hash_point(rocket.location(), &mut hasher);
            hash_point(rocket.destination(), &mut hasher);
        }

        hasher.finish()
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

fn hash_point(point: Point, hasher: &mut impl Hasher) {
    point.x.to_bits().hash(hasher);
    point.y.to_bits().hash(hasher);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::AmbushOutcome;
    use crate::events::DockAction;
    use crate::math::Vec2;

    fn crewed() -> Simulation {
        let mut sim = Simulation::new();
        sim.create_agent("Kirk", Rank::Shipman).unwrap();
        sim.create_agent("Riker", Rank::Commander).unwrap();
        sim.create_agent("Adama", Rank::Admiral).unwrap();
        sim
    }

    #[test]
    fn test_simulation_new() {
        let sim = Simulation::new();
        assert_eq!(sim.get_tick(), 0);
        assert_eq!(sim.spaceships().count(), 0);
        assert!(sim.rockets().is_empty());
    }

    #[test]
    fn test_tick_increments() {
        let mut sim = Simulation::new();
        sim.tick();
        sim.tick();
        assert_eq!(sim.get_tick(), 2);
    }

    #[test]
    fn test_duplicate_names_rejected_per_category() {
        let mut sim = crewed();
        sim.create_falcon("Raptor", Vec2::ZERO).unwrap();
        let before = sim.state_hash();

        assert_eq!(
            sim.create_falcon("Raptor", Vec2::new(1.0, 1.0)),
            Err(FleetError::duplicate(Category::Spaceship, "Raptor"))
        );
        assert_eq!(sim.state_hash(), before);

        // Other categories may reuse the name.
        sim.create_fortress_star("Raptor", Vec2::ZERO, 0).unwrap();
        sim.create_agent("Raptor", Rank::Admiral).unwrap();
        assert!(sim.create_fortress_star("Raptor", Vec2::ZERO, 0).is_err());
        assert!(sim.create_agent("Raptor", Rank::Shipman).is_err());
    }

    #[test]
    fn test_agent_consumed_once() {
        let mut sim = crewed();
        sim.create_shuttle("Mule", "Kirk", Vec2::ZERO).unwrap();

        assert!(sim.free_agents().all(|agent| agent.name() != "Kirk"));
        assert_eq!(sim.agent("Kirk").unwrap().rank(), Rank::Shipman);
        assert_eq!(
            sim.create_shuttle("Mule2", "Kirk", Vec2::ZERO),
            Err(FleetError::AgentAlreadyAssigned("Kirk".to_string()))
        );
        assert!(sim.spaceship("Mule2").is_err());
        // Bound agents still block their name.
        assert!(sim.create_agent("Kirk", Rank::Shipman).is_err());
    }

    #[test]
    fn test_wrong_rank_leaves_pool_intact() {
        let mut sim = crewed();
        let err = sim.create_destroyer("Hammer", "Kirk", Vec2::ZERO).unwrap_err();
        assert!(matches!(err, FleetError::WrongRank { required: "Admiral", .. }));
        assert_eq!(sim.free_agents().count(), 3);
        assert!(sim.spaceship("Hammer").is_err());
    }

    #[test]
    fn test_unknown_agent_or_site() {
        let mut sim = crewed();
        assert!(matches!(
            sim.create_shuttle("Mule", "Nobody", Vec2::ZERO),
            Err(FleetError::NotFound {
                category: Category::Agent,
                ..
            })
        ));
        assert!(matches!(
            sim.create_bomber("Lancer", "Riker", "Nowhere"),
            Err(FleetError::NotFound {
                category: Category::Site,
                ..
            })
        ));
        assert!(sim.agent("Riker").is_ok());
    }

    #[test]
    fn test_bomber_snapshot_excludes_start_and_later_sites() {
        let mut sim = crewed();
        sim.create_fortress_star("A", Vec2::ZERO, 0).unwrap();
        sim.create_fortress_star("B", Vec2::new(10.0, 0.0), 0).unwrap();
        sim.create_bomber("Lancer", "Riker", "A").unwrap();
        sim.create_fortress_star("C", Vec2::new(20.0, 0.0), 0).unwrap();

        let bomber = sim.spaceship("Lancer").unwrap();
        assert_eq!(bomber.location(), Vec2::ZERO);
        assert!(matches!(
            bomber.kind(),
            ShipKind::Bomber { pending, .. } if pending == &vec!["B".to_string()]
        ));
    }

    #[test]
    fn test_transport_end_to_end() {
        let mut sim = crewed();
        sim.create_space_station("Mir", Vec2::new(600.0, 0.0), 10, 2)
            .unwrap();
        sim.create_fortress_star("DS", Vec2::new(1200.0, 0.0), 0)
            .unwrap();
        sim.create_shuttle("Mule", "Kirk", Vec2::ZERO).unwrap();
        sim.start_transport("Mule", "Mir", "DS").unwrap();

        let mut docks = Vec::new();
        for _ in 0..10 {
            docks.extend(sim.tick().docks);
        }

        assert_eq!(docks.len(), 2);
        assert_eq!(docks[0].action, DockAction::Loaded);
        assert_eq!(docks[0].crystals, 5);
        assert_eq!(docks[1].action, DockAction::Delivered);

        let shuttle = sim.spaceship("Mule").unwrap();
        assert_eq!(shuttle.cargo(), 0);
        assert_eq!(shuttle.health(), 11);
        assert_eq!(shuttle.pending_jobs(), 0);
        assert_eq!(sim.site("DS").unwrap().crystals(), 5);
    }

    #[test]
    fn test_transfer_reads_stock_before_production() {
        let mut sim = crewed();
        sim.create_space_station("Mir", Vec2::ZERO, 3, 4).unwrap();
        sim.create_fortress_star("DS", Vec2::new(300.0, 0.0), 0)
            .unwrap();
        sim.create_shuttle("Mule", "Kirk", Vec2::ZERO).unwrap();
        sim.start_transport("Mule", "Mir", "DS").unwrap();

        let events = sim.tick();

        assert_eq!(events.docks[0].crystals, 3);
        assert_eq!(sim.spaceship("Mule").unwrap().cargo(), 3);
        assert_eq!(sim.site("Mir").unwrap().crystals(), 4);
    }

    #[test]
    fn test_shuttle_orders_restricted() {
        let mut sim = crewed();
        sim.create_fortress_star("DS", Vec2::ZERO, 0).unwrap();
        sim.create_shuttle("Mule", "Kirk", Vec2::ZERO).unwrap();

        assert!(sim.set_position("Mule", Vec2::new(1.0, 0.0), None).is_err());
        assert!(sim.set_destination("Mule", "DS").is_err());
        assert!(sim.set_course("Mule", 10.0, None).is_err());
        assert!(sim.shoot("Mule", Vec2::ZERO).is_err());
        assert_eq!(sim.status("Mule").unwrap(), Status::Stopped);
    }

    #[test]
    fn test_transport_validates_sites() {
        let mut sim = crewed();
        sim.create_space_station("Mir", Vec2::ZERO, 3, 4).unwrap();
        sim.create_fortress_star("DS", Vec2::ZERO, 0).unwrap();
        sim.create_shuttle("Mule", "Kirk", Vec2::ZERO).unwrap();
        sim.create_destroyer("Hammer", "Adama", Vec2::ZERO).unwrap();

        assert!(matches!(
            sim.start_transport("Mule", "DS", "DS"),
            Err(FleetError::NotAStation(_))
        ));
        assert!(matches!(
            sim.start_transport("Mule", "Mir", "Gone"),
            Err(FleetError::NotFound { .. })
        ));
        assert!(matches!(
            sim.start_transport("Hammer", "Mir", "DS"),
            Err(FleetError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_falcon_raid_plunders_weak_shuttle() {
        let mut sim = crewed();
        sim.create_space_station("Mir", Vec2::ZERO, 100, 0).unwrap();
        sim.create_fortress_star("DS", Vec2::new(100_000.0, 0.0), 0)
            .unwrap();
        sim.create_shuttle("Mule", "Kirk", Vec2::ZERO).unwrap();
        sim.start_transport("Mule", "Mir", "DS").unwrap();
        sim.tick();
        assert_eq!(sim.spaceship("Mule").unwrap().cargo(), 5);

        // Out-of-range raids still cost the shuttle a point each.
        for i in 0..5 {
            let name = format!("Decoy{i}");
            sim.create_falcon(&name, Vec2::new(0.0, 50_000.0)).unwrap();
            sim.attack(&name, "Mule").unwrap();
            sim.tick();
        }
        assert_eq!(sim.spaceship("Mule").unwrap().health(), 5);

        // Mule moves to x = 1800 before the falcon acts this tick.
        assert_eq!(sim.spaceship("Mule").unwrap().location(), Vec2::new(1500.0, 0.0));
        sim.create_falcon("Raptor", Vec2::new(1800.0, 2000.0)).unwrap();
        sim.attack("Raptor", "Mule").unwrap();
        let events = sim.tick();

        let report = events
            .ambushes
            .iter()
            .find(|r| r.attacker == "Raptor")
            .unwrap();
        assert_eq!(report.outcome, AmbushOutcome::RaiderWins);

        let raptor = sim.spaceship("Raptor").unwrap();
        assert_eq!(raptor.cargo(), 5);
        assert_eq!(raptor.health(), 6);
        assert_eq!(raptor.status(), Status::Stopped);
        let mule = sim.spaceship("Mule").unwrap();
        assert_eq!(mule.cargo(), 0);
        assert_eq!(mule.pending_jobs(), 0);
    }

    #[test]
    fn test_bomber_nearby_uses_escort_range() {
        let mut sim = crewed();
        sim.create_fortress_star("Home", Vec2::ZERO, 0).unwrap();
        sim.create_bomber("Lancer", "Riker", "Home").unwrap();
        sim.create_shuttle("Mule", "Kirk", Vec2::new(200.0, 0.0))
            .unwrap();
        assert!(sim.bomber_nearby(Vec2::new(200.0, 0.0)));
        assert!(!sim.bomber_nearby(Vec2::new(300.0, 0.0)));
    }

    #[test]
    fn test_attack_validation() {
        let mut sim = crewed();
        sim.create_falcon("Raptor", Vec2::ZERO).unwrap();
        sim.create_destroyer("Hammer", "Adama", Vec2::ZERO).unwrap();

        assert!(matches!(
            sim.attack("Raptor", "Hammer"),
            Err(FleetError::InvalidTarget { .. })
        ));
        assert!(matches!(
            sim.attack("Hammer", "Raptor"),
            Err(FleetError::Unsupported { .. })
        ));
        assert!(matches!(
            sim.attack("Raptor", "Ghost"),
            Err(FleetError::NotFound { .. })
        ));
    }

    #[test]
    fn test_rocket_destroys_falcon_on_impact() {
        let mut sim = crewed();
        sim.create_destroyer("Hammer", "Adama", Vec2::ZERO).unwrap();
        sim.create_falcon("Raptor", Vec2::new(7000.0, 0.0)).unwrap();
        sim.create_falcon("Swift", Vec2::new(7000.0, 1.0)).unwrap();
        sim.shoot("Hammer", Vec2::new(7000.0, 0.0)).unwrap();
        assert_eq!(sim.rockets().len(), 1);

        sim.tick();
        sim.tick();
        assert_eq!(sim.rockets().len(), 1);
        let events = sim.tick();

        assert!(sim.rockets().is_empty());
        assert_eq!(events.detonations.len(), 1);
        assert_eq!(events.detonations[0].destroyed, vec!["Raptor".to_string()]);
        assert_eq!(sim.status("Raptor").unwrap(), Status::Dead);
        assert_eq!(sim.status("Swift").unwrap(), Status::Stopped);
        assert_eq!(sim.status("Hammer").unwrap(), Status::Stopped);
    }

    #[test]
    fn test_dead_ship_rejects_orders_and_stays_put() {
        let mut sim = crewed();
        sim.create_destroyer("Hammer", "Adama", Vec2::ZERO).unwrap();
        sim.create_falcon("Raptor", Vec2::ZERO).unwrap();
        sim.shoot("Hammer", Vec2::ZERO).unwrap();
        sim.tick();

        assert_eq!(sim.status("Raptor").unwrap(), Status::Dead);
        assert_eq!(
            sim.set_position("Raptor", Vec2::new(9.0, 9.0), None),
            Err(FleetError::Dead("Raptor".to_string()))
        );
        assert!(sim.stop("Raptor").is_err());
        sim.tick();
        assert_eq!(sim.spaceship("Raptor").unwrap().location(), Vec2::ZERO);
        assert!(sim.describe("Raptor").unwrap().contains("is dead."));
    }

    #[test]
    fn test_negative_speed_orders_leave_falcon_alone() {
        let mut sim = crewed();
        sim.create_falcon("Raptor", Vec2::ZERO).unwrap();

        assert_eq!(
            sim.set_position("Raptor", Vec2::new(1000.0, 0.0), Some(-50.0)),
            Err(FleetError::InvalidSpeed(-50.0))
        );
        assert_eq!(
            sim.set_course("Raptor", 90.0, Some(-50.0)),
            Err(FleetError::InvalidSpeed(-50.0))
        );
        for _ in 0..3 {
            sim.tick();
        }
        let raptor = sim.spaceship("Raptor").unwrap();
        assert_eq!(raptor.location(), Vec2::ZERO);
        assert_eq!(raptor.status(), Status::Stopped);
    }

    #[test]
    fn test_falcon_drops_dead_target() {
        let mut sim = crewed();
        sim.create_shuttle("Mule", "Kirk", Vec2::ZERO).unwrap();
        sim.create_falcon("Raptor", Vec2::new(5000.0, 0.0)).unwrap();
        sim.attack("Raptor", "Mule").unwrap();

        if let Some(mule) = sim.ships.get_mut("Mule") {
            mule.die();
        }
        let events = sim.tick();

        assert!(events.ambushes.is_empty());
        let raptor = sim.spaceship("Raptor").unwrap();
        assert_eq!(raptor.pursuit_target(), None);
        assert_eq!(raptor.location(), Vec2::new(5000.0, 0.0));
    }

    #[test]
    fn test_snapshot_lists_everything() {
        let mut sim = crewed();
        sim.create_fortress_star("DS", Vec2::ZERO, 9).unwrap();
        sim.create_destroyer("Hammer", "Adama", Vec2::ZERO).unwrap();
        sim.shoot("Hammer", Vec2::new(9000.0, 0.0)).unwrap();

        let snapshot = sim.snapshot();
        assert_eq!(snapshot.sites.len(), 1);
        assert_eq!(snapshot.sites[0].crystals, Some(9));
        assert_eq!(snapshot.ships[0].kind, EntityKind::Destroyer);
        assert_eq!(snapshot.rockets[0].name, ROCKET_NAME);
        assert_eq!(snapshot.entities().count(), 3);
    }

    #[test]
    fn test_deterministic_hash() {
        let build = || {
            let mut sim = crewed();
            sim.create_falcon("Raptor", Vec2::ZERO).unwrap();
            sim.set_course("Raptor", 33.0, Some(120.0)).unwrap();
            sim
        };
        let mut a = build();
        let mut b = build();
        for _ in 0..10 {
            a.tick();
            b.tick();
        }
        assert_eq!(a.state_hash(), b.state_hash());
        b.tick();
        assert_ne!(a.state_hash(), b.state_hash());
    }
}
