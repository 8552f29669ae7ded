//! Spaceships: the controllable units of the fleet.
//!
//! A [`Spaceship`] carries the state every kind shares (motion, health,
//! cargo, crew, site/course locks) and a [`ShipKind`] with the per-kind
//! data. Orders a kind does not support return
//! [`FleetError::Unsupported`] instead of silently doing nothing.
//!
//! Status is never stored. It is derived on demand from health, motion and
//! the site lock, see [`Spaceship::status`].

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::agents::{Agent, Rank};
use crate::config::{FleetConfig, ShipStats};
use crate::error::{FleetError, Result};
use crate::math::{Point, Vec2, SCALE};
use crate::motion::{check_speed, Motion};
use crate::projectile::Rocket;
use crate::sites::Site;

/// Spaceship type tag, without per-kind data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipClass {
    /// Crystal hauler.
    Shuttle,
    /// Site patroller.
    Bomber,
    /// Rocket launcher.
    Destroyer,
    /// Shuttle raider.
    Falcon,
}

impl ShipClass {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ShipClass::Shuttle => "Shuttle",
            ShipClass::Bomber => "Bomber",
            ShipClass::Destroyer => "Destroyer",
            ShipClass::Falcon => "Falcon",
        }
    }

    /// Crew rank this class must be built with. Falcons fly without crew.
    #[must_use]
    pub const fn required_rank(self) -> Option<Rank> {
        match self {
            ShipClass::Shuttle => Some(Rank::Shipman),
            ShipClass::Bomber => Some(Rank::Commander),
            ShipClass::Destroyer => Some(Rank::Admiral),
            ShipClass::Falcon => None,
        }
    }

    /// Base stats for this class.
    #[must_use]
    pub const fn stats(self, config: &FleetConfig) -> ShipStats {
        match self {
            ShipClass::Shuttle => config.shuttle,
            ShipClass::Bomber => config.bomber,
            ShipClass::Destroyer => config.destroyer,
            ShipClass::Falcon => config.falcon,
        }
    }
}

/// One station-to-star delivery.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransportJob {
    /// Pickup station. Cleared once the cargo has been loaded.
    pub station: Option<String>,
    /// Delivery star.
    pub star: String,
}

/// Per-kind spaceship data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShipKind {
    /// Works through a FIFO of transport jobs.
    Shuttle {
        /// Pending deliveries, front is active.
        jobs: VecDeque<TransportJob>,
    },
    /// Sweeps every site once, nearest first.
    Bomber {
        /// Site the patrol started from.
        start: String,
        /// Sites not yet visited, in registry order.
        pending: Vec<String>,
    },
    /// Fires rockets.
    Destroyer,
    /// Chases and raids one shuttle.
    Falcon {
        /// Shuttle being pursued.
        target: Option<String>,
    },
}

impl ShipKind {
    /// Type tag for this kind.
    #[must_use]
    pub const fn class(&self) -> ShipClass {
        match self {
            ShipKind::Shuttle { .. } => ShipClass::Shuttle,
            ShipKind::Bomber { .. } => ShipClass::Bomber,
            ShipKind::Destroyer => ShipClass::Destroyer,
            ShipKind::Falcon { .. } => ShipClass::Falcon,
        }
    }
}

/// Derived spaceship status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Idle in open space.
    Stopped,
    /// Travelling toward a destination.
    Moving,
    /// Idle on the site it was sent to.
    Docked,
    /// Health reached zero.
    Dead,
}

/// Site lock: name plus the (immutable) site location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SiteLock {
    name: String,
    location: Point,
}

/// A spaceship in the fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spaceship {
    name: String,
    motion: Motion,
    health: u32,
    cargo: u32,
    max_health: u32,
    max_cargo: u32,
    agent: Option<Agent>,
    site: Option<SiteLock>,
    course: Option<f64>,
    kind: ShipKind,
}

impl Spaceship {
    pub(crate) fn new(
        name: &str,
        kind: ShipKind,
        agent: Option<Agent>,
        location: Point,
        config: &FleetConfig,
    ) -> Self {
        let stats = kind.class().stats(config);
        Self {
            name: name.to_string(),
            motion: Motion::new(location, stats.speed),
            health: stats.health.min(config.max_health),
            cargo: 0,
            max_health: config.max_health,
            max_cargo: config.max_cargo,
            agent,
            site: None,
            course: None,
            kind,
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Spaceship name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current location.
    #[must_use]
    pub const fn location(&self) -> Point {
        self.motion.location
    }

    /// Current destination.
    #[must_use]
    pub const fn destination(&self) -> Point {
        self.motion.destination
    }

    /// Distance covered per tick.
    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.motion.speed
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Crystals in the hold.
    #[must_use]
    pub const fn cargo(&self) -> u32 {
        self.cargo
    }

    /// Free space in the hold.
    #[must_use]
    pub const fn cargo_space(&self) -> u32 {
        self.max_cargo - self.cargo
    }

    /// Crew member, if any.
    #[must_use]
    pub const fn agent(&self) -> Option<&Agent> {
        self.agent.as_ref()
    }

    /// Per-kind data.
    #[must_use]
    pub const fn kind(&self) -> &ShipKind {
        &self.kind
    }

    /// Type tag.
    #[must_use]
    pub const fn class(&self) -> ShipClass {
        self.kind.class()
    }

    /// Name of the site this ship is locked onto.
    #[must_use]
    pub fn site_name(&self) -> Option<&str> {
        self.site.as_ref().map(|lock| lock.name.as_str())
    }

    /// Heading in degrees when flying a course.
    #[must_use]
    pub fn course_degrees(&self) -> Option<f64> {
        self.course.map(f64::to_degrees)
    }

    /// Whether health is above zero.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Derived status.
    #[must_use]
    pub fn status(&self) -> Status {
        if !self.is_alive() {
            return Status::Dead;
        }
        if !self.motion.arrived() {
            return Status::Moving;
        }
        match &self.site {
            Some(lock) if lock.location == self.motion.location => Status::Docked,
            _ => Status::Stopped,
        }
    }

    /// Shuttle being pursued, for falcons.
    #[must_use]
    pub fn pursuit_target(&self) -> Option<&str> {
        match &self.kind {
            ShipKind::Falcon { target } => target.as_deref(),
            _ => None,
        }
    }

    /// Transport jobs still queued, for shuttles.
    #[must_use]
    pub fn pending_jobs(&self) -> usize {
        match &self.kind {
            ShipKind::Shuttle { jobs } => jobs.len(),
            _ => 0,
        }
    }

    // ------------------------------------------------------------------
    // Orders
    // ------------------------------------------------------------------

    fn ensure_alive(&self) -> Result<()> {
        if self.is_alive() {
            Ok(())
        } else {
            Err(FleetError::Dead(self.name.clone()))
        }
    }

    /// Fly to a point, dropping any site or course lock.
    pub fn go(&mut self, point: Point) -> Result<()> {
        self.ensure_alive()?;
        if matches!(self.kind, ShipKind::Shuttle { .. }) {
            return Err(FleetError::unsupported(
                &self.name,
                format!("go to {}: shuttles only follow transport jobs", point / SCALE),
            ));
        }
        self.pursue(point);
        Ok(())
    }

    /// Fly to a point at a new speed. Falcons only.
    pub fn go_with_speed(&mut self, point: Point, speed: f64) -> Result<()> {
        self.ensure_alive()?;
        if !matches!(self.kind, ShipKind::Falcon { .. }) {
            return Err(FleetError::unsupported(
                &self.name,
                format!(
                    "go to {} at speed {speed:.2}: only falcons change speed",
                    point / SCALE
                ),
            ));
        }
        check_speed(speed)?;
        self.pursue(point);
        self.motion.speed = speed;
        Ok(())
    }

    /// Fly to a site and lock onto it.
    pub fn go_to(&mut self, site: &Site) -> Result<()> {
        self.ensure_alive()?;
        match self.kind {
            ShipKind::Shuttle { .. } => Err(FleetError::unsupported(
                &self.name,
                format!("go to {}: shuttles only follow transport jobs", site.name()),
            )),
            ShipKind::Falcon { .. } => Err(FleetError::unsupported(
                &self.name,
                format!("dock at {}: falcons never dock", site.name()),
            )),
            _ => {
                self.steer_to(site);
                Ok(())
            }
        }
    }

    /// Fly a bearing in degrees, clockwise from +y.
    pub fn set_course(&mut self, angle: f64) -> Result<()> {
        self.ensure_alive()?;
        if matches!(self.kind, ShipKind::Shuttle { .. }) {
            return Err(FleetError::unsupported(
                &self.name,
                format!("change course to {angle:.2}: shuttles only follow transport jobs"),
            ));
        }
        self.lock_course(angle);
        Ok(())
    }

    /// Fly a bearing at a new speed. Falcons only.
    pub fn set_course_with_speed(&mut self, angle: f64, speed: f64) -> Result<()> {
        self.ensure_alive()?;
        if !matches!(self.kind, ShipKind::Falcon { .. }) {
            return Err(FleetError::unsupported(
                &self.name,
                format!(
                    "change course to {angle:.2} at speed {speed:.2}: only falcons change speed"
                ),
            ));
        }
        check_speed(speed)?;
        self.motion.speed = speed;
        self.lock_course(angle);
        Ok(())
    }

    /// Halt in place and drop every lock and queued order.
    pub fn stop(&mut self) {
        self.motion.halt();
        self.site = None;
        self.course = None;
        match &mut self.kind {
            ShipKind::Shuttle { jobs } => jobs.clear(),
            ShipKind::Falcon { target } => *target = None,
            ShipKind::Bomber { .. } | ShipKind::Destroyer => {}
        }
    }

    /// Queue a delivery from `station` to `star`. Shuttles only.
    pub fn queue_transport(&mut self, station: &Site, star: &Site) -> Result<()> {
        self.ensure_alive()?;
        if !station.is_station() {
            return Err(FleetError::NotAStation(station.name().to_string()));
        }
        if !star.is_star() {
            return Err(FleetError::NotAStar(star.name().to_string()));
        }
        match &mut self.kind {
            ShipKind::Shuttle { jobs } => {
                jobs.push_back(TransportJob {
                    station: Some(station.name().to_string()),
                    star: star.name().to_string(),
                });
                Ok(())
            }
            _ => Err(FleetError::unsupported(
                &self.name,
                format!(
                    "transport crystals from {} to {}: not a shuttle",
                    station.name(),
                    star.name()
                ),
            )),
        }
    }

    /// Mark a shuttle for pursuit. Falcons only.
    pub fn attack(&mut self, target: &Spaceship) -> Result<()> {
        self.ensure_alive()?;
        let ShipKind::Falcon { target: pursuit } = &mut self.kind else {
            return Err(FleetError::unsupported(
                &self.name,
                format!("attack {}: not a falcon", target.name()),
            ));
        };
        if target.class() != ShipClass::Shuttle {
            return Err(FleetError::InvalidTarget {
                target: target.name().to_string(),
                expected: "shuttle",
                verb: "attacked",
            });
        }
        target.ensure_alive()?;
        *pursuit = Some(target.name().to_string());
        Ok(())
    }

    /// Launch a rocket toward `point`. Destroyers only.
    pub fn shoot(&self, point: Point, rocket_speed: f64) -> Result<Rocket> {
        self.ensure_alive()?;
        if self.class() != ShipClass::Destroyer {
            return Err(FleetError::unsupported(
                &self.name,
                format!("shoot a rocket to {}: not a destroyer", point / SCALE),
            ));
        }
        Ok(Rocket::new(self.location(), point, rocket_speed))
    }

    // ------------------------------------------------------------------
    // Health and cargo
    // ------------------------------------------------------------------

    /// Lose one health point, dying at zero.
    pub fn hurt(&mut self) {
        if self.health == 0 {
            return;
        }
        self.health -= 1;
        if self.health == 0 {
            self.die();
        }
    }

    /// Gain one health point, up to the cap.
    ///
    /// Works at zero health too: a ship killed in a raid can be revived by
    /// a direct heal. The tick loop never heals dead ships on its own.
    pub fn heal(&mut self) {
        if self.health < self.max_health {
            self.health += 1;
        }
    }

    /// Drop to zero health and stop.
    pub fn die(&mut self) {
        self.health = 0;
        self.stop();
    }

    /// Load one crystal. Returns false when the hold is full.
    pub fn add_cargo(&mut self) -> bool {
        if self.cargo >= self.max_cargo {
            return false;
        }
        self.cargo += 1;
        true
    }

    /// Unload one crystal. Returns false when the hold is empty.
    pub fn remove_cargo(&mut self) -> bool {
        if self.cargo == 0 {
            return false;
        }
        self.cargo -= 1;
        true
    }

    // ------------------------------------------------------------------
    // Tick helpers
    // ------------------------------------------------------------------

    /// Head for a site without order guards.
    pub(crate) fn steer_to(&mut self, site: &Site) {
        self.site = Some(SiteLock {
            name: site.name().to_string(),
            location: site.location(),
        });
        self.course = None;
        self.motion.go(site.location());
    }

    /// Head for a point without order guards.
    pub(crate) fn pursue(&mut self, point: Point) {
        self.site = None;
        self.course = None;
        self.motion.go(point);
    }

    fn lock_course(&mut self, angle: f64) {
        let radians = (angle % 360.0).to_radians();
        self.course = Some(radians);
        self.site = None;
        self.aim_along_course(radians);
    }

    fn aim_along_course(&mut self, radians: f64) {
        let ahead = Vec2::from_bearing(radians) * (self.motion.speed + 1.0);
        self.motion.go(self.motion.location + ahead);
    }

    /// Shared movement step: refresh the course target, then move.
    pub(crate) fn advance(&mut self) {
        if let Some(radians) = self.course {
            self.aim_along_course(radians);
        }
        self.motion.update();
    }

    pub(crate) fn kind_mut(&mut self) -> &mut ShipKind {
        &mut self.kind
    }

    pub(crate) fn current_job(&self) -> Option<&TransportJob> {
        match &self.kind {
            ShipKind::Shuttle { jobs } => jobs.front(),
            _ => None,
        }
    }

    pub(crate) fn mark_loaded(&mut self) {
        if let ShipKind::Shuttle { jobs } = &mut self.kind {
            if let Some(job) = jobs.front_mut() {
                job.station = None;
            }
        }
    }

    pub(crate) fn finish_job(&mut self) {
        if let ShipKind::Shuttle { jobs } = &mut self.kind {
            jobs.pop_front();
        }
    }

    // ------------------------------------------------------------------
    // Description
    // ------------------------------------------------------------------

    /// One-line human description.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut text = format!(
            "{} {} at position {}.",
            self.class().label(),
            self.name,
            self.location() / SCALE
        );

        if self.motion.arrived() {
            text.push_str(" not moving.");
        } else {
            text.push_str(&format!(
                " moving to {} flying {:.2} km/h.",
                self.destination() / SCALE,
                self.speed()
            ));
        }

        match (self.status(), &self.site, self.course) {
            (Status::Dead, _, _) => text.push_str(" is dead."),
            (Status::Moving, Some(lock), _) => {
                text.push_str(&format!(" moving towards {}.", lock.name));
            }
            (Status::Moving, None, Some(radians)) => {
                text.push_str(&format!(" moving on course {:.2}.", radians.to_degrees()));
            }
            (Status::Docked, Some(lock), _) => {
                text.push_str(&format!(" docked at {}.", lock.name));
            }
            _ => {}
        }

        if let Some(agent) = &self.agent {
            text.push_str(&format!(" is driven by {agent}."));
        }

        if matches!(self.class(), ShipClass::Shuttle | ShipClass::Falcon) {
            text.push_str(&format!(
                " holding {} crystals with {} health.",
                self.cargo, self.health
            ));
        }

        text
    }
}
