//! Straight-line movement shared by spaceships and rockets.

use serde::{Deserialize, Serialize};

use crate::error::{FleetError, Result};
use crate::math::{Point, EPSILON};

/// Position, destination and per-tick speed of a mover.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    /// Current location.
    pub location: Point,
    /// Where the mover is heading.
    pub destination: Point,
    /// Maximum distance covered in one tick.
    pub speed: f64,
}

impl Motion {
    /// A stationary mover at `location`.
    #[must_use]
    pub const fn new(location: Point, speed: f64) -> Self {
        Self {
            location,
            destination: location,
            speed,
        }
    }

    /// Set a new destination. Movement happens on [`update`](Self::update).
    pub fn go(&mut self, destination: Point) {
        self.destination = destination;
    }

    /// Make the current location the destination.
    pub fn halt(&mut self) {
        self.destination = self.location;
    }

    /// Whether the mover sits on its destination.
    #[must_use]
    pub fn arrived(&self) -> bool {
        self.location == self.destination
    }

    /// Advance one tick toward the destination.
    ///
    /// Never overshoots. Once the remaining distance drops below
    /// [`EPSILON`] the location snaps onto the destination so exact
    /// equality checks succeed.
    pub fn update(&mut self) {
        if self.arrived() {
            return;
        }

        let delta = self.destination - self.location;
        let step = self.speed.min(delta.norm());
        self.location = self.location + delta.normalize() * step;

        if self.destination.distance(self.location) < EPSILON {
            self.location = self.destination;
        }
    }
}

/// Speeds must be finite and non-negative.
pub(crate) fn check_speed(speed: f64) -> Result<()> {
    if speed.is_finite() && speed >= 0.0 {
        Ok(())
    } else {
        Err(FleetError::InvalidSpeed(speed))
    }
}
