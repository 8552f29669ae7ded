//! Rockets fired by destroyers.

use serde::{Deserialize, Serialize};

use crate::math::{Point, SCALE};
use crate::motion::Motion;

/// A rocket in flight. Detonates on the tick it reaches its target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rocket {
    motion: Motion,
}

impl Rocket {
    /// Launch from `start` toward `target`.
    #[must_use]
    pub fn new(start: Point, target: Point, speed: f64) -> Self {
        let mut motion = Motion::new(start, speed);
        motion.go(target);
        Self { motion }
    }

    /// Current location.
    #[must_use]
    pub const fn location(&self) -> Point {
        self.motion.location
    }

    /// Impact point.
    #[must_use]
    pub const fn destination(&self) -> Point {
        self.motion.destination
    }

    /// Flight speed.
    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.motion.speed
    }

    /// Whether the rocket sits on its impact point.
    #[must_use]
    pub fn has_landed(&self) -> bool {
        self.motion.arrived()
    }

    /// Fly one tick.
    pub fn update(&mut self) {
        self.motion.update();
    }

    /// One-line human description.
    #[must_use]
    pub fn describe(&self) -> String {
        format!(
            "Rocket at position {}. moving to {} flying {:.2} km/h.",
            self.location() / SCALE,
            self.destination() / SCALE,
            self.speed()
        )
    }
}
