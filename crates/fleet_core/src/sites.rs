//! Stationary crystal holders.
//!
//! Space stations mine crystals every tick; fortress stars only store what
//! shuttles deliver. Counts are unsigned and removal clamps, so a site can
//! never be overdrawn.

use serde::{Deserialize, Serialize};

use crate::math::{Point, SCALE};

/// Site variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiteKind {
    /// Produces crystals every tick.
    SpaceStation {
        /// Crystals added per tick.
        production_rate: u64,
    },
    /// Passive depot.
    FortressStar,
}

impl SiteKind {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            SiteKind::SpaceStation { .. } => "Space Station",
            SiteKind::FortressStar => "Fortress Star",
        }
    }
}

/// A named site in the plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    name: String,
    location: Point,
    crystals: u64,
    kind: SiteKind,
}

impl Site {
    /// A space station producing `production_rate` crystals per tick.
    #[must_use]
    pub fn space_station(
        name: impl Into<String>,
        location: Point,
        crystals: u64,
        production_rate: u64,
    ) -> Self {
        Self {
            name: name.into(),
            location,
            crystals,
            kind: SiteKind::SpaceStation { production_rate },
        }
    }

    /// A fortress star holding `crystals`.
    #[must_use]
    pub fn fortress_star(name: impl Into<String>, location: Point, crystals: u64) -> Self {
        Self {
            name: name.into(),
            location,
            crystals,
            kind: SiteKind::FortressStar,
        }
    }

    /// Site name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Site location.
    #[must_use]
    pub const fn location(&self) -> Point {
        self.location
    }

    /// Crystals currently stored.
    #[must_use]
    pub const fn crystals(&self) -> u64 {
        self.crystals
    }

    /// Site variant.
    #[must_use]
    pub const fn kind(&self) -> SiteKind {
        self.kind
    }

    /// Whether this site is a space station.
    #[must_use]
    pub const fn is_station(&self) -> bool {
        matches!(self.kind, SiteKind::SpaceStation { .. })
    }

    /// Whether this site is a fortress star.
    #[must_use]
    pub const fn is_star(&self) -> bool {
        matches!(self.kind, SiteKind::FortressStar)
    }

    /// Store more crystals.
    pub fn add_crystals(&mut self, count: u64) {
        self.crystals = self.crystals.saturating_add(count);
    }

    /// Take up to `count` crystals.
    ///
    /// Returns the amount actually removed.
    pub fn remove_crystals(&mut self, count: u64) -> u64 {
        let removed = count.min(self.crystals);
        self.crystals -= removed;
        removed
    }

    /// Per-tick production.
    pub fn update(&mut self) {
        match self.kind {
            SiteKind::SpaceStation { production_rate } => self.add_crystals(production_rate),
            SiteKind::FortressStar => {}
        }
    }

    /// One-line human description.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut text = format!(
            "{} {} at position {}. containing {} crystals.",
            self.kind.label(),
            self.name,
            self.location / SCALE,
            self.crystals
        );
        if let SiteKind::SpaceStation { production_rate } = self.kind {
            text.push_str(&format!(" producing {production_rate} crystals."));
        }
        text
    }
}
