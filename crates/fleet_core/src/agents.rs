//! Crew members and their ranks.

use serde::{Deserialize, Serialize};

/// Crew rank. Each spaceship kind accepts exactly one rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    /// Flies shuttles.
    Shipman,
    /// Flies bombers.
    Commander,
    /// Flies destroyers.
    Admiral,
}

impl Rank {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Rank::Shipman => "Midshipman",
            Rank::Commander => "Commander",
            Rank::Admiral => "Admiral",
        }
    }
}

/// A named crew member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    name: String,
    rank: Rank,
}

impl Agent {
    /// Create an agent.
    #[must_use]
    pub fn new(name: impl Into<String>, rank: Rank) -> Self {
        Self {
            name: name.into(),
            rank,
        }
    }

    /// Agent name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Agent rank.
    #[must_use]
    pub const fn rank(&self) -> Rank {
        self.rank
    }
}

impl std::fmt::Display for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.rank.label(), self.name)
    }
}
