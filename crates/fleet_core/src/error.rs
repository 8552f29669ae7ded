//! Error types for the fleet simulation.

use thiserror::Error;

/// Result type alias using [`FleetError`].
pub type Result<T> = std::result::Result<T, FleetError>;

/// Registry category a name belongs to.
///
/// Names only need to be unique inside their own category, so errors
/// carry the category to make the message unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Spaceships of any kind.
    Spaceship,
    /// Space stations and fortress stars.
    Site,
    /// Crew members.
    Agent,
}

impl Category {
    const fn article(self) -> &'static str {
        match self {
            Category::Agent => "an",
            Category::Spaceship | Category::Site => "a",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Category::Spaceship => "spaceship",
            Category::Site => "site",
            Category::Agent => "agent",
        };
        f.write_str(label)
    }
}

/// Top-level error type for all simulation errors.
///
/// Every variant is raised before any state is touched, so a failed
/// operation leaves the simulation exactly as it was.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FleetError {
    /// A name is already taken within its category.
    #[error("{name} already exists.")]
    DuplicateName {
        /// Category the name collided in.
        category: Category,
        /// The duplicate name.
        name: String,
    },

    /// A name lookup failed.
    #[error("Did not find {} {category} named {name}.", .category.article())]
    NotFound {
        /// Category that was searched.
        category: Category,
        /// The missing name.
        name: String,
    },

    /// The agent's rank does not fit the spaceship type.
    #[error("{ship} is a {kind} and can only have a {required} as an agent")]
    WrongRank {
        /// Spaceship being constructed.
        ship: String,
        /// Spaceship kind label.
        kind: &'static str,
        /// Rank the kind requires.
        required: &'static str,
    },

    /// The agent is already crewing another spaceship.
    #[error("The agent {0} is already assigned")]
    AgentAlreadyAssigned(String),

    /// The spaceship is dead and cannot take orders or fight.
    #[error("{0} is dead and cannot operate.")]
    Dead(String),

    /// The spaceship kind does not support the requested action.
    #[error("{ship} cannot {action}")]
    Unsupported {
        /// Spaceship that was ordered.
        ship: String,
        /// Human readable description of the refused action.
        action: String,
    },

    /// The target of an operation has the wrong kind.
    #[error("{target} is not a {expected} and cannot be {verb}.")]
    InvalidTarget {
        /// Target name.
        target: String,
        /// Kind the operation expects.
        expected: &'static str,
        /// What would have happened to the target.
        verb: &'static str,
    },

    /// A transport job was given a site that is not a space station.
    #[error("{0} is not a space station.")]
    NotAStation(String),

    /// A transport job was given a site that is not a fortress star.
    #[error("{0} is not a star.")]
    NotAStar(String),

    /// A speed is negative or not a number.
    #[error("Speed must be a non negative number, got {0}.")]
    InvalidSpeed(f64),

    /// Configuration could not be parsed.
    #[error("Failed to parse fleet config: {0}")]
    ConfigParse(String),
}

impl FleetError {
    pub(crate) fn unsupported(ship: &str, action: impl Into<String>) -> Self {
        Self::Unsupported {
            ship: ship.to_string(),
            action: action.into(),
        }
    }

    pub(crate) fn not_found(category: Category, name: &str) -> Self {
        Self::NotFound {
            category,
            name: name.to_string(),
        }
    }

    pub(crate) fn duplicate(category: Category, name: &str) -> Self {
        Self::DuplicateName {
            category,
            name: name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_subject() {
        let err = FleetError::not_found(Category::Site, "Vega");
        assert_eq!(err.to_string(), "Did not find a site named Vega.");
        let err = FleetError::not_found(Category::Agent, "Kirk");
        assert_eq!(err.to_string(), "Did not find an agent named Kirk.");

        let err = FleetError::unsupported("Apollo", "shoot a rocket");
        assert_eq!(err.to_string(), "Apollo cannot shoot a rocket");
    }
}
