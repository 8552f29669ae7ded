//! Site layout and tuning loaders.
//!
//! A layout file lists one site per line:
//!
//! ```text
//! station Mir (10, 20) 100 5
//! fortress Vega (-3, 7) 0
//! ```
//!
//! Lines go through the same sanitizing as console input, so the
//! parentheses and commas are optional. Blank lines are skipped. Sites are
//! created in file order, and loading stops at the first bad line.

use std::path::Path;

use fleet_core::config::FleetConfig;
use fleet_core::error::FleetError;
use fleet_core::math::Vec2;
use fleet_core::simulation::Simulation;
use thiserror::Error;

use crate::interpreter::{parse_coordinate, sanitize};

/// Name of the fortress star every session starts with.
pub const HOME_STAR_NAME: &str = "DS";
/// Home star position in display units.
pub const HOME_STAR_POSITION: (f64, f64) = (40.0, 10.0);
/// Crystals stored in the home star at startup.
pub const HOME_STAR_CRYSTALS: u64 = 100_000;

/// Error type for loading layouts and tuning.
#[derive(Error, Debug)]
pub enum LoadError {
    /// File could not be read.
    #[error("Could not open file: {path}.")]
    Open {
        /// Path as given.
        path: String,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Line matches neither site form.
    #[error("Failed to parse line {0}.")]
    BadLine(usize),
    /// Coordinates are not numbers.
    #[error("Line {0}: coordinates must be two numbers.")]
    BadCoordinate(usize),
    /// Crystal count is not a non-negative integer.
    #[error("Line {0}: number of crystals has to be a non negative integer.")]
    BadCrystals(usize),
    /// Production rate is not a non-negative integer.
    #[error("Line {0}: crystal production rate has to be a non negative integer.")]
    BadRate(usize),
    /// The simulation refused the site.
    #[error("Line {line}: {source}")]
    Fleet {
        /// 1-based line number.
        line: usize,
        /// Registry error.
        #[source]
        source: FleetError,
    },
    /// Tuning file could not be parsed.
    #[error(transparent)]
    Config(FleetError),
    /// The starting world could not be set up.
    #[error(transparent)]
    Setup(FleetError),
}

/// Create the home fortress star.
///
/// # Errors
///
/// Fails if a site named [`HOME_STAR_NAME`] already exists.
pub fn install_home_star(sim: &mut Simulation) -> Result<(), FleetError> {
    let (x, y) = HOME_STAR_POSITION;
    sim.create_fortress_star(HOME_STAR_NAME, Vec2::scaled(x, y), HOME_STAR_CRYSTALS)
}

/// Create the sites described by `text`.
///
/// Returns how many sites were created.
///
/// # Errors
///
/// Reports the first bad line by its 1-based number. Sites from earlier
/// lines stay in the simulation.
pub fn load_layout_str(text: &str, sim: &mut Simulation) -> Result<usize, LoadError> {
    let mut created = 0;
    for (index, raw) in text.lines().enumerate() {
        let number = index + 1;
        let line = sanitize(raw);
        let args: Vec<&str> = line.split_whitespace().collect();
        if args.is_empty() {
            continue;
        }
        if !(5..=6).contains(&args.len()) {
            return Err(LoadError::BadLine(number));
        }

        let name = args[1];
        let location = Vec2::new(
            parse_coordinate(args[2]).map_err(|_| LoadError::BadCoordinate(number))?,
            parse_coordinate(args[3]).map_err(|_| LoadError::BadCoordinate(number))?,
        );
        let crystals = args[4]
            .parse::<u64>()
            .map_err(|_| LoadError::BadCrystals(number))?;

        let result = match (args[0], args.len()) {
            ("fortress", 5) => sim.create_fortress_star(name, location, crystals),
            ("station", 6) => {
                let rate = args[5]
                    .parse::<u64>()
                    .map_err(|_| LoadError::BadRate(number))?;
                sim.create_space_station(name, location, crystals, rate)
            }
            _ => return Err(LoadError::BadLine(number)),
        };
        result.map_err(|source| LoadError::Fleet {
            line: number,
            source,
        })?;
        created += 1;
    }
    Ok(created)
}

/// Read a layout file and create its sites.
///
/// # Errors
///
/// Fails if the file cannot be read or any line is bad.
pub fn load_layout<P: AsRef<Path>>(path: P, sim: &mut Simulation) -> Result<usize, LoadError> {
    let path = path.as_ref();
    let text = read(path)?;
    let created = load_layout_str(&text, sim)?;
    tracing::info!(path = %path.display(), sites = created, "Loaded site layout");
    Ok(created)
}

/// Read fleet tuning from a RON file.
///
/// # Errors
///
/// Fails if the file cannot be read or parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<FleetConfig, LoadError> {
    let path = path.as_ref();
    let text = read(path)?;
    let config = FleetConfig::from_ron_str(&text).map_err(LoadError::Config)?;
    tracing::info!(path = %path.display(), "Loaded fleet config");
    Ok(config)
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Open {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::sites::SiteKind;

    #[test]
    fn test_loads_both_site_kinds() {
        let mut sim = Simulation::new();
        let text = "station Mir (10, 20) 100 5\n\n  fortress Vega -3 7 0\n";
        assert_eq!(load_layout_str(text, &mut sim).unwrap(), 2);

        let mir = sim.site("Mir").unwrap();
        assert_eq!(mir.location(), Vec2::new(10_000.0, 20_000.0));
        assert_eq!(mir.crystals(), 100);
        assert_eq!(
            mir.kind(),
            SiteKind::SpaceStation {
                production_rate: 5
            }
        );
        assert!(sim.site("Vega").unwrap().is_star());
    }

    #[test]
    fn test_reports_line_numbers() {
        let mut sim = Simulation::new();
        let err = load_layout_str("fortress A 0 0 0\nplanet B 1 1 1\n", &mut sim).unwrap_err();
        assert_eq!(err.to_string(), "Failed to parse line 2.");
        assert!(sim.site("A").is_ok());

        let err = load_layout_str("\n\nstation C 0 0 -4 1", &mut sim).unwrap_err();
        assert!(matches!(err, LoadError::BadCrystals(3)));

        let err = load_layout_str("station D 0 0 4 fast", &mut sim).unwrap_err();
        assert!(matches!(err, LoadError::BadRate(1)));

        let err = load_layout_str("fortress E north 0 4", &mut sim).unwrap_err();
        assert!(matches!(err, LoadError::BadCoordinate(1)));

        // Station form with a fortress keyword.
        let err = load_layout_str("fortress F 0 0 4 1", &mut sim).unwrap_err();
        assert!(matches!(err, LoadError::BadLine(1)));
    }

    #[test]
    fn test_duplicate_site_names_fail() {
        let mut sim = Simulation::new();
        install_home_star(&mut sim).unwrap();
        let err = load_layout_str("fortress DS 1 1 0", &mut sim).unwrap_err();
        assert_eq!(err.to_string(), "Line 1: DS already exists.");
    }

    #[test]
    fn test_home_star() {
        let mut sim = Simulation::new();
        install_home_star(&mut sim).unwrap();
        let home = sim.site(HOME_STAR_NAME).unwrap();
        assert_eq!(home.location(), Vec2::new(40_000.0, 10_000.0));
        assert_eq!(home.crystals(), 100_000);
    }
}
