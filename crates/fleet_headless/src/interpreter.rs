//! Console command interpreter.
//!
//! Turns one line of user input into a call on the [`Simulation`] or the
//! [`View`]. Input is sanitized first: the first `(` and the first `)` are
//! dropped and commas become spaces, so `pan (3, 4)` and `pan 3 4` mean the
//! same thing.
//!
//! Coordinates are typed in display units and scaled into simulation units
//! here. Angles and speeds are passed through unchanged.

use std::io::Write;

use fleet_core::agents::Rank;
use fleet_core::error::FleetError;
use fleet_core::math::{Point, Vec2, SCALE};
use fleet_core::simulation::Simulation;
use fleet_core::spaceship::Status;
use thiserror::Error;

use crate::view::{View, ViewError};

/// Words accepted in second position after a spaceship name.
const SHIP_COMMANDS: [&str; 8] = [
    "course",
    "position",
    "destination",
    "stop",
    "attack",
    "shoot",
    "start_supply",
    "status",
];

/// Errors reported back to the console user.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Wrong argument count.
    #[error("Usage: {0}")]
    Usage(&'static str),

    /// A coordinate failed to parse.
    #[error("Coordinates must be two numbers.")]
    BadCoordinate,

    /// A numeric argument failed to parse.
    #[error("{0} must be a number.")]
    NotANumber(&'static str),

    /// `create` with an unknown entity type.
    #[error("Could not find the command {0}")]
    UnknownCreate(String),

    /// Nothing matched the input.
    #[error("Failed to parse the input. Please check it and try again.")]
    Unrecognized,

    /// The simulation refused the command.
    #[error(transparent)]
    Fleet(#[from] FleetError),

    /// The view refused the setting.
    #[error(transparent)]
    View(#[from] ViewError),

    /// Snapshot encoding failed.
    #[error("Failed to encode snapshot: {0}")]
    Dump(#[from] serde_json::Error),

    /// Writing output failed.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// What the session should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Read the next command.
    Continue,
    /// End the session.
    Exit,
}

/// Drop the first `(` and first `)`, then turn commas into spaces.
#[must_use]
pub fn sanitize(line: &str) -> String {
    let mut text = line.to_string();
    if let Some(index) = text.find('(') {
        text.remove(index);
    }
    if let Some(index) = text.find(')') {
        text.remove(index);
    }
    text.replace(',', " ")
}

/// Parse one coordinate in display units, returning simulation units.
///
/// # Errors
///
/// Fails for anything that is not a finite number.
pub fn parse_coordinate(text: &str) -> Result<f64, CommandError> {
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value * SCALE)
        .ok_or(CommandError::BadCoordinate)
}

fn parse_point(x: &str, y: &str) -> Result<Point, CommandError> {
    Ok(Vec2::new(parse_coordinate(x)?, parse_coordinate(y)?))
}

fn parse_number(text: &str, what: &'static str) -> Result<f64, CommandError> {
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(CommandError::NotANumber(what))
}

fn expect_len(args: &[&str], len: usize, usage: &'static str) -> Result<(), CommandError> {
    if args.len() == len {
        Ok(())
    } else {
        Err(CommandError::Usage(usage))
    }
}

/// Console session state: the simulation plus the viewport.
#[derive(Debug, Clone)]
pub struct Interpreter {
    sim: Simulation,
    view: View,
}

impl Interpreter {
    /// Wrap a prepared simulation with a default view.
    #[must_use]
    pub fn new(sim: Simulation) -> Self {
        Self {
            sim,
            view: View::new(),
        }
    }

    /// The simulation being driven.
    #[must_use]
    pub const fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Current viewport.
    #[must_use]
    pub const fn view(&self) -> &View {
        &self.view
    }

    /// Ticks run so far.
    #[must_use]
    pub const fn time(&self) -> u64 {
        self.sim.get_tick()
    }

    /// Prompt shown before each command.
    #[must_use]
    pub fn prompt(&self) -> String {
        format!("Time {}: ", self.time())
    }

    /// Run one input line, writing any report to `out`.
    ///
    /// # Errors
    ///
    /// Returns the reason the command was refused. Nothing has changed in
    /// that case.
    pub fn execute(&mut self, line: &str, out: &mut dyn Write) -> Result<Outcome, CommandError> {
        let line = sanitize(line);
        let args: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = args.first() else {
            return Ok(Outcome::Continue);
        };

        match command {
            "exit" => return Ok(Outcome::Exit),
            "status" => {
                expect_len(&args, 1, "status")?;
                self.write_status(out)?;
            }
            "go" => {
                expect_len(&args, 1, "go")?;
                let events = self.sim.tick();
                for dock in &events.docks {
                    writeln!(out, "{} docked at {}", dock.ship, dock.site)?;
                }
            }
            "create" => self.create(&args)?,
            "default" => {
                expect_len(&args, 1, "default")?;
                self.view.reset();
            }
            "size" => {
                expect_len(&args, 2, "size <size>")?;
                let size = args[1]
                    .parse::<usize>()
                    .map_err(|_| CommandError::NotANumber("Size"))?;
                self.view.set_size(size)?;
            }
            "zoom" => {
                expect_len(&args, 2, "zoom <scale>")?;
                self.view.set_zoom(parse_number(args[1], "Zoom")?)?;
            }
            "pan" => {
                expect_len(&args, 3, "pan (<x>, <y>)")?;
                self.view.set_origin(parse_point(args[1], args[2])?);
            }
            "show" => {
                expect_len(&args, 1, "show")?;
                write!(out, "{}", self.view.render(&self.sim.snapshot()))?;
            }
            "dump" => {
                expect_len(&args, 1, "dump")?;
                let json = serde_json::to_string_pretty(&self.sim.snapshot())?;
                writeln!(out, "{json}")?;
            }
            _ => self.ship_command(&args, out)?,
        }
        Ok(Outcome::Continue)
    }

    fn write_status(&self, out: &mut dyn Write) -> Result<(), CommandError> {
        for ship in self.sim.spaceships() {
            writeln!(out, "{}", ship.describe())?;
        }
        for site in self.sim.sites() {
            writeln!(out, "{}", site.describe())?;
        }
        for agent in self.sim.free_agents() {
            writeln!(out, "{agent}")?;
        }
        for rocket in self.sim.rockets() {
            writeln!(out, "{}", rocket.describe())?;
        }
        Ok(())
    }

    fn create(&mut self, args: &[&str]) -> Result<(), CommandError> {
        let Some(&kind) = args.get(1) else {
            return Err(CommandError::Usage("create <type> <args...>"));
        };
        match kind {
            "shuttle" => {
                expect_len(args, 6, "create shuttle <name> <agent_name> (<x>, <y>)")?;
                let at = parse_point(args[4], args[5])?;
                self.sim.create_shuttle(args[2], args[3], at)?;
            }
            "bomber" => {
                expect_len(args, 5, "create bomber <name> <agent_name> <site_name>")?;
                self.sim.create_bomber(args[2], args[3], args[4])?;
            }
            "destroyer" => {
                expect_len(args, 6, "create destroyer <name> <agent_name> (<x>, <y>)")?;
                let at = parse_point(args[4], args[5])?;
                self.sim.create_destroyer(args[2], args[3], at)?;
            }
            "falcon" => {
                expect_len(args, 5, "create falcon <name> (<x>, <y>)")?;
                let at = parse_point(args[3], args[4])?;
                self.sim.create_falcon(args[2], at)?;
            }
            "midshipman" => {
                expect_len(args, 3, "create midshipman <name>")?;
                self.sim.create_agent(args[2], Rank::Shipman)?;
            }
            "commander" => {
                expect_len(args, 3, "create commander <name>")?;
                self.sim.create_agent(args[2], Rank::Commander)?;
            }
            "admiral" => {
                expect_len(args, 3, "create admiral <name>")?;
                self.sim.create_agent(args[2], Rank::Admiral)?;
            }
            other => return Err(CommandError::UnknownCreate(other.to_string())),
        }
        Ok(())
    }

    fn ship_command(&mut self, args: &[&str], out: &mut dyn Write) -> Result<(), CommandError> {
        let (Some(&name), Some(&action)) = (args.first(), args.get(1)) else {
            return Err(CommandError::Unrecognized);
        };
        if !SHIP_COMMANDS.contains(&action) {
            return Err(CommandError::Unrecognized);
        }
        if self.sim.status(name)? == Status::Dead {
            return Err(FleetError::Dead(name.to_string()).into());
        }

        match action {
            "course" => match args.len() {
                3 => self
                    .sim
                    .set_course(name, parse_number(args[2], "Angle")?, None)?,
                4 => self.sim.set_course(
                    name,
                    parse_number(args[2], "Angle")?,
                    Some(parse_number(args[3], "Speed")?),
                )?,
                _ => {
                    return Err(CommandError::Usage(
                        "<spaceship_name> course <angle> [speed]",
                    ))
                }
            },
            "position" => match args.len() {
                4 => self
                    .sim
                    .set_position(name, parse_point(args[2], args[3])?, None)?,
                5 => self.sim.set_position(
                    name,
                    parse_point(args[2], args[3])?,
                    Some(parse_number(args[4], "Speed")?),
                )?,
                _ => {
                    return Err(CommandError::Usage(
                        "<spaceship_name> position (<x>, <y>) [speed]",
                    ))
                }
            },
            "destination" => {
                expect_len(args, 3, "<spaceship_name> destination <site_name>")?;
                self.sim.set_destination(name, args[2])?;
            }
            "stop" => {
                expect_len(args, 2, "<spaceship_name> stop")?;
                self.sim.stop(name)?;
            }
            "attack" => {
                expect_len(args, 3, "<falcon_name> attack <shuttle_name>")?;
                self.sim.attack(name, args[2])?;
            }
            "shoot" => {
                expect_len(args, 4, "<destroyer_name> shoot (<x>, <y>)")?;
                self.sim.shoot(name, parse_point(args[2], args[3])?)?;
            }
            "start_supply" => {
                expect_len(
                    args,
                    4,
                    "<shuttle_name> start_supply <space_station_name> <fortress_star_name>",
                )?;
                self.sim.start_transport(name, args[2], args[3])?;
            }
            "status" => {
                expect_len(args, 2, "<spaceship_name> status")?;
                writeln!(out, "{}", self.sim.describe(name)?)?;
            }
            _ => return Err(CommandError::Unrecognized),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(interp: &mut Interpreter, line: &str) -> Result<String, CommandError> {
        let mut out = Vec::new();
        interp.execute(line, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_sanitize_strips_one_pair() {
        assert_eq!(sanitize("pan (3, 4)"), "pan 3  4");
        assert_eq!(sanitize("a ((1)) b"), "a (1) b");
        assert_eq!(sanitize("go"), "go");
    }

    #[test]
    fn test_parse_coordinate_scales() {
        assert_eq!(parse_coordinate("1.5").unwrap(), 1500.0);
        assert!(matches!(
            parse_coordinate("east"),
            Err(CommandError::BadCoordinate)
        ));
        assert!(parse_coordinate("inf").is_err());
    }

    #[test]
    fn test_blank_line_is_ignored() {
        let mut interp = Interpreter::new(Simulation::new());
        assert_eq!(run(&mut interp, "   ").unwrap(), "");
        assert_eq!(interp.time(), 0);
    }

    #[test]
    fn test_exit() {
        let mut interp = Interpreter::new(Simulation::new());
        let mut out = Vec::new();
        assert_eq!(interp.execute("exit", &mut out).unwrap(), Outcome::Exit);
    }

    #[test]
    fn test_go_advances_time() {
        let mut interp = Interpreter::new(Simulation::new());
        run(&mut interp, "go").unwrap();
        assert_eq!(interp.prompt(), "Time 1: ");
        assert!(matches!(
            run(&mut interp, "go now"),
            Err(CommandError::Usage("go"))
        ));
    }

    #[test]
    fn test_create_usage_and_unknown() {
        let mut interp = Interpreter::new(Simulation::new());
        assert_eq!(
            run(&mut interp, "create falcon Raptor 1").unwrap_err().to_string(),
            "Usage: create falcon <name> (<x>, <y>)"
        );
        assert_eq!(
            run(&mut interp, "create cruiser X").unwrap_err().to_string(),
            "Could not find the command cruiser"
        );
        run(&mut interp, "create falcon Raptor (1, 2)").unwrap();
        assert_eq!(
            interp.simulation().spaceship("Raptor").unwrap().location(),
            Vec2::new(1000.0, 2000.0)
        );
    }

    #[test]
    fn test_unknown_input() {
        let mut interp = Interpreter::new(Simulation::new());
        assert!(matches!(
            run(&mut interp, "fly away"),
            Err(CommandError::Unrecognized)
        ));
        assert!(matches!(
            run(&mut interp, "hello"),
            Err(CommandError::Unrecognized)
        ));
    }

    #[test]
    fn test_ship_command_on_missing_ship() {
        let mut interp = Interpreter::new(Simulation::new());
        assert_eq!(
            run(&mut interp, "Ghost stop").unwrap_err().to_string(),
            "Did not find a spaceship named Ghost."
        );
    }

    #[test]
    fn test_negative_speed_is_reported() {
        let mut interp = Interpreter::new(Simulation::new());
        run(&mut interp, "create falcon Raptor (0, 0)").unwrap();
        assert_eq!(
            run(&mut interp, "Raptor position (1, 0) -50")
                .unwrap_err()
                .to_string(),
            "Speed must be a non negative number, got -50."
        );
        assert!(run(&mut interp, "Raptor course 90 -1").is_err());
    }

    #[test]
    fn test_view_commands() {
        let mut interp = Interpreter::new(Simulation::new());
        run(&mut interp, "size 10").unwrap();
        run(&mut interp, "zoom 4").unwrap();
        run(&mut interp, "pan (-5, 5)").unwrap();
        assert_eq!(interp.view().size(), 10);
        assert_eq!(interp.view().origin(), Vec2::new(-5000.0, 5000.0));

        assert!(run(&mut interp, "size 40").is_err());
        assert!(matches!(
            run(&mut interp, "size big"),
            Err(CommandError::NotANumber("Size"))
        ));

        run(&mut interp, "default").unwrap();
        assert_eq!(interp.view(), &View::default());

        let shown = run(&mut interp, "show").unwrap();
        assert!(shown.starts_with("Display size: 25, scale: 2.00"));
    }
}
