//! Headless session runner implementation.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use fleet_core::config::FleetConfig;
use fleet_core::simulation::Simulation;

use crate::interpreter::{Interpreter, Outcome};
use crate::layout::{install_home_star, load_config, load_layout, LoadError};

/// Headless runner configuration.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Site layout file to load on startup.
    pub sites_path: Option<PathBuf>,
    /// RON tuning file.
    pub config_path: Option<PathBuf>,
    /// Create the home fortress star before loading sites.
    pub home_star: bool,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            sites_path: None,
            config_path: None,
            home_star: true,
        }
    }
}

/// Console session: reads commands, prints reports.
#[derive(Debug)]
pub struct HeadlessRunner {
    interpreter: Interpreter,
}

impl HeadlessRunner {
    /// Create a runner around an already prepared simulation.
    #[must_use]
    pub fn new(sim: Simulation) -> Self {
        Self {
            interpreter: Interpreter::new(sim),
        }
    }

    /// Build the starting world from configuration.
    ///
    /// # Errors
    ///
    /// Fails if the tuning or layout file cannot be loaded.
    pub fn with_config(config: &HeadlessConfig) -> Result<Self, LoadError> {
        let fleet_config = match &config.config_path {
            Some(path) => load_config(path)?,
            None => FleetConfig::default(),
        };
        let mut sim = Simulation::with_config(fleet_config);

        if config.home_star {
            install_home_star(&mut sim).map_err(LoadError::Setup)?;
        }
        if let Some(path) = &config.sites_path {
            load_layout(path, &mut sim)?;
        }

        Ok(Self::new(sim))
    }

    /// The interpreter driving the session.
    #[must_use]
    pub const fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Run until `exit` or end of input.
    ///
    /// Reports go to `out`, refused commands to `err`. A refused command
    /// never ends the session.
    ///
    /// # Errors
    ///
    /// Fails only when reading input or writing the prompt fails.
    pub fn run_with<R, W, E>(&mut self, input: R, out: &mut W, err: &mut E) -> io::Result<()>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        let mut lines = input.lines();
        loop {
            write!(out, "{}", self.interpreter.prompt())?;
            out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(out)?;
                break;
            };
            let line = line?;
            tracing::debug!(time = self.interpreter.time(), command = %line.trim(), "Command received");

            match self.interpreter.execute(&line, out) {
                Ok(Outcome::Continue) => {}
                Ok(Outcome::Exit) => break,
                Err(error) => {
                    tracing::debug!(%error, "Command refused");
                    writeln!(err, "{error}")?;
                }
            }
        }
        tracing::info!(time = self.interpreter.time(), "Session ended");
        Ok(())
    }

    /// Run on the process's standard streams.
    ///
    /// # Errors
    ///
    /// Fails only when the standard streams fail.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let stderr = io::stderr();
        self.run_with(stdin.lock(), &mut stdout.lock(), &mut stderr.lock())
    }
}
