//! Headless fleet console.
//!
//! # Usage
//!
//! ```bash
//! # Interactive session, home star only
//! cargo run -p fleet_headless
//!
//! # Load a site layout and custom tuning
//! cargo run -p fleet_headless -- sites.txt --config fleet.ron
//!
//! # Replay a command script
//! cargo run -p fleet_headless -- sites.txt --script orders.txt
//! ```
//!
//! Reports go to stdout, refused commands and logs to stderr.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fleet_headless::runner::{HeadlessConfig, HeadlessRunner};

#[derive(Parser)]
#[command(name = "fleet_headless")]
#[command(about = "Console for the crystal fleet simulation")]
#[command(version)]
struct Cli {
    /// Site layout file loaded before the first prompt
    sites: Option<PathBuf>,

    /// Read commands from a file instead of stdin
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// RON file with fleet tuning
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start without the home fortress star
    #[arg(long)]
    no_home_star: bool,

    /// Enable verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs share stderr with refused commands; stdout is for reports
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(filter)
        .init();

    let config = HeadlessConfig {
        sites_path: cli.sites,
        config_path: cli.config,
        home_star: !cli.no_home_star,
    };

    let mut runner = match HeadlessRunner::with_config(&config) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match &cli.script {
        Some(path) => match File::open(path) {
            Ok(file) => {
                let stdout = io::stdout();
                let stderr = io::stderr();
                runner.run_with(BufReader::new(file), &mut stdout.lock(), &mut stderr.lock())
            }
            Err(e) => {
                eprintln!("Error: could not open script {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => runner.run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
