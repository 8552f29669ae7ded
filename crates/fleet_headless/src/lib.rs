//! Headless console for the fleet simulation.
//!
//! Reads one command per line and reports on stdout, with refused commands
//! on stderr. The world is built from an optional site layout file and an
//! optional RON tuning file before the first prompt.
//!
//! # Example
//!
//! ```bash
//! # Interactive session with a layout
//! cargo run -p fleet_headless -- sites.txt
//!
//! # Scripted session
//! cargo run -p fleet_headless -- sites.txt --script orders.txt
//! ```
//!
//! See [`interpreter`] for the command set and [`layout`] for the layout
//! file format.

pub mod interpreter;
pub mod layout;
pub mod runner;
pub mod view;

pub use interpreter::{CommandError, Interpreter, Outcome};
pub use layout::{load_config, load_layout, LoadError};
pub use runner::{HeadlessConfig, HeadlessRunner};
pub use view::{View, ViewError};
