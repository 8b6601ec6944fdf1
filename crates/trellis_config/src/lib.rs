//! Parsing of `trellis.toml` project configuration and scope classification.
//!
//! The configuration names the hardware source and simulation directories and
//! any library roots. From those, a [`ScopeLayout`] classifies every HDL file
//! into a [`FileScope`], which the module registry uses to keep separate
//! top-module sets for synthesis sources and testbenches.

#![warn(missing_docs)]

pub mod discover;
pub mod error;
pub mod loader;
pub mod scope;
pub mod types;

pub use discover::hardware_files;
pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use scope::{FileScope, ScopeLayout};
pub use types::*;
