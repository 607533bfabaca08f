//! Parsing and validation of `ferrule.toml` evaluator configuration.
//!
//! The configuration selects which folds an evaluator runs and in what order,
//! and toggles the optional behaviors of individual folds. Turning the
//! result into a runnable evaluator is left to `ferrule_eval`.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
