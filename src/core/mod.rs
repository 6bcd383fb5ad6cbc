//! Core application functionality
//!
//! This module contains the command line surface and run configuration:
//! - CLI parsing and validation
//! - The user settings file
//! - The validated, immutable run configuration
//! - Error reporting and the runner that drives the pipeline

pub mod cli;
pub mod config;
pub mod config_file;
pub mod platform;
pub mod runner;

// Re-export commonly used items
pub use cli::CliArgs;
pub use config::{CssOptions, PrioritySource, SplitConfig};
pub use config_file::ConfigFile;
pub use runner::run_app;
