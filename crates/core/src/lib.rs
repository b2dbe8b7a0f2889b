//! Surf's Up Core Library
//!
//! Shared utilities for the climate API:
//! - Configuration loading (XDG-compliant)
//! - Data file checks
//! - Common constants

mod config;
pub mod fs;

pub use config::{find_config_file, load_config, search_order, ConfigSource};
pub use fs::{check_data_file, is_file, path_exists};

/// Application name used for XDG paths
pub const APP_NAME: &str = "surfs-up";

/// Default API port
pub const DEFAULT_PORT: u16 = 5000;

/// Default location of the pre-populated climate database
pub const DEFAULT_DATABASE_PATH: &str = "./Resources/hawaii.sqlite";
