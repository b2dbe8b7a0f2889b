//! Filesystem utilities

use std::path::Path;

use log::{info, warn};

/// Check if a path exists
pub fn path_exists(path: &str) -> bool {
    Path::new(path).exists()
}

/// Check if a path is a regular file
pub fn is_file(path: &str) -> bool {
    Path::new(path).is_file()
}

/// Report whether the data file at `path` is usable.
///
/// A missing file is not fatal: the service still starts and every route
/// answers with an error payload until the file shows up.
pub fn check_data_file(path: &str) -> bool {
    if is_file(path) {
        info!("Using data file: {}", path);
        return true;
    }

    if path_exists(path) {
        warn!("Data path is not a regular file: {}", path);
    } else {
        warn!("Data file not found: {}", path);
    }
    false
}
