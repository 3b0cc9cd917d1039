//! Application-wide constants.
//!
//! This module defines the application name and the fixed location of the
//! user configuration file.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "tz";

/// The binary name of the application (used in command examples).
pub const APP_BINARY_NAME: &str = "tz";

/// Directory under `~/.config/` that holds the configuration file.
pub const CONFIG_DIR_NAME: &str = "tz";

/// File name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "conf.toml";
