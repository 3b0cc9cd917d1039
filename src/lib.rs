//! tz Library
//!
//! This library loads the configuration of the tz world clock: the list of
//! time zones to display, resolved against the host's time zone database,
//! and the key bindings for navigating through time.

// Module declarations
pub mod config;
pub mod constants;
pub mod shortcuts;
pub mod zone;

pub use config::{
    load_config_file, Config, ConfigLoader, Keymaps, LoadConfigError, LoadOutcome, LoadedConfig,
};
pub use zone::{resolve_zone, Zone, ZoneError};
