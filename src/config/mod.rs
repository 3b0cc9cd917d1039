//! Configuration loading for the application.
//!
//! This module locates `~/.config/tz/conf.toml`, parses it, and resolves
//! every configured zone against the host's time zone database.
//!
//! A missing home directory or a missing config file is not an error: the
//! loader falls back to an empty [`Config`] and reports which fallback it
//! took through [`LoadOutcome`]. A file that exists but cannot be parsed is
//! reported as a fatal [`LoadConfigError`]; the caller is expected to stop
//! the process rather than run with a configuration the user did not write.

pub mod document;

use jiff::Timestamp;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use crate::shortcuts::Action;
use crate::zone::{resolve_zone, Zone, ZoneError};
use document::{ConfigDocument, KeymapSet};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum LoadConfigError {
    /// The config file is not valid UTF-8.
    #[error("Error parsing config file {}: {source}", .path.display())]
    Encoding {
        /// The file that was read.
        path: PathBuf,
        /// Where decoding failed.
        #[source]
        source: std::str::Utf8Error,
    },

    /// The config file is not valid TOML or has the wrong shape.
    #[error("Error parsing config file {}: {source}", .path.display())]
    Parse {
        /// The file that was read.
        path: PathBuf,
        /// What the TOML parser rejected.
        #[source]
        source: toml::de::Error,
    },

    /// A configured zone could not be resolved.
    #[error(transparent)]
    Zone(#[from] ZoneError),
}

impl LoadConfigError {
    /// Whether the process must terminate instead of handling this error.
    ///
    /// Parse failures are fatal: the user wrote a config file and running
    /// without it would silently ignore their intent.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Encoding { .. } | Self::Parse { .. })
    }
}

/// How a configuration was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadOutcome {
    /// The config file was read and every zone resolved.
    Loaded,
    /// No home directory could be determined; defaults are in use.
    DefaultedNoHome,
    /// The config file is missing or unreadable; defaults are in use.
    DefaultedNoFile,
}

/// Key binding strings for each action, copied verbatim from the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Keymaps {
    /// Move one hour back.
    pub prev_hour: Vec<String>,
    /// Move one hour forward.
    pub next_hour: Vec<String>,
    /// Move one day back.
    pub prev_day: Vec<String>,
    /// Move one day forward.
    pub next_day: Vec<String>,
    /// Move one week back.
    pub prev_week: Vec<String>,
    /// Move one week forward.
    pub next_week: Vec<String>,
    /// Show or hide dates.
    pub toggle_date: Vec<String>,
    /// Open the selected time in a web browser.
    pub open_web: Vec<String>,
    /// Jump back to the current time.
    pub now: Vec<String>,
}

impl Keymaps {
    /// Binding strings configured for `action`, in file order.
    pub fn bindings(&self, action: Action) -> &[String] {
        match action {
            Action::PrevHour => &self.prev_hour,
            Action::NextHour => &self.next_hour,
            Action::PrevDay => &self.prev_day,
            Action::NextDay => &self.next_day,
            Action::PrevWeek => &self.prev_week,
            Action::NextWeek => &self.next_week,
            Action::ToggleDate => &self.toggle_date,
            Action::OpenWeb => &self.open_web,
            Action::Now => &self.now,
        }
    }
}

impl From<KeymapSet> for Keymaps {
    fn from(set: KeymapSet) -> Self {
        Self {
            prev_hour: set.prev_hour,
            next_hour: set.next_hour,
            prev_day: set.prev_day,
            next_day: set.next_day,
            prev_week: set.prev_week,
            next_week: set.next_week,
            toggle_date: set.toggle_date,
            open_web: set.open_web,
            now: set.now,
        }
    }
}

/// Application configuration.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Resolved zones in config file order.
    pub zones: Vec<Zone>,
    /// Key bindings.
    pub keymaps: Keymaps,
}

/// A loaded configuration together with how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedConfig {
    /// Which path the loader took.
    pub outcome: LoadOutcome,
    /// The configuration itself.
    pub config: Config,
}

impl LoadedConfig {
    fn defaulted(outcome: LoadOutcome) -> Self {
        Self {
            outcome,
            config: Config::default(),
        }
    }

    /// Discards the outcome.
    pub fn into_config(self) -> Config {
        self.config
    }
}

/// Gets the config file path under a home directory.
///
/// Always `<home>/.config/tz/conf.toml`, on every platform.
pub fn config_file_path(home: &Path) -> PathBuf {
    home.join(".config")
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

/// Loads the configuration from the user's home directory as of now.
pub fn load_config_file() -> Result<LoadedConfig, LoadConfigError> {
    ConfigLoader::new().load()
}

/// Locates, reads and resolves the configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    now: Option<Timestamp>,
}

impl ConfigLoader {
    /// Creates a loader for the current user's home directory.
    pub fn new() -> Self {
        Self::default().with_home_dir(dirs::home_dir())
    }

    /// Uses `home` instead of the user's home directory. `None` behaves
    /// like a system without a home directory.
    pub fn with_home_dir(mut self, home: Option<PathBuf>) -> Self {
        self.config_path = home.as_deref().map(config_file_path);
        self
    }

    /// Reads the configuration from an explicit file.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Pins the instant used to pick zone abbreviations. Defaults to the
    /// wall-clock time when [`ConfigLoader::load`] runs.
    pub fn at(mut self, now: Timestamp) -> Self {
        self.now = Some(now);
        self
    }

    /// The file this loader reads, if a home directory is known.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Loads the configuration.
    ///
    /// Either every configured zone resolves or the whole load fails with
    /// the first [`ZoneError`]; a partial zone list is never returned.
    pub fn load(&self) -> Result<LoadedConfig, LoadConfigError> {
        let Some(config_path) = self.config_path.as_deref() else {
            debug!("No home directory, using default configuration");
            return Ok(LoadedConfig::defaulted(LoadOutcome::DefaultedNoHome));
        };

        let bytes = match fs::read(config_path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(
                    path = %config_path.display(),
                    "Config file not found. Skipping..."
                );
                return Ok(LoadedConfig::defaulted(LoadOutcome::DefaultedNoFile));
            }
            Err(err) => {
                warn!(
                    path = %config_path.display(),
                    error = %err,
                    "Config file could not be read. Skipping..."
                );
                return Ok(LoadedConfig::defaulted(LoadOutcome::DefaultedNoFile));
            }
        };

        let content = std::str::from_utf8(&bytes).map_err(|source| LoadConfigError::Encoding {
            path: config_path.to_path_buf(),
            source,
        })?;

        let document = ConfigDocument::parse(content).map_err(|source| LoadConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })?;

        let now = self.now.unwrap_or_else(Timestamp::now);
        let zones = document
            .zones
            .iter()
            .map(|entry| resolve_zone(now, entry))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            path = %config_path.display(),
            zones = zones.len(),
            "Loaded configuration"
        );

        Ok(LoadedConfig {
            outcome: LoadOutcome::Loaded,
            config: Config {
                zones,
                keymaps: document.keymaps.into(),
            },
        })
    }
}
