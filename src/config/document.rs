//! Raw shape of the configuration file.
//!
//! These types mirror `~/.config/tz/conf.toml` one to one and only live
//! while the file is being loaded. Every field is optional in the file.
//!
//! ```toml
//! header = "My Clocks"
//!
//! [[zones]]
//! id = "America/New_York"
//! name = "NYC"
//!
//! [keymaps]
//! prev_hour = ["h", "left"]
//! next_hour = ["l", "right"]
//! now = ["n"]
//! ```

use serde::Deserialize;

/// The parsed configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigDocument {
    /// Free-form title; not used when building the configuration.
    pub header: String,
    /// Requested zones in file order.
    pub zones: Vec<ZoneEntry>,
    /// Key bindings per action.
    pub keymaps: KeymapSet,
}

impl ConfigDocument {
    /// Parses TOML text into a document.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// One `[[zones]]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ZoneEntry {
    /// Time zone database identifier, e.g. `Europe/Paris`.
    pub id: String,
    /// Display label; empty means "use the database name".
    pub name: String,
}

/// The `[keymaps]` table: key binding strings for each action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeymapSet {
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
