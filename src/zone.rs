//! Time zone resolution.
//!
//! Turns one configured zone entry (a time zone database identifier plus an
//! optional display name) into a display-ready [`Zone`], using the host's
//! time zone database as of a reference instant.

use jiff::tz::TimeZone;
use jiff::{Timestamp, Zoned};
use serde::Serialize;
use thiserror::Error;

use crate::config::document::ZoneEntry;

/// Identifier that selects the host's own time zone.
const LOCAL_ZONE_ID: &str = "Local";

/// Identifier (and canonical name) of Coordinated Universal Time.
const UTC_ZONE_ID: &str = "UTC";

/// Error produced when a zone entry cannot be resolved.
#[derive(Debug, Error)]
pub enum ZoneError {
    /// The identifier is not known to the time zone database.
    #[error("looking up zone {id}: {source}")]
    NotFound {
        /// Identifier exactly as it appeared in the configuration.
        id: String,
        /// Why the database lookup failed.
        #[source]
        source: jiff::Error,
    },
}

impl ZoneError {
    /// The identifier that failed to resolve.
    pub fn id(&self) -> &str {
        match self {
            Self::NotFound { id, .. } => id,
        }
    }
}

/// A resolved, display-ready time zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Zone {
    /// Canonical identifier as reported by the time zone database.
    pub db_name: String,
    /// Label of the form `(<abbreviation>) <display name>`.
    pub name: String,
    #[serde(skip)]
    time_zone: TimeZone,
}

impl Zone {
    /// The underlying time zone rules.
    pub fn time_zone(&self) -> &TimeZone {
        &self.time_zone
    }

    /// Projects `now` into this zone's local time.
    pub fn local_time(&self, now: Timestamp) -> Zoned {
        now.to_zoned(self.time_zone.clone())
    }
}

/// Resolves a configured zone entry as of `now`.
///
/// The abbreviation is whatever the database reports for that instant, so
/// the same entry yields `EST` in January and `EDT` in July. An empty
/// abbreviation is passed through unchanged.
pub fn resolve_zone(now: Timestamp, entry: &ZoneEntry) -> Result<Zone, ZoneError> {
    let (time_zone, canonical) = lookup(&entry.id)?;

    let display_name = if entry.name.is_empty() {
        canonical.as_str()
    } else {
        entry.name.as_str()
    };

    let info = time_zone.to_offset_info(now);
    let name = format!("({}) {}", info.abbreviation(), display_name);

    Ok(Zone {
        db_name: canonical,
        name,
        time_zone,
    })
}

/// Looks up an identifier, returning the time zone and its canonical name.
///
/// An empty identifier means UTC and `Local` means the host's own zone;
/// everything else goes through the database.
fn lookup(id: &str) -> Result<(TimeZone, String), ZoneError> {
    if id.is_empty() || id == UTC_ZONE_ID {
        return Ok((TimeZone::UTC, UTC_ZONE_ID.to_string()));
    }

    if id == LOCAL_ZONE_ID {
        let time_zone = TimeZone::try_system().map_err(|source| ZoneError::NotFound {
            id: id.to_string(),
            source,
        })?;
        return Ok((time_zone, LOCAL_ZONE_ID.to_string()));
    }

    let time_zone = TimeZone::get(id).map_err(|source| ZoneError::NotFound {
        id: id.to_string(),
        source,
    })?;
    let canonical = time_zone.iana_name().unwrap_or(id).to_string();

    Ok((time_zone, canonical))
}
