//! Integration tests for configuration loading.
//!
//! Each test points the loader at a throwaway home directory and pins the
//! reference instant so zone abbreviations do not depend on today's date.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use jiff::Timestamp;
use tempfile::TempDir;
use tz::config::config_file_path;
use tz::shortcuts::{Action, ShortcutRegistry};
use tz::{ConfigLoader, LoadConfigError, LoadOutcome};

const SAMPLE_CONFIG: &str = r#"
header = "My Clocks"

[[zones]]
id = "America/New_York"
name = "NYC"

[[zones]]
id = "Europe/Paris"

[[zones]]
id = "australia/sydney"

[keymaps]
prev_hour = ["h", "left"]
next_hour = ["l", "right"]
now = ["n"]
"#;

/// Log sink shared between a test and the subscriber it installs.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a scoped subscriber and returns what it logged.
fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    (result, logs.contents())
}

fn winter() -> Timestamp {
    "2024-01-15T12:00:00Z".parse().unwrap()
}

fn summer() -> Timestamp {
    "2024-07-15T12:00:00Z".parse().unwrap()
}

fn write_config(home: &Path, content: &str) -> PathBuf {
    let path = config_file_path(home);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn loader_for(home: &TempDir) -> ConfigLoader {
    ConfigLoader::new().with_home_dir(Some(home.path().to_path_buf()))
}

// ============================================================================
// Successful loads
// ============================================================================

#[test]
fn test_sample_config_winter() {
    let home = TempDir::new().unwrap();
    write_config(home.path(), SAMPLE_CONFIG);

    let loaded = loader_for(&home).at(winter()).load().unwrap();
    assert_eq!(loaded.outcome, LoadOutcome::Loaded);

    let zones = &loaded.config.zones;
    assert_eq!(zones.len(), 3);
    assert_eq!(zones[0].name, "(EST) NYC");
    assert_eq!(zones[0].db_name, "America/New_York");
    assert_eq!(zones[1].name, "(CET) Europe/Paris");
    assert_eq!(zones[2].name, "(AEDT) Australia/Sydney");
    assert_eq!(zones[2].db_name, "Australia/Sydney");
}

#[test]
fn test_sample_config_summer() {
    let home = TempDir::new().unwrap();
    write_config(home.path(), SAMPLE_CONFIG);

    let config = loader_for(&home).at(summer()).load().unwrap().into_config();

    assert!(config.zones[0].name.starts_with("(EDT) "));
    assert!(config.zones[1].name.starts_with("(CEST) "));
    assert!(config.zones[2].name.starts_with("(AEST) "));
}

#[test]
fn test_keymaps_pass_through() {
    let home = TempDir::new().unwrap();
    write_config(home.path(), SAMPLE_CONFIG);

    let config = loader_for(&home).load().unwrap().into_config();

    assert_eq!(config.keymaps.prev_hour, vec!["h", "left"]);
    assert_eq!(config.keymaps.next_hour, vec!["l", "right"]);
    assert_eq!(config.keymaps.now, vec!["n"]);
    assert!(config.keymaps.prev_week.is_empty());
}

#[test]
fn test_keymaps_feed_shortcut_registry() {
    let home = TempDir::new().unwrap();
    write_config(
        home.path(),
        "[keymaps]\nprev_day = [\"ctrl+h\", \"bogus-key\"]\ntoggle_date = [\"D\"]\n",
    );

    let (config, logs) = with_captured_logs(|| loader_for(&home).load().unwrap().into_config());
    assert!(!logs.contains("WARN"), "logs: {logs}");

    // The config keeps the strings as written, invalid ones included
    assert_eq!(config.keymaps.prev_day, vec!["ctrl+h", "bogus-key"]);

    let (registry, logs) = with_captured_logs(|| ShortcutRegistry::with_defaults(&config.keymaps));
    assert!(logs.contains("bogus-key"), "logs: {logs}");
    assert_eq!(registry.bindings_for(Action::PrevDay).len(), 1);
    assert_eq!(registry.bindings_for(Action::ToggleDate).len(), 1);
    assert_eq!(registry.bindings_for(Action::PrevHour).len(), 2);
}

#[test]
fn test_zone_count_matches_document() {
    let home = TempDir::new().unwrap();
    let zones = ["Asia/Kolkata", "UTC", "America/Los_Angeles", "Europe/Paris", "Africa/Lagos"];
    let content: String = zones
        .iter()
        .map(|id| format!("[[zones]]\nid = \"{id}\"\n\n"))
        .collect();
    write_config(home.path(), &content);

    let config = loader_for(&home).at(winter()).load().unwrap().into_config();

    assert_eq!(config.zones.len(), zones.len());
    let db_names: Vec<&str> = config.zones.iter().map(|z| z.db_name.as_str()).collect();
    assert_eq!(db_names, zones);
}

// ============================================================================
// Fallbacks
// ============================================================================

#[test]
fn test_missing_file_logs_and_defaults() {
    let home = TempDir::new().unwrap();

    let (result, logs) = with_captured_logs(|| loader_for(&home).load());
    let loaded = result.unwrap();

    assert_eq!(loaded.outcome, LoadOutcome::DefaultedNoFile);
    assert!(loaded.config.zones.is_empty());
    assert!(logs.contains("INFO"), "logs: {logs}");
    assert!(logs.contains("Config file not found"), "logs: {logs}");
}

#[test]
fn test_missing_home_defaults_silently() {
    let (result, logs) = with_captured_logs(|| ConfigLoader::new().with_home_dir(None).load());
    let loaded = result.unwrap();

    assert_eq!(loaded.outcome, LoadOutcome::DefaultedNoHome);
    assert!(loaded.config.zones.is_empty());
    assert!(!logs.contains("INFO"), "logs: {logs}");
}

#[test]
fn test_defaulted_differs_from_configured_empty() {
    let home = TempDir::new().unwrap();
    let missing = loader_for(&home).load().unwrap();

    write_config(home.path(), "header = \"nothing here\"\n");
    let empty = loader_for(&home).load().unwrap();

    assert_eq!(missing.config, empty.config);
    assert_eq!(missing.outcome, LoadOutcome::DefaultedNoFile);
    assert_eq!(empty.outcome, LoadOutcome::Loaded);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_invalid_zone_fails_whole_load() {
    let home = TempDir::new().unwrap();
    write_config(
        home.path(),
        "[[zones]]\nid = \"Europe/Paris\"\n\n[[zones]]\nid = \"Invalid/Zone\"\nname = \"Nowhere\"\n",
    );

    let err = loader_for(&home).load().unwrap_err();

    assert!(!err.is_fatal());
    assert!(matches!(err, LoadConfigError::Zone(_)));
    assert!(err.to_string().contains("Invalid/Zone"));
}

#[test]
fn test_parse_error_is_fatal() {
    let home = TempDir::new().unwrap();
    write_config(home.path(), "[[zones]]\nid = America/New_York\n");

    let err = loader_for(&home).load().unwrap_err();

    assert!(err.is_fatal());
    assert!(matches!(err, LoadConfigError::Parse { .. }));
    assert!(err.to_string().starts_with("Error parsing config file"));
}

#[test]
fn test_explicit_config_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("clocks.toml");
    fs::write(&path, "[[zones]]\nid = \"Asia/Tokyo\"\nname = \"Tokyo\"\n").unwrap();

    let config = ConfigLoader::new()
        .with_config_path(path)
        .at(winter())
        .load()
        .unwrap()
        .into_config();

    assert_eq!(config.zones[0].name, "(JST) Tokyo");
}
