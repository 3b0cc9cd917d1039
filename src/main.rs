//! tz - Terminal world clock
//!
//! Loads `~/.config/tz/conf.toml`, resolves the configured time zones and
//! prints them together with the effective key bindings.

use anyhow::{Context, Result};
use clap::Parser;
use jiff::Timestamp;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tz::constants::{APP_BINARY_NAME, APP_NAME};
use tz::shortcuts::{Action, ShortcutRegistry};
use tz::{ConfigLoader, LoadOutcome, LoadedConfig};

/// tz - Terminal world clock
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print the loaded configuration as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let loader = ConfigLoader::new();
    let loaded = match loader.load() {
        Ok(loaded) => loaded,
        Err(err) if err.is_fatal() => {
            // A config file that exists but cannot be parsed is never ignored
            eprintln!("Error: {err}");
            eprintln!();
            eprintln!("Fix or remove the file and run {} again.", APP_BINARY_NAME);
            std::process::exit(1);
        }
        Err(err) => return Err(err).context("Failed to load configuration"),
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&loaded)
            .context("Failed to serialize configuration")?;
        println!("{json}");
    } else {
        let source = match (loaded.outcome, loader.config_path()) {
            (LoadOutcome::Loaded, Some(path)) => path.display().to_string(),
            (LoadOutcome::DefaultedNoHome, _) => "defaults (no home directory)".to_string(),
            _ => "defaults (no config file)".to_string(),
        };
        println!("{} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));
        println!("Config: {source}");
        println!();
        print_config(&loaded, Timestamp::now());
    }

    Ok(())
}

fn print_config(loaded: &LoadedConfig, now: Timestamp) {
    let config = &loaded.config;

    println!("Zones:");
    if config.zones.is_empty() {
        println!("  (none configured)");
    }
    let name_width = config
        .zones
        .iter()
        .map(|zone| zone.name.chars().count())
        .max()
        .unwrap_or(0);
    for zone in &config.zones {
        let local = zone.local_time(now);
        println!(
            "  {:<name_width$}  {}  {}",
            zone.name,
            local.strftime("%H:%M"),
            zone.db_name
        );
    }

    println!();
    println!("Keys:");
    let registry = ShortcutRegistry::with_defaults(&config.keymaps);
    for action in Action::ALL {
        let keys: Vec<String> = registry
            .bindings_for(action)
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("  {:<12} {}", action.id(), keys.join(", "));
    }
}
