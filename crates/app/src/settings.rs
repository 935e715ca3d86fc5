//! Settings for the application.
//!
//! Values come from an optional TOML file (`settings.toml` unless `--config`
//! says otherwise), then from `LEDGERVIEW_*` environment variables, e.g.
//! `LEDGERVIEW_DATABASE__URL`. Command line flags override both.
//!
//! ```toml
//! [app]
//! level = "info"
//!
//! [database]
//! url = "postgres://ledger@localhost/gnucash"
//! run_migrations = false
//! ```

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Database {
    pub url: String,
    /// Create the ledger tables if missing. Leave off for GnuCash files.
    pub run_migrations: bool,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            url: "sqlite:./ledger.gnucash?mode=rwc".to_string(),
            run_migrations: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub database: Database,
}

impl Settings {
    pub fn new(path: Option<&str>) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(path.unwrap_or(DEFAULT_CONFIG_PATH)).required(false))
            .add_source(
                Environment::with_prefix("LEDGERVIEW")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}
