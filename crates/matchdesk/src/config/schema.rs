use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::listing::OrderBy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    /// SQLite file. Defaults to `~/.matchdesk/data/matchdesk.db`.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    /// JSON file holding recent founders and filter presets.
    #[serde(default)]
    pub preferences_path: Option<PathBuf>,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub auto_match: AutoMatchConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub recent: RecentConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            database_path: None,
            preferences_path: None,
            listing: ListingConfig::default(),
            auto_match: AutoMatchConfig::default(),
            search: SearchConfig::default(),
            recent: RecentConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Configured database path, falling back to the per-user default.
    pub fn resolved_database_path(&self) -> Option<PathBuf> {
        self.database_path
            .clone()
            .or_else(crate::db::default_database_path)
    }

    /// Configured preferences path, falling back to `~/.matchdesk/preferences.json`.
    pub fn resolved_preferences_path(&self) -> Option<PathBuf> {
        self.preferences_path.clone().or_else(|| {
            dirs::home_dir().map(|h| h.join(".matchdesk").join("preferences.json"))
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    #[serde(default)]
    pub order_by: OrderBy,
    #[serde(default)]
    pub asc: bool,
}

fn default_page_size() -> u64 {
    20
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            order_by: OrderBy::default(),
            asc: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoMatchConfig {
    /// Width of the area band on each side of the founder's wanted area.
    #[serde(default = "default_tolerance_percentage")]
    pub tolerance_percentage: f64,
    /// Cap on candidates per run. Unlimited when unset.
    #[serde(default)]
    pub max_results: Option<u64>,
}

fn default_tolerance_percentage() -> f64 {
    20.0
}

impl Default for AutoMatchConfig {
    fn default() -> Self {
        Self {
            tolerance_percentage: default_tolerance_percentage(),
            max_results: None,
        }
    }
}

impl AutoMatchConfig {
    pub fn tolerance(&self) -> f64 {
        self.tolerance_percentage / 100.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_founder_limit")]
    pub founder_limit: u64,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_founder_limit() -> u64 {
    10
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            founder_limit: default_founder_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentConfig {
    #[serde(default = "default_recent_capacity")]
    pub capacity: usize,
}

fn default_recent_capacity() -> usize {
    10
}

impl Default for RecentConfig {
    fn default() -> Self {
        Self {
            capacity: default_recent_capacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}
