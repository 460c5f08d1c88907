//! Test harness for isolated test execution.
//!
//! Each harness owns a temporary directory holding a file-backed database
//! and a preference file, so tests never share state.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use matchdesk::config::{AutoMatchConfig, Config};
use matchdesk::db::{founder_repo, property_repo, Database};
use matchdesk::model::{Founder, Property};
use matchdesk::prefs::{FilterPresets, JsonFileStore, KeyValueStore, RecentFounders};
use matchdesk::{AutoMatcher, RecommendationStore};

pub struct TestHarness {
    temp_dir: TempDir,
    pub config: Config,
    pub db: Database,
    pub store: RecommendationStore,
    pub prefs: Arc<dyn KeyValueStore>,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config = Config {
            database_path: Some(temp_dir.path().join("data").join("matchdesk.db")),
            preferences_path: Some(temp_dir.path().join("preferences.json")),
            ..Default::default()
        };

        let db_path = config
            .resolved_database_path()
            .expect("database path is set");
        let db = Database::open(&db_path).expect("Failed to open test database");
        let prefs_path = config
            .resolved_preferences_path()
            .expect("preferences path is set");
        let prefs: Arc<dyn KeyValueStore> =
            Arc::new(JsonFileStore::open(&prefs_path).expect("Failed to open preferences"));

        Self {
            temp_dir,
            config,
            store: RecommendationStore::new(db.clone()),
            db,
            prefs,
        }
    }

    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    pub fn add_property(&self, property: Property) -> i64 {
        property_repo::insert(&self.db, &property).expect("Failed to insert property")
    }

    pub fn add_founder(&self, founder: Founder) -> i64 {
        founder_repo::insert(&self.db, &founder).expect("Failed to insert founder")
    }

    pub fn auto_matcher(&self) -> AutoMatcher {
        self.auto_matcher_with(self.config.auto_match.clone())
    }

    pub fn auto_matcher_with(&self, config: AutoMatchConfig) -> AutoMatcher {
        AutoMatcher::new(self.store.clone(), config)
    }

    pub fn recent(&self) -> RecentFounders {
        RecentFounders::new(self.prefs.clone(), self.config.recent.capacity)
    }

    pub fn presets(&self) -> FilterPresets {
        FilterPresets::new(self.prefs.clone())
    }
}
