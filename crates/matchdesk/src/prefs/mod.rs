//! Locally persisted state: recently selected founders and filter presets.

pub mod store;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use store::{get_json, set_json, JsonFileStore, KeyValueStore, MemoryStore};

use crate::db::now_timestamp;
use crate::error::PrefsError;
use crate::filter::PropertyFilter;

pub const RECENT_FOUNDERS_KEY: &str = "recentFounderIds";
pub const FILTER_PRESETS_KEY: &str = "filterPresets";

/// Most-recent-first list of founder ids, deduplicated and capped.
#[derive(Clone)]
pub struct RecentFounders {
    store: Arc<dyn KeyValueStore>,
    capacity: usize,
}

impl RecentFounders {
    pub fn new(store: Arc<dyn KeyValueStore>, capacity: usize) -> Self {
        Self { store, capacity }
    }

    pub fn ids(&self) -> Result<Vec<i64>, PrefsError> {
        let mut ids: Vec<i64> = get_json(self.store.as_ref(), RECENT_FOUNDERS_KEY)?.unwrap_or_default();
        ids.truncate(self.capacity);
        Ok(ids)
    }

    /// Moves `founder_id` to the front and returns the updated list.
    pub fn touch(&self, founder_id: i64) -> Result<Vec<i64>, PrefsError> {
        let mut ids = self.ids()?;
        ids.retain(|id| *id != founder_id);
        ids.insert(0, founder_id);
        ids.truncate(self.capacity);
        set_json(self.store.as_ref(), RECENT_FOUNDERS_KEY, &ids)?;
        Ok(ids)
    }

    pub fn clear(&self) -> Result<(), PrefsError> {
        self.store.remove(RECENT_FOUNDERS_KEY)
    }
}

/// A named, saved property filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPreset {
    pub id: String,
    pub name: String,
    pub filter: PropertyFilter,
    pub created_at: String,
}

#[derive(Clone)]
pub struct FilterPresets {
    store: Arc<dyn KeyValueStore>,
}

impl FilterPresets {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Presets in the order they were saved.
    pub fn list(&self) -> Result<Vec<FilterPreset>, PrefsError> {
        Ok(get_json(self.store.as_ref(), FILTER_PRESETS_KEY)?.unwrap_or_default())
    }

    pub fn find(&self, id: &str) -> Result<Option<FilterPreset>, PrefsError> {
        Ok(self.list()?.into_iter().find(|p| p.id == id))
    }

    pub fn save(&self, name: &str, filter: &PropertyFilter) -> Result<FilterPreset, PrefsError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PrefsError::EmptyPresetName);
        }

        let preset = FilterPreset {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            filter: filter.clone(),
            created_at: now_timestamp(),
        };
        let mut presets = self.list()?;
        presets.push(preset.clone());
        set_json(self.store.as_ref(), FILTER_PRESETS_KEY, &presets)?;

        log::debug!("Saved filter preset '{}' ({})", preset.name, preset.id);
        Ok(preset)
    }

    /// Removes a preset. Returns whether one was removed.
    pub fn delete(&self, id: &str) -> Result<bool, PrefsError> {
        let mut presets = self.list()?;
        let before = presets.len();
        presets.retain(|p| p.id != id);
        if presets.len() == before {
            return Ok(false);
        }
        set_json(self.store.as_ref(), FILTER_PRESETS_KEY, &presets)?;
        Ok(true)
    }
}
