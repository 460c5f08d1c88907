//! State of one matching session: the founder being worked on, the
//! properties ticked for recommendation, and the listing being browsed.

use std::collections::BTreeSet;

use crate::config::ListingConfig;
use crate::db::{founder_repo, Database};
use crate::error::{MatchError, Result};
use crate::filter::PropertyFilter;
use crate::listing::{self, OrderBy, Page, PageRequest};
use crate::model::{Founder, MatchMethod, Property};
use crate::prefs::{FilterPreset, RecentFounders};
use crate::recommend::RecommendationStore;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchSession {
    founder: Option<Founder>,
    selection: BTreeSet<i64>,
    filter: PropertyFilter,
    page: PageRequest,
}

impl MatchSession {
    pub fn new(listing: &ListingConfig) -> Self {
        Self {
            page: PageRequest {
                page_size: listing.page_size,
                order_by: listing.order_by,
                asc: listing.asc,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn founder(&self) -> Option<&Founder> {
        self.founder.as_ref()
    }

    pub fn selection(&self) -> &BTreeSet<i64> {
        &self.selection
    }

    pub fn filter(&self) -> &PropertyFilter {
        &self.filter
    }

    pub fn page_request(&self) -> &PageRequest {
        &self.page
    }

    /// Switches to another founder. The selection and page start over.
    pub fn select_founder(&mut self, founder: Founder) {
        self.founder = Some(founder);
        self.selection.clear();
        self.page.page = 1;
    }

    pub fn clear_founder(&mut self) {
        self.founder = None;
        self.selection.clear();
    }

    /// Loads a founder by id, makes it current and records it as recent.
    pub fn open_founder(
        &mut self,
        db: &Database,
        recent: &RecentFounders,
        founder_id: i64,
    ) -> Result<&Founder> {
        let founder = founder_repo::find_by_id(db, founder_id)
            .map_err(MatchError::read("founders"))?
            .ok_or(MatchError::NotFound {
                entity: "founder",
                id: founder_id,
            })?;
        recent.touch(founder_id)?;
        self.selection.clear();
        self.page.page = 1;
        Ok(self.founder.insert(founder))
    }

    /// Flips a property in or out of the selection. Returns whether it is
    /// selected afterwards.
    pub fn toggle_selection(&mut self, property_id: i64) -> bool {
        if self.selection.remove(&property_id) {
            false
        } else {
            self.selection.insert(property_id);
            true
        }
    }

    pub fn select_all<I: IntoIterator<Item = i64>>(&mut self, property_ids: I) {
        self.selection.extend(property_ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn set_filter(&mut self, filter: PropertyFilter) {
        self.filter = filter;
        self.page.page = 1;
    }

    pub fn apply_preset(&mut self, preset: &FilterPreset) {
        self.set_filter(preset.filter.clone());
    }

    pub fn reset_filter(&mut self) {
        self.set_filter(PropertyFilter::default());
    }

    pub fn set_keyword(&mut self, keyword: Option<String>) {
        self.page.keyword = keyword;
        self.page.page = 1;
    }

    pub fn set_sort(&mut self, order_by: OrderBy, asc: bool) {
        self.page.order_by = order_by;
        self.page.asc = asc;
        self.page.page = 1;
    }

    pub fn go_to_page(&mut self, page: u64) {
        self.page.page = page;
    }

    /// Fetches the page the session currently points at.
    pub fn fetch(&self, db: &Database) -> Result<Page<Property>> {
        listing::fetch_page(db, &self.page, &self.filter)
    }

    /// Saves the selection as manual recommendations for the current
    /// founder and clears it. Returns how many rows were created.
    pub fn save_selection(&mut self, store: &RecommendationStore) -> Result<u64> {
        let founder_id = self
            .founder
            .as_ref()
            .map(|f| f.founder_id)
            .ok_or_else(|| MatchError::SaveFailed("no founder selected".to_string()))?;
        let property_ids: Vec<i64> = self.selection.iter().copied().collect();

        let inserted = store.save(founder_id, &property_ids, MatchMethod::Manual)?;
        self.selection.clear();
        Ok(inserted)
    }
}

/// Resolves the recent founder ids, most recent first. Ids whose founder
/// no longer exists are skipped.
pub fn recent_founders(db: &Database, recent: &RecentFounders) -> Result<Vec<Founder>> {
    let ids = recent.ids()?;
    founder_repo::find_many_ordered(db, &ids).map_err(MatchError::read("founders"))
}
