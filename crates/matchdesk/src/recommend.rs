//! Founder-to-property recommendations.
//!
//! Saves are idempotent per `(founder_id, property_id)` and run in a single
//! transaction, so a failed batch leaves no partial rows behind.

use crate::db::matching_repo::{self, NewMatching};
use crate::db::{now_timestamp, Database};
use crate::error::{MatchError, Result};
use crate::model::{
    MatchMethod, MatchingFlag, MatchingWithProperty, Property, RECOMMENDED_STATUS,
};

/// Collapses the property rows joined to one matching into a single value.
pub fn first_or_none(mut joined: Vec<Property>) -> Option<Property> {
    if joined.len() > 1 {
        log::warn!(
            "Matching joined {} property rows, keeping the first",
            joined.len()
        );
    }
    if joined.is_empty() {
        None
    } else {
        Some(joined.swap_remove(0))
    }
}

#[derive(Clone)]
pub struct RecommendationStore {
    db: Database,
}

impl RecommendationStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// A founder's matchings, most recent first, with their property.
    pub fn list(&self, founder_id: i64) -> Result<Vec<MatchingWithProperty>> {
        let rows = matching_repo::list_by_founder(&self.db, founder_id)
            .map_err(MatchError::read("matchings"))?;

        Ok(rows
            .into_iter()
            .map(|(matching, joined)| MatchingWithProperty {
                matching,
                property: first_or_none(joined),
            })
            .collect())
    }

    /// Saves a matching for every property id. Pairs that already exist are
    /// left untouched. Returns how many rows were created.
    pub fn save(&self, founder_id: i64, property_ids: &[i64], method: MatchMethod) -> Result<u64> {
        if founder_id <= 0 {
            return Err(MatchError::SaveFailed(
                "no founder selected".to_string(),
            ));
        }
        if property_ids.is_empty() {
            return Err(MatchError::SaveFailed(
                "no properties selected".to_string(),
            ));
        }

        let _span = tracing::info_span!(
            "recommend.save",
            founder_id,
            count = property_ids.len(),
            method = method.as_str()
        )
        .entered();

        let matched_at = now_timestamp();
        let inserted = self
            .db
            .with_tx(|tx| {
                let mut inserted = 0u64;
                for &property_id in property_ids {
                    let row = NewMatching {
                        founder_id,
                        property_id,
                        matched_at: matched_at.clone(),
                        method: method.as_str().to_string(),
                        status: RECOMMENDED_STATUS.to_string(),
                    };
                    if matching_repo::insert_or_ignore(tx, &row)? {
                        inserted += 1;
                    }
                }
                Ok(inserted)
            })
            .map_err(MatchError::write("matchings"))?;

        log::info!(
            "Saved {} new matching(s) for founder {} ({} requested)",
            inserted,
            founder_id,
            property_ids.len()
        );
        Ok(inserted)
    }

    /// Removes the matching for an exact pair. Absent pairs are not an error.
    pub fn cancel(&self, founder_id: i64, property_id: i64) -> Result<()> {
        let removed = matching_repo::delete_pair(&self.db, founder_id, property_id)
            .map_err(MatchError::write("matchings"))?;
        if removed == 0 {
            log::debug!(
                "No matching for founder {} / property {} to cancel",
                founder_id,
                property_id
            );
        }
        Ok(())
    }

    /// Negates a flag and returns its new value.
    pub fn toggle_flag(&self, matching_id: i64, flag: MatchingFlag) -> Result<bool> {
        matching_repo::toggle_flag(&self.db, matching_id, flag)
            .map_err(MatchError::write("matchings"))?
            .ok_or(MatchError::NotFound {
                entity: "matching",
                id: matching_id,
            })
    }

    pub fn update_status(&self, matching_id: i64, status: &str) -> Result<()> {
        let updated = matching_repo::update_status(&self.db, matching_id, status)
            .map_err(MatchError::write("matchings"))?;
        if updated {
            Ok(())
        } else {
            Err(MatchError::NotFound {
                entity: "matching",
                id: matching_id,
            })
        }
    }
}
