//! Rule-based auto-match.
//!
//! A founder's stated requirements become a tolerance-banded property
//! predicate; every property that satisfies it is saved as an automatic
//! recommendation. Nothing is scored or ranked.

use crate::config::AutoMatchConfig;
use crate::db::{founder_repo, property_repo};
use crate::error::{MatchError, Result};
use crate::filter::{non_blank, Clause, Column, Predicate};
use crate::model::{Founder, MatchMethod, AVAILABLE_STATUS};
use crate::recommend::RecommendationStore;

/// Progress of a single auto-match run.
#[derive(Debug, Clone, PartialEq)]
pub enum AutoMatchState {
    Idle,
    FounderLoaded {
        founder: Founder,
    },
    CandidatesComputed {
        founder_id: i64,
        property_ids: Vec<i64>,
    },
    Persisted {
        founder_id: i64,
        property_ids: Vec<i64>,
        inserted: u64,
    },
}

/// Builds the candidate predicate for a founder.
///
/// Each requirement constrains only when the founder stated it; the
/// availability condition always applies.
pub fn candidate_predicate(founder: &Founder, tolerance: f64) -> Predicate {
    let mut predicate = Predicate::new();

    if let Some(area) = founder.area {
        let band = area * tolerance;
        predicate.push(Clause::Gte(Column::Area, area - band));
        predicate.push(Clause::Lte(Column::Area, area + band));
    }
    if let Some(deposit) = founder.deposit {
        predicate.push(Clause::Lte(Column::Deposit, deposit));
    }
    if let Some(rent) = founder.rent {
        predicate.push(Clause::Lte(Column::Rent, rent));
    }
    if let Some(business_type) = non_blank(founder.business_type.as_deref()) {
        predicate.push(Clause::Eq(Column::BusinessType, business_type.to_string()));
    }

    predicate.push(Clause::Eq(Column::Status, AVAILABLE_STATUS.to_string()));
    predicate
}

pub struct AutoMatcher {
    store: RecommendationStore,
    config: AutoMatchConfig,
    state: AutoMatchState,
}

impl AutoMatcher {
    pub fn new(store: RecommendationStore, config: AutoMatchConfig) -> Self {
        Self {
            store,
            config,
            state: AutoMatchState::Idle,
        }
    }

    pub fn state(&self) -> &AutoMatchState {
        &self.state
    }

    /// Loads the founder. A missing founder is an error since the rest of
    /// the run depends on it.
    pub fn load_founder(&mut self, founder_id: i64) -> Result<()> {
        let founder = founder_repo::find_by_id(self.store.database(), founder_id)
            .map_err(MatchError::read("founders"))?
            .ok_or(MatchError::NotFound {
                entity: "founder",
                id: founder_id,
            })?;

        self.state = AutoMatchState::FounderLoaded { founder };
        Ok(())
    }

    /// Selects candidate property ids for the loaded founder, ascending.
    /// Returns how many were found.
    pub fn compute_candidates(&mut self) -> Result<usize> {
        let founder = match &self.state {
            AutoMatchState::FounderLoaded { founder } => founder,
            other => {
                return Err(MatchError::ValidationFailed(format!(
                    "cannot compute candidates in state {:?}",
                    other
                )))
            }
        };
        let founder_id = founder.founder_id;

        let predicate = candidate_predicate(founder, self.config.tolerance());
        let property_ids = property_repo::select_ids(
            self.store.database(),
            &predicate,
            self.config.max_results,
        )
        .map_err(MatchError::read("properties"))?;

        log::debug!(
            "Auto-match found {} candidate(s) for founder {}",
            property_ids.len(),
            founder_id
        );

        let count = property_ids.len();
        self.state = AutoMatchState::CandidatesComputed {
            founder_id,
            property_ids,
        };
        Ok(count)
    }

    /// Saves the computed candidates as automatic matchings.
    pub fn persist(&mut self) -> Result<Vec<i64>> {
        let (founder_id, property_ids) = match &self.state {
            AutoMatchState::CandidatesComputed {
                founder_id,
                property_ids,
            } => (*founder_id, property_ids.clone()),
            other => {
                return Err(MatchError::ValidationFailed(format!(
                    "cannot persist in state {:?}",
                    other
                )))
            }
        };

        let inserted = if property_ids.is_empty() {
            0
        } else {
            self.store
                .save(founder_id, &property_ids, MatchMethod::Auto)?
        };

        self.state = AutoMatchState::Persisted {
            founder_id,
            property_ids: property_ids.clone(),
            inserted,
        };
        Ok(property_ids)
    }

    /// Runs a full auto-match for a founder and returns the matched ids.
    pub fn run(&mut self, founder_id: i64) -> Result<Vec<i64>> {
        let _span = tracing::info_span!("automatch.run", founder_id).entered();

        self.state = AutoMatchState::Idle;
        self.load_founder(founder_id)?;
        self.compute_candidates()?;
        let property_ids = self.persist()?;

        log::info!(
            "Auto-matched {} propert(ies) for founder {}",
            property_ids.len(),
            founder_id
        );
        Ok(property_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::model::Property;

    fn cafe_founder() -> Founder {
        Founder {
            area: Some(100.0),
            deposit: Some(5000.0),
            rent: Some(200.0),
            business_type: Some("카페".to_string()),
            ..Default::default()
        }
    }

    fn candidate(area: f64, deposit: f64, rent: f64, business_type: &str, status: &str) -> Property {
        Property {
            area: Some(area),
            deposit: Some(deposit),
            rent: Some(rent),
            business_type: Some(business_type.to_string()),
            status: Some(status.to_string()),
            ..Default::default()
        }
    }

    fn matcher() -> AutoMatcher {
        let db = Database::open_in_memory().expect("Failed to create test database");
        AutoMatcher::new(RecommendationStore::new(db), AutoMatchConfig::default())
    }

    #[test]
    fn test_predicate_band_and_ceilings() {
        let predicate = candidate_predicate(&cafe_founder(), 0.2);
        assert!(predicate.matches(&candidate(80.0, 5000.0, 200.0, "카페", "available")));
        assert!(predicate.matches(&candidate(120.0, 0.0, 0.0, "카페", "available")));
        assert!(!predicate.matches(&candidate(79.9, 100.0, 100.0, "카페", "available")));
        assert!(!predicate.matches(&candidate(120.1, 100.0, 100.0, "카페", "available")));
        assert!(!predicate.matches(&candidate(100.0, 5001.0, 100.0, "카페", "available")));
        assert!(!predicate.matches(&candidate(100.0, 100.0, 201.0, "카페", "available")));
        assert!(!predicate.matches(&candidate(100.0, 100.0, 100.0, "음식점", "available")));
        assert!(!predicate.matches(&candidate(100.0, 100.0, 100.0, "카페", "접수")));
    }

    #[test]
    fn test_absent_requirements_do_not_constrain() {
        let predicate = candidate_predicate(&Founder::default(), 0.2);
        assert_eq!(predicate.clauses().len(), 1);
        assert!(predicate.matches(&candidate(1.0, 1e9, 1e9, "아무거나", "available")));

        let blank_type = Founder {
            business_type: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(candidate_predicate(&blank_type, 0.2).clauses().len(), 1);
    }

    #[test]
    fn test_run_saves_candidates_as_auto() {
        let mut matcher = matcher();
        let db = matcher.store.database().clone();
        let founder_id = founder_repo::insert(&db, &cafe_founder()).unwrap();
        let hit = property_repo::insert(&db, &candidate(90.0, 3000.0, 150.0, "카페", "available"))
            .unwrap();
        property_repo::insert(&db, &candidate(90.0, 9000.0, 150.0, "카페", "available")).unwrap();
        property_repo::insert(&db, &candidate(90.0, 3000.0, 150.0, "카페", "계약완료")).unwrap();

        let ids = matcher.run(founder_id).unwrap();
        assert_eq!(ids, vec![hit]);
        assert_eq!(
            matcher.state(),
            &AutoMatchState::Persisted {
                founder_id,
                property_ids: vec![hit],
                inserted: 1,
            }
        );

        let saved = matcher.store.list(founder_id).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].matching.method.as_deref(), Some("자동"));

        // A second run matches the same ids but creates nothing new.
        assert_eq!(matcher.run(founder_id).unwrap(), vec![hit]);
        assert!(matches!(
            matcher.state(),
            AutoMatchState::Persisted { inserted: 0, .. }
        ));
    }

    #[test]
    fn test_run_without_candidates_writes_nothing() {
        let mut matcher = matcher();
        let db = matcher.store.database().clone();
        let founder_id = founder_repo::insert(&db, &cafe_founder()).unwrap();

        assert!(matcher.run(founder_id).unwrap().is_empty());
        assert!(matcher.store.list(founder_id).unwrap().is_empty());
    }

    #[test]
    fn test_run_unknown_founder_is_not_found() {
        let mut matcher = matcher();
        assert!(matches!(
            matcher.run(42),
            Err(MatchError::NotFound { entity: "founder", id: 42 })
        ));
        assert_eq!(matcher.state(), &AutoMatchState::Idle);
    }

    #[test]
    fn test_max_results_caps_candidates() {
        let db = Database::open_in_memory().expect("Failed to create test database");
        let mut matcher = AutoMatcher::new(
            RecommendationStore::new(db.clone()),
            AutoMatchConfig {
                tolerance_percentage: 20.0,
                max_results: Some(2),
            },
        );
        let founder_id = founder_repo::insert(&db, &Founder::default()).unwrap();
        for _ in 0..4 {
            property_repo::insert(&db, &candidate(10.0, 1.0, 1.0, "카페", "available")).unwrap();
        }
        assert_eq!(matcher.run(founder_id).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_steps_out_of_order_are_rejected() {
        let mut matcher = matcher();
        assert!(matcher.compute_candidates().unwrap_err().is_validation());
        assert!(matcher.persist().unwrap_err().is_validation());
    }
}
