pub mod automatch;
pub mod config;
pub mod db;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod listing;
pub mod model;
pub mod prefs;
pub mod recommend;
pub mod search;
pub mod session;
pub mod telemetry;

pub use automatch::{candidate_predicate, AutoMatchState, AutoMatcher};
pub use config::{load_config, load_config_from_str, Config};
pub use db::{Database, DatabaseError};
pub use debounce::Debouncer;
pub use error::{ConfigError, MatchError, PrefsError, Result};
pub use filter::{Predicate, PropertyFilter, Range};
pub use listing::{fetch_all, fetch_page, FetchTracker, OrderBy, Page, PageRequest};
pub use model::{Founder, MatchMethod, Matching, MatchingFlag, MatchingWithProperty, Property};
pub use prefs::{FilterPreset, FilterPresets, JsonFileStore, KeyValueStore, MemoryStore, RecentFounders};
pub use recommend::RecommendationStore;
pub use search::{FounderSearch, SearchState};
pub use session::MatchSession;
pub use telemetry::init_logging;
