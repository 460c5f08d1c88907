//! Domain records shared by the repositories, the filter builder and the
//! recommendation store.

use serde::{Deserialize, Serialize};

/// Statuses that remove a property from general listings.
pub const BASELINE_EXCLUDED_STATUSES: [&str; 3] = ["진행종료", "진행보류", "계약완료"];

/// Status a property must carry to be considered by auto-match.
pub const AVAILABLE_STATUS: &str = "available";

/// Status given to freshly saved matchings.
pub const RECOMMENDED_STATUS: &str = "추천";

/// A prospective tenant with space and budget requirements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Founder {
    pub founder_id: i64,
    pub name: Option<String>,
    pub contact: Option<String>,
    /// Wanted floor area.
    pub area: Option<f64>,
    /// Maximum deposit.
    pub deposit: Option<f64>,
    /// Maximum monthly rent.
    pub rent: Option<f64>,
    pub premium: Option<f64>,
    pub business_type: Option<String>,
    pub preferred_property: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub floor: Option<String>,
    pub note: Option<String>,
    pub received_at: Option<String>,
}

/// A leasable commercial unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub property_id: i64,
    pub property_code: Option<String>,
    pub received_at: Option<String>,

    pub sido: Option<String>,
    pub sigungu: Option<String>,
    pub beopjeongdong: Option<String>,
    pub jibun: Option<String>,

    pub store_name: Option<String>,
    pub business_type: Option<String>,
    pub status: Option<String>,
    pub floor: Option<String>,
    pub area: Option<f64>,

    pub deposit: Option<f64>,
    pub rent: Option<f64>,
    pub premium: Option<f64>,
    pub maintenance_fee: Option<f64>,

    pub notes: Option<String>,
}

/// How a matching was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMethod {
    #[serde(rename = "자동")]
    Auto,
    #[serde(rename = "수동")]
    Manual,
}

impl MatchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMethod::Auto => "자동",
            MatchMethod::Manual => "수동",
        }
    }
}

impl std::fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean flags on a matching that can be toggled independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingFlag {
    IsFavorite,
    ExcludeFromPrint,
}

impl MatchingFlag {
    /// Column backing this flag.
    pub fn column(&self) -> &'static str {
        match self {
            MatchingFlag::IsFavorite => "is_favorite",
            MatchingFlag::ExcludeFromPrint => "exclude_from_print",
        }
    }
}

/// A persisted founder-to-property recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matching {
    pub matching_id: i64,
    pub founder_id: i64,
    pub property_id: i64,
    pub matched_at: Option<String>,
    pub method: Option<String>,
    pub status: Option<String>,
    /// Always zero; nothing computes a score.
    pub score: Option<f64>,
    pub is_favorite: Option<bool>,
    pub exclude_from_print: Option<bool>,
}

impl Matching {
    /// Reads a flag, treating an unset value as `false`.
    pub fn flag(&self, flag: MatchingFlag) -> bool {
        match flag {
            MatchingFlag::IsFavorite => self.is_favorite.unwrap_or(false),
            MatchingFlag::ExcludeFromPrint => self.exclude_from_print.unwrap_or(false),
        }
    }
}

/// A matching with its property joined in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingWithProperty {
    #[serde(flatten)]
    pub matching: Matching,
    pub property: Option<Property>,
}
