//! Declarative property filters and the predicates they compile to.

pub mod predicate;

use serde::{Deserialize, Serialize};

pub use predicate::{Clause, Column, FieldValue, Predicate, SqlFragment};

use crate::model::BASELINE_EXCLUDED_STATUSES;

/// Columns searched by a keyword.
pub const KEYWORD_COLUMNS: [Column; 5] = [
    Column::StoreName,
    Column::Beopjeongdong,
    Column::Jibun,
    Column::Notes,
    Column::PropertyCode,
];

/// Closed numeric range. An unset bound does not constrain; a bound of
/// `Some(0.0)` does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Range {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl Range {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn is_set(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    fn push_clauses(&self, column: Column, predicate: &mut Predicate) {
        if let Some(min) = self.min {
            predicate.push(Clause::Gte(column, min));
        }
        if let Some(max) = self.max {
            predicate.push(Clause::Lte(column, max));
        }
    }
}

/// User-facing property filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyFilter {
    pub area: Range,
    pub deposit: Range,
    pub rent: Range,
    pub premium: Range,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub floors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub business_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sido: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sigungu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// Statuses excluded on top of the baseline terminal statuses.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_status: Vec<String>,
}

impl PropertyFilter {
    /// Compiles the filter. The baseline status exclusion is always present.
    pub fn build(&self) -> Predicate {
        let mut predicate = Predicate::new();

        self.area.push_clauses(Column::Area, &mut predicate);
        self.deposit.push_clauses(Column::Deposit, &mut predicate);
        self.rent.push_clauses(Column::Rent, &mut predicate);
        self.premium.push_clauses(Column::Premium, &mut predicate);

        let floors = non_empty_values(&self.floors);
        if !floors.is_empty() {
            predicate.push(Clause::In(Column::Floor, floors));
        }
        let business_types = non_empty_values(&self.business_types);
        if !business_types.is_empty() {
            predicate.push(Clause::In(Column::BusinessType, business_types));
        }

        if let Some(sido) = non_blank(self.sido.as_deref()) {
            predicate.push(Clause::Eq(Column::Sido, sido.to_string()));
        }
        if let Some(sigungu) = non_blank(self.sigungu.as_deref()) {
            predicate.push(Clause::Eq(Column::Sigungu, sigungu.to_string()));
        }
        if let Some(keyword) = non_blank(self.keyword.as_deref()) {
            predicate.push(Clause::AnyContains(
                KEYWORD_COLUMNS.to_vec(),
                keyword.to_string(),
            ));
        }

        predicate.push(Clause::NotIn(Column::Status, self.excluded_statuses()));
        predicate
    }

    /// Baseline statuses followed by the extra ones, without duplicates.
    pub fn excluded_statuses(&self) -> Vec<String> {
        let mut statuses: Vec<String> = BASELINE_EXCLUDED_STATUSES
            .iter()
            .map(|s| s.to_string())
            .collect();
        for status in non_empty_values(&self.exclude_status) {
            if !statuses.contains(&status) {
                statuses.push(status);
            }
        }
        statuses
    }

    /// Number of filter groups currently constraining the listing.
    pub fn active_count(&self) -> usize {
        [
            self.area.is_set(),
            self.deposit.is_set(),
            self.rent.is_set(),
            self.premium.is_set(),
            !non_empty_values(&self.floors).is_empty(),
            non_blank(self.keyword.as_deref()).is_some(),
            non_blank(self.sido.as_deref()).is_some(),
            non_blank(self.sigungu.as_deref()).is_some(),
            !non_empty_values(&self.business_types).is_empty(),
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }
}

/// Returns the trimmed value, or `None` when it is absent or blank.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn non_empty_values(values: &[String]) -> Vec<String> {
    values
        .iter()
        .filter(|v| !v.trim().is_empty())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Property;

    fn listed(status: &str) -> Property {
        Property {
            property_id: 1,
            status: Some(status.to_string()),
            area: Some(50.0),
            deposit: Some(0.0),
            sido: Some("서울특별시".to_string()),
            store_name: Some("Corner Cafe".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_filter_only_excludes_baseline() {
        let predicate = PropertyFilter::default().build();
        assert_eq!(predicate.clauses().len(), 1);
        assert!(predicate.matches(&listed("접수")));
        assert!(predicate.matches(&listed("진행중")));
        for status in BASELINE_EXCLUDED_STATUSES {
            assert!(!predicate.matches(&listed(status)));
        }
    }

    #[test]
    fn test_extra_exclusions_union_with_baseline() {
        let filter = PropertyFilter {
            exclude_status: vec!["접수".to_string(), "계약완료".to_string()],
            ..Default::default()
        };
        assert_eq!(
            filter.excluded_statuses(),
            vec!["진행종료", "진행보류", "계약완료", "접수"]
        );
        assert!(!filter.build().matches(&listed("접수")));
    }

    #[test]
    fn test_zero_bound_is_a_real_constraint() {
        let filter = PropertyFilter {
            deposit: Range::new(None, Some(0.0)),
            ..Default::default()
        };
        let predicate = filter.build();
        assert_eq!(predicate.clauses().len(), 2);
        assert!(predicate.matches(&listed("접수")));

        let mut pricey = listed("접수");
        pricey.deposit = Some(1000.0);
        assert!(!predicate.matches(&pricey));
    }

    #[test]
    fn test_blank_strings_are_no_filter() {
        let filter = PropertyFilter {
            sido: Some(String::new()),
            sigungu: Some("   ".to_string()),
            keyword: Some(String::new()),
            floors: vec![String::new()],
            ..Default::default()
        };
        assert_eq!(filter.build(), PropertyFilter::default().build());
        assert_eq!(filter.active_count(), 0);
    }

    #[test]
    fn test_keyword_matches_any_column() {
        let filter = PropertyFilter {
            keyword: Some("corner".to_string()),
            ..Default::default()
        };
        assert!(filter.build().matches(&listed("접수")));

        let filter = PropertyFilter {
            keyword: Some("역삼".to_string()),
            ..Default::default()
        };
        let mut p = listed("접수");
        assert!(!filter.build().matches(&p));
        p.beopjeongdong = Some("역삼동".to_string());
        assert!(filter.build().matches(&p));
    }

    #[test]
    fn test_location_and_floor_filters() {
        let filter = PropertyFilter {
            sido: Some("서울특별시".to_string()),
            floors: vec!["1층".to_string(), "지하".to_string()],
            ..Default::default()
        };
        let mut p = listed("접수");
        assert!(!filter.build().matches(&p));
        p.floor = Some("지하".to_string());
        assert!(filter.build().matches(&p));
        p.sido = Some("부산광역시".to_string());
        assert!(!filter.build().matches(&p));
    }

    #[test]
    fn test_active_count() {
        let filter = PropertyFilter {
            area: Range::new(Some(10.0), None),
            rent: Range::new(None, Some(0.0)),
            keyword: Some("cafe".to_string()),
            sido: Some("서울특별시".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.active_count(), 4);
    }

    #[test]
    fn test_serde_uses_camel_case_and_skips_unset() {
        let filter = PropertyFilter {
            area: Range::new(Some(30.0), None),
            exclude_status: vec!["접수".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_value(&filter).unwrap();
        assert_eq!(json["area"]["min"], 30.0);
        assert!(json["area"].get("max").is_none());
        assert_eq!(json["excludeStatus"][0], "접수");
        assert!(json.get("floors").is_none());

        let back: PropertyFilter = serde_json::from_value(json).unwrap();
        assert_eq!(back, filter);
    }
}
