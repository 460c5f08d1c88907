//! Composable property predicates.
//!
//! A [`Predicate`] is a conjunction of [`Clause`]s. It can be rendered to a
//! parameterised SQLite `WHERE` fragment or evaluated directly against a
//! [`Property`]; both paths agree on NULL handling and on ASCII-only case
//! folding.

use rusqlite::types::Value;

use crate::model::Property;

/// Property columns that clauses may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    PropertyId,
    PropertyCode,
    ReceivedAt,
    Sido,
    Sigungu,
    Beopjeongdong,
    Jibun,
    StoreName,
    BusinessType,
    Status,
    Floor,
    Area,
    Deposit,
    Rent,
    Premium,
    Notes,
}

/// Borrowed view of a property field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Number(Option<f64>),
    Text(Option<&'a str>),
}

impl Column {
    pub fn name(&self) -> &'static str {
        match self {
            Column::PropertyId => "property_id",
            Column::PropertyCode => "property_code",
            Column::ReceivedAt => "received_at",
            Column::Sido => "sido",
            Column::Sigungu => "sigungu",
            Column::Beopjeongdong => "beopjeongdong",
            Column::Jibun => "jibun",
            Column::StoreName => "store_name",
            Column::BusinessType => "business_type",
            Column::Status => "status",
            Column::Floor => "floor",
            Column::Area => "area",
            Column::Deposit => "deposit",
            Column::Rent => "rent",
            Column::Premium => "premium",
            Column::Notes => "notes",
        }
    }

    pub fn value<'a>(&self, property: &'a Property) -> FieldValue<'a> {
        match self {
            Column::PropertyId => FieldValue::Number(Some(property.property_id as f64)),
            Column::PropertyCode => FieldValue::Text(property.property_code.as_deref()),
            Column::ReceivedAt => FieldValue::Text(property.received_at.as_deref()),
            Column::Sido => FieldValue::Text(property.sido.as_deref()),
            Column::Sigungu => FieldValue::Text(property.sigungu.as_deref()),
            Column::Beopjeongdong => FieldValue::Text(property.beopjeongdong.as_deref()),
            Column::Jibun => FieldValue::Text(property.jibun.as_deref()),
            Column::StoreName => FieldValue::Text(property.store_name.as_deref()),
            Column::BusinessType => FieldValue::Text(property.business_type.as_deref()),
            Column::Status => FieldValue::Text(property.status.as_deref()),
            Column::Floor => FieldValue::Text(property.floor.as_deref()),
            Column::Area => FieldValue::Number(property.area),
            Column::Deposit => FieldValue::Number(property.deposit),
            Column::Rent => FieldValue::Number(property.rent),
            Column::Premium => FieldValue::Number(property.premium),
            Column::Notes => FieldValue::Text(property.notes.as_deref()),
        }
    }

    fn text<'a>(&self, property: &'a Property) -> Option<&'a str> {
        match self.value(property) {
            FieldValue::Text(v) => v,
            FieldValue::Number(_) => None,
        }
    }

    fn number(&self, property: &Property) -> Option<f64> {
        match self.value(property) {
            FieldValue::Number(v) => v,
            FieldValue::Text(_) => None,
        }
    }
}

/// A single condition on a property row.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Text column equals the value.
    Eq(Column, String),
    /// Numeric column is `>=` the bound.
    Gte(Column, f64),
    /// Numeric column is `<=` the bound.
    Lte(Column, f64),
    /// Text column is one of the values.
    In(Column, Vec<String>),
    /// Text column is none of the values. A NULL column fails, as in SQL.
    NotIn(Column, Vec<String>),
    /// At least one column contains the needle, ignoring case.
    AnyContains(Vec<Column>, String),
}

impl Clause {
    pub fn matches(&self, property: &Property) -> bool {
        match self {
            Clause::Eq(col, expected) => col.text(property) == Some(expected.as_str()),
            Clause::Gte(col, bound) => col.number(property).is_some_and(|v| v >= *bound),
            Clause::Lte(col, bound) => col.number(property).is_some_and(|v| v <= *bound),
            Clause::In(col, values) => col
                .text(property)
                .is_some_and(|v| values.iter().any(|candidate| candidate == v)),
            Clause::NotIn(col, values) => col
                .text(property)
                .is_some_and(|v| !values.iter().any(|candidate| candidate == v)),
            Clause::AnyContains(cols, needle) => {
                let needle = needle.to_ascii_lowercase();
                cols.iter().any(|col| {
                    col.text(property)
                        .is_some_and(|v| v.to_ascii_lowercase().contains(&needle))
                })
            }
        }
    }

    fn render(&self, params: &mut Vec<Value>) -> String {
        match self {
            Clause::Eq(col, value) => {
                params.push(Value::Text(value.clone()));
                format!("{} = ?", col.name())
            }
            Clause::Gte(col, bound) => {
                params.push(Value::Real(*bound));
                format!("{} >= ?", col.name())
            }
            Clause::Lte(col, bound) => {
                params.push(Value::Real(*bound));
                format!("{} <= ?", col.name())
            }
            Clause::In(col, values) => {
                if values.is_empty() {
                    return "0".to_string();
                }
                params.extend(values.iter().cloned().map(Value::Text));
                format!("{} IN ({})", col.name(), placeholders(values.len()))
            }
            Clause::NotIn(col, values) => {
                if values.is_empty() {
                    return format!("{} IS NOT NULL", col.name());
                }
                params.extend(values.iter().cloned().map(Value::Text));
                format!("{} NOT IN ({})", col.name(), placeholders(values.len()))
            }
            Clause::AnyContains(cols, needle) => {
                if cols.is_empty() {
                    return "0".to_string();
                }
                let pattern = format!("%{}%", escape_like(&needle.to_ascii_lowercase()));
                let parts: Vec<String> = cols
                    .iter()
                    .map(|col| {
                        params.push(Value::Text(pattern.clone()));
                        format!("LOWER({}) LIKE ? ESCAPE '\\'", col.name())
                    })
                    .collect();
                format!("({})", parts.join(" OR "))
            }
        }
    }
}

/// A rendered `WHERE` clause and its positional parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFragment {
    /// Either empty or starts with `WHERE `.
    pub sql: String,
    pub params: Vec<Value>,
}

/// Conjunction of clauses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn push(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// True when every clause holds for the property.
    pub fn matches(&self, property: &Property) -> bool {
        self.clauses.iter().all(|c| c.matches(property))
    }

    pub fn to_sql(&self) -> SqlFragment {
        if self.clauses.is_empty() {
            return SqlFragment::default();
        }
        let mut params = Vec::new();
        let parts: Vec<String> = self
            .clauses
            .iter()
            .map(|c| c.render(&mut params))
            .collect();
        SqlFragment {
            sql: format!("WHERE {}", parts.join(" AND ")),
            params,
        }
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Escapes LIKE wildcards so the needle is matched literally.
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
