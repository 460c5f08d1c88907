//! Founder repository: CRUD and search for the `founders` table.

use std::collections::HashMap;

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Row};

use super::{now_timestamp, Database, DatabaseError};
use crate::model::Founder;

fn from_row(row: &Row<'_>) -> Result<Founder, rusqlite::Error> {
    Ok(Founder {
        founder_id: row.get("founder_id")?,
        name: row.get("name")?,
        contact: row.get("contact")?,
        area: row.get("area")?,
        deposit: row.get("deposit")?,
        rent: row.get("rent")?,
        premium: row.get("premium")?,
        business_type: row.get("business_type")?,
        preferred_property: row.get("preferred_property")?,
        status: row.get("status")?,
        category: row.get("category")?,
        floor: row.get("floor")?,
        note: row.get("note")?,
        received_at: row.get("received_at")?,
    })
}

/// Query filter parameters for founder listing.
#[derive(Debug, Default, Clone)]
pub struct FounderFilter {
    pub status: Option<String>,
    /// Substring over name, contact and note.
    pub keyword: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Inserts a founder and returns its new id. `received_at` defaults to now.
pub fn insert(db: &Database, founder: &Founder) -> Result<i64, DatabaseError> {
    db.with_conn(|conn| {
        let received_at = founder.received_at.clone().unwrap_or_else(now_timestamp);
        conn.execute(
            "INSERT INTO founders (name, contact, area, deposit, rent, premium, business_type,
             preferred_property, status, category, floor, note, received_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                founder.name,
                founder.contact,
                founder.area,
                founder.deposit,
                founder.rent,
                founder.premium,
                founder.business_type,
                founder.preferred_property,
                founder.status,
                founder.category,
                founder.floor,
                founder.note,
                received_at,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Overwrites every column of an existing founder.
pub fn update(db: &Database, founder: &Founder) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE founders SET name=?2, contact=?3, area=?4, deposit=?5, rent=?6, premium=?7,
             business_type=?8, preferred_property=?9, status=?10, category=?11, floor=?12,
             note=?13, received_at=?14
             WHERE founder_id=?1",
            params![
                founder.founder_id,
                founder.name,
                founder.contact,
                founder.area,
                founder.deposit,
                founder.rent,
                founder.premium,
                founder.business_type,
                founder.preferred_property,
                founder.status,
                founder.category,
                founder.floor,
                founder.note,
                founder.received_at,
            ],
        )?;
        Ok(changed > 0)
    })
}

/// Deletes a founder together with their matchings.
pub fn delete(db: &Database, id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute("DELETE FROM founders WHERE founder_id = ?1", params![id])?;
        Ok(changed > 0)
    })
}

/// Finds a founder by its ID.
pub fn find_by_id(db: &Database, id: i64) -> Result<Option<Founder>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM founders WHERE founder_id = ?1")?;
        let mut rows = stmt.query_map(params![id], from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// Loads founders for `ids`, keeping the order of `ids` and skipping ids
/// without a row.
pub fn find_many_ordered(db: &Database, ids: &[i64]) -> Result<Vec<Founder>, DatabaseError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    db.with_conn(|conn| {
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT * FROM founders WHERE founder_id IN ({})",
            placeholders
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut by_id: HashMap<i64, Founder> = stmt
            .query_map(params_from_iter(ids.iter()), from_row)?
            .map(|r| r.map(|f| (f.founder_id, f)))
            .collect::<Result<_, _>>()?;

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    })
}

/// Searches founders by name, contact or business type, newest first.
pub fn search(db: &Database, term: &str, limit: u64) -> Result<Vec<Founder>, DatabaseError> {
    let term = term.trim();
    if term.is_empty() {
        return Ok(Vec::new());
    }

    let limit = DatabaseError::sql_int("limit", limit)?;
    db.with_conn(|conn| {
        let pattern = like_pattern(term);
        let mut stmt = conn.prepare(
            "SELECT * FROM founders
             WHERE LOWER(name) LIKE ?1 ESCAPE '\\'
                OR LOWER(contact) LIKE ?1 ESCAPE '\\'
                OR LOWER(business_type) LIKE ?1 ESCAPE '\\'
             ORDER BY received_at DESC, founder_id DESC
             LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![pattern, limit], from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Lists founders with filters, newest id first, returning (rows, total_count).
pub fn list(db: &Database, filter: &FounderFilter) -> Result<(Vec<Founder>, u64), DatabaseError> {
    db.with_conn(|conn| {
        let mut conditions = Vec::new();
        let mut param_values: Vec<Value> = Vec::new();

        if let Some(status) = filter.status.as_deref().filter(|s| !s.is_empty()) {
            conditions.push("status = ?".to_string());
            param_values.push(Value::Text(status.to_string()));
        }
        if let Some(keyword) = filter.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            let pattern = like_pattern(keyword);
            conditions.push(
                "(LOWER(name) LIKE ? ESCAPE '\\' OR LOWER(contact) LIKE ? ESCAPE '\\' \
                 OR LOWER(note) LIKE ? ESCAPE '\\')"
                    .to_string(),
            );
            for _ in 0..3 {
                param_values.push(Value::Text(pattern.clone()));
            }
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM founders {}", where_clause);
        let total: u64 =
            conn.query_row(&count_sql, params_from_iter(param_values.iter()), |r| r.get(0))?;

        let mut query_sql = format!(
            "SELECT * FROM founders {} ORDER BY founder_id DESC",
            where_clause
        );
        if let Some(limit) = filter.limit {
            query_sql.push_str(" LIMIT ? OFFSET ?");
            param_values.push(Value::Integer(DatabaseError::sql_int("limit", limit)?));
            param_values.push(Value::Integer(DatabaseError::sql_int(
                "offset",
                filter.offset.unwrap_or(0),
            )?));
        }

        let mut stmt = conn.prepare(&query_sql)?;
        let rows = stmt
            .query_map(params_from_iter(param_values.iter()), from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok((rows, total))
    })
}

fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.to_ascii_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
