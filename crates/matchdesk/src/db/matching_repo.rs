//! Matching repository: persistence for the `matchings` table.

use std::collections::HashMap;

use rusqlite::{params, Connection, Row};

use super::{property_repo, Database, DatabaseError};
use crate::model::{Matching, MatchingFlag, Property};

/// A matching row to be inserted.
#[derive(Debug, Clone)]
pub struct NewMatching {
    pub founder_id: i64,
    pub property_id: i64,
    pub matched_at: String,
    pub method: String,
    pub status: String,
}

fn from_row(row: &Row<'_>) -> Result<Matching, rusqlite::Error> {
    Ok(Matching {
        matching_id: row.get("matching_id")?,
        founder_id: row.get("founder_id")?,
        property_id: row.get("property_id")?,
        matched_at: row.get("matched_at")?,
        method: row.get("method")?,
        status: row.get("status")?,
        score: row.get("score")?,
        is_favorite: row.get("is_favorite")?,
        exclude_from_print: row.get("exclude_from_print")?,
    })
}

/// Inserts a matching unless the `(founder_id, property_id)` pair already
/// exists; an existing row is left untouched. Returns whether a row was added.
pub fn insert_or_ignore(conn: &Connection, row: &NewMatching) -> Result<bool, DatabaseError> {
    let changed = conn.execute(
        "INSERT INTO matchings (founder_id, property_id, matched_at, method, status, score,
         is_favorite, exclude_from_print)
         VALUES (?1, ?2, ?3, ?4, ?5, 0, 0, 0)
         ON CONFLICT(founder_id, property_id) DO NOTHING",
        params![
            row.founder_id,
            row.property_id,
            row.matched_at,
            row.method,
            row.status,
        ],
    )?;
    Ok(changed > 0)
}

/// Finds a matching by its ID.
pub fn find_by_id(db: &Database, id: i64) -> Result<Option<Matching>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM matchings WHERE matching_id = ?1")?;
        let mut rows = stmt.query_map(params![id], from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// Lists a founder's matchings, most recent first, each paired with every
/// property row the join produced for it.
pub fn list_by_founder(
    db: &Database,
    founder_id: i64,
) -> Result<Vec<(Matching, Vec<Property>)>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT * FROM matchings WHERE founder_id = ?1
             ORDER BY matched_at DESC, matching_id DESC",
        )?;
        let matchings = stmt
            .query_map(params![founder_id], from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut property_ids: Vec<i64> = matchings.iter().map(|m| m.property_id).collect();
        property_ids.sort_unstable();
        property_ids.dedup();

        let mut by_id: HashMap<i64, Vec<Property>> = HashMap::new();
        for property in property_repo::find_many(conn, &property_ids)? {
            by_id.entry(property.property_id).or_default().push(property);
        }

        Ok(matchings
            .into_iter()
            .map(|m| {
                let joined = by_id.get(&m.property_id).cloned().unwrap_or_default();
                (m, joined)
            })
            .collect())
    })
}

/// Deletes the matching for an exact pair. Returns the number of rows removed.
pub fn delete_pair(db: &Database, founder_id: i64, property_id: i64) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count = conn.execute(
            "DELETE FROM matchings WHERE founder_id = ?1 AND property_id = ?2",
            params![founder_id, property_id],
        )?;
        Ok(count as u64)
    })
}

/// Flips a boolean flag in one statement and returns the new value, or
/// `None` when no matching has that id. NULL is read as false.
pub fn toggle_flag(
    db: &Database,
    matching_id: i64,
    flag: MatchingFlag,
) -> Result<Option<bool>, DatabaseError> {
    db.with_conn(|conn| {
        let column = flag.column();
        let sql = format!(
            "UPDATE matchings SET {col} = CASE WHEN COALESCE({col}, 0) = 0 THEN 1 ELSE 0 END
             WHERE matching_id = ?1
             RETURNING {col}",
            col = column
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![matching_id], |r| r.get::<_, bool>(0))?;
        match rows.next() {
            Some(Ok(value)) => Ok(Some(value)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// Updates only the status of a matching.
pub fn update_status(db: &Database, matching_id: i64, status: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE matchings SET status = ?2 WHERE matching_id = ?1",
            params![matching_id, status],
        )?;
        Ok(changed > 0)
    })
}

/// Counts matchings for a founder.
pub fn count_by_founder(db: &Database, founder_id: i64) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM matchings WHERE founder_id = ?1",
            params![founder_id],
            |r| r.get(0),
        )?;
        Ok(count)
    })
}
