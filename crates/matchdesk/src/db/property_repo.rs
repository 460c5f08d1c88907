//! Property repository: CRUD and predicate queries for the `properties` table.

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

use super::{now_timestamp, Database, DatabaseError};
use crate::filter::{Column, Predicate};
use crate::model::{Property, AVAILABLE_STATUS};

/// Single-column sort. Ties are broken by `property_id ASC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: Column,
    pub asc: bool,
}

impl SortOrder {
    pub fn new(column: Column, asc: bool) -> Self {
        Self { column, asc }
    }

    fn to_sql(self) -> String {
        let direction = if self.asc { "ASC" } else { "DESC" };
        if self.column == Column::PropertyId {
            format!("ORDER BY property_id {}", direction)
        } else {
            format!(
                "ORDER BY {} {}, property_id ASC",
                self.column.name(),
                direction
            )
        }
    }
}

pub(crate) fn from_row(row: &Row<'_>) -> Result<Property, rusqlite::Error> {
    Ok(Property {
        property_id: row.get("property_id")?,
        property_code: row.get("property_code")?,
        received_at: row.get("received_at")?,
        sido: row.get("sido")?,
        sigungu: row.get("sigungu")?,
        beopjeongdong: row.get("beopjeongdong")?,
        jibun: row.get("jibun")?,
        store_name: row.get("store_name")?,
        business_type: row.get("business_type")?,
        status: row.get("status")?,
        floor: row.get("floor")?,
        area: row.get("area")?,
        deposit: row.get("deposit")?,
        rent: row.get("rent")?,
        premium: row.get("premium")?,
        maintenance_fee: row.get("maintenance_fee")?,
        notes: row.get("notes")?,
    })
}

/// Inserts a property and returns its new id. `property_id` is ignored;
/// `received_at` defaults to now and `status` to `available`.
pub fn insert(db: &Database, property: &Property) -> Result<i64, DatabaseError> {
    db.with_conn(|conn| {
        let received_at = property
            .received_at
            .clone()
            .unwrap_or_else(now_timestamp);
        let status = property
            .status
            .clone()
            .unwrap_or_else(|| AVAILABLE_STATUS.to_string());
        conn.execute(
            "INSERT INTO properties (property_code, received_at, sido, sigungu, beopjeongdong,
             jibun, store_name, business_type, status, floor, area, deposit, rent, premium,
             maintenance_fee, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                property.property_code,
                received_at,
                property.sido,
                property.sigungu,
                property.beopjeongdong,
                property.jibun,
                property.store_name,
                property.business_type,
                status,
                property.floor,
                property.area,
                property.deposit,
                property.rent,
                property.premium,
                property.maintenance_fee,
                property.notes,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Overwrites every column of an existing property. Returns whether a row
/// was updated.
pub fn update(db: &Database, property: &Property) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE properties SET property_code=?2, received_at=?3, sido=?4, sigungu=?5,
             beopjeongdong=?6, jibun=?7, store_name=?8, business_type=?9, status=?10,
             floor=?11, area=?12, deposit=?13, rent=?14, premium=?15, maintenance_fee=?16,
             notes=?17
             WHERE property_id=?1",
            params![
                property.property_id,
                property.property_code,
                property.received_at,
                property.sido,
                property.sigungu,
                property.beopjeongdong,
                property.jibun,
                property.store_name,
                property.business_type,
                property.status,
                property.floor,
                property.area,
                property.deposit,
                property.rent,
                property.premium,
                property.maintenance_fee,
                property.notes,
            ],
        )?;
        Ok(changed > 0)
    })
}

/// Updates only the status of a property.
pub fn update_status(db: &Database, id: i64, status: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE properties SET status = ?2 WHERE property_id = ?1",
            params![id, status],
        )?;
        Ok(changed > 0)
    })
}

/// Deletes a property. Matchings referencing it are removed by cascade.
pub fn delete(db: &Database, id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute("DELETE FROM properties WHERE property_id = ?1", params![id])?;
        Ok(changed > 0)
    })
}

/// Finds a property by its ID.
pub fn find_by_id(db: &Database, id: i64) -> Result<Option<Property>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM properties WHERE property_id = ?1")?;
        let mut rows = stmt.query_map(params![id], from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// Loads every property whose id is in `ids`, in id order.
pub(crate) fn find_many(conn: &Connection, ids: &[i64]) -> Result<Vec<Property>, DatabaseError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "SELECT * FROM properties WHERE property_id IN ({}) ORDER BY property_id",
        placeholders
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(ids.iter()), from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Queries one page of properties, returning (rows, total_count).
pub fn query(
    db: &Database,
    predicate: &Predicate,
    sort: SortOrder,
    limit: u64,
    offset: u64,
) -> Result<(Vec<Property>, u64), DatabaseError> {
    db.with_conn(|conn| {
        let fragment = predicate.to_sql();

        let count_sql = format!("SELECT COUNT(*) FROM properties {}", fragment.sql);
        let total: u64 =
            conn.query_row(&count_sql, params_from_iter(fragment.params.iter()), |r| {
                r.get(0)
            })?;

        let mut param_values = fragment.params;
        param_values.push(Value::Integer(DatabaseError::sql_int("limit", limit)?));
        param_values.push(Value::Integer(DatabaseError::sql_int("offset", offset)?));
        let query_sql = format!(
            "SELECT * FROM properties {} {} LIMIT ? OFFSET ?",
            fragment.sql,
            sort.to_sql()
        );

        let mut stmt = conn.prepare(&query_sql)?;
        let rows = stmt
            .query_map(params_from_iter(param_values.iter()), from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok((rows, total))
    })
}

/// Returns every property matching the predicate.
pub fn select(
    db: &Database,
    predicate: &Predicate,
    sort: SortOrder,
) -> Result<Vec<Property>, DatabaseError> {
    db.with_conn(|conn| {
        let fragment = predicate.to_sql();
        let sql = format!("SELECT * FROM properties {} {}", fragment.sql, sort.to_sql());
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(fragment.params.iter()), from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Returns the ids of matching properties in ascending order, optionally capped.
pub fn select_ids(
    db: &Database,
    predicate: &Predicate,
    limit: Option<u64>,
) -> Result<Vec<i64>, DatabaseError> {
    db.with_conn(|conn| {
        let fragment = predicate.to_sql();
        let mut param_values = fragment.params;
        let limit_sql = match limit {
            Some(limit) => {
                param_values.push(Value::Integer(DatabaseError::sql_int("limit", limit)?));
                "LIMIT ?"
            }
            None => "",
        };
        let sql = format!(
            "SELECT property_id FROM properties {} ORDER BY property_id ASC {}",
            fragment.sql, limit_sql
        );
        let mut stmt = conn.prepare(&sql)?;
        let ids = stmt
            .query_map(params_from_iter(param_values.iter()), |r| r.get::<_, i64>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{Clause, PropertyFilter, Range};

    fn test_db() -> Database {
        Database::open_in_memory().expect("Failed to create test database")
    }

    fn sample(name: &str, status: &str, area: f64) -> Property {
        Property {
            store_name: Some(name.to_string()),
            status: Some(status.to_string()),
            area: Some(area),
            received_at: Some("2026-01-01T00:00:00.000000Z".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_and_find() {
        let db = test_db();
        let id = insert(&db, &sample("Alpha", "접수", 33.0)).unwrap();

        let found = find_by_id(&db, id).unwrap().unwrap();
        assert_eq!(found.property_id, id);
        assert_eq!(found.store_name.as_deref(), Some("Alpha"));
        assert_eq!(found.area, Some(33.0));
    }

    #[test]
    fn test_insert_defaults() {
        let db = test_db();
        let id = insert(&db, &Property::default()).unwrap();
        let found = find_by_id(&db, id).unwrap().unwrap();
        assert_eq!(found.status.as_deref(), Some(AVAILABLE_STATUS));
        assert!(found.received_at.is_some());
    }

    #[test]
    fn test_find_nonexistent() {
        let db = test_db();
        assert!(find_by_id(&db, 404).unwrap().is_none());
    }

    #[test]
    fn test_update_and_update_status() {
        let db = test_db();
        let id = insert(&db, &sample("Alpha", "접수", 33.0)).unwrap();
        let mut property = find_by_id(&db, id).unwrap().unwrap();
        property.rent = Some(150.0);
        assert!(update(&db, &property).unwrap());
        assert!(update_status(&db, id, "진행중").unwrap());

        let found = find_by_id(&db, id).unwrap().unwrap();
        assert_eq!(found.rent, Some(150.0));
        assert_eq!(found.status.as_deref(), Some("진행중"));
        assert!(!update_status(&db, 999, "진행중").unwrap());
    }

    #[test]
    fn test_delete() {
        let db = test_db();
        let id = insert(&db, &sample("Alpha", "접수", 33.0)).unwrap();
        assert!(delete(&db, id).unwrap());
        assert!(!delete(&db, id).unwrap());
        assert!(find_by_id(&db, id).unwrap().is_none());
    }

    #[test]
    fn test_query_applies_predicate_and_counts() {
        let db = test_db();
        insert(&db, &sample("Alpha", "접수", 30.0)).unwrap();
        insert(&db, &sample("Beta", "계약완료", 40.0)).unwrap();
        insert(&db, &sample("Gamma", "진행중", 50.0)).unwrap();

        let filter = PropertyFilter {
            area: Range::new(Some(35.0), None),
            ..Default::default()
        };
        let (rows, total) = query(
            &db,
            &filter.build(),
            SortOrder::new(Column::Area, true),
            10,
            0,
        )
        .unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].store_name.as_deref(), Some("Gamma"));
    }

    #[test]
    fn test_sort_ties_break_on_id() {
        let db = test_db();
        let a = insert(&db, &sample("A", "접수", 10.0)).unwrap();
        let b = insert(&db, &sample("B", "접수", 10.0)).unwrap();
        let c = insert(&db, &sample("C", "접수", 20.0)).unwrap();

        let rows = select(&db, &Predicate::new(), SortOrder::new(Column::Area, false)).unwrap();
        let ids: Vec<i64> = rows.iter().map(|p| p.property_id).collect();
        assert_eq!(ids, vec![c, a, b]);
    }

    #[test]
    fn test_sql_and_memory_evaluation_agree() {
        let db = test_db();
        let mut rows = vec![
            sample("Alpha Cafe", "접수", 30.0),
            sample("beta CAFE", "진행보류", 45.0),
            sample("Gamma", "진행중", 50.0),
            sample("Null cafe", "x", 25.0),
        ];
        rows[2].notes = Some("near the cafe street".to_string());
        for row in &rows {
            insert(&db, row).unwrap();
        }
        db.with_conn(|conn| {
            conn.execute("UPDATE properties SET status = NULL WHERE store_name = 'Null cafe'", [])?;
            Ok(())
        })
        .unwrap();

        let predicate = PropertyFilter {
            keyword: Some("Cafe".to_string()),
            area: Range::new(Some(20.0), Some(60.0)),
            ..Default::default()
        }
        .build();
        let from_sql = select(&db, &predicate, SortOrder::new(Column::PropertyId, true)).unwrap();
        let all = select(&db, &Predicate::new(), SortOrder::new(Column::PropertyId, true)).unwrap();
        let in_memory: Vec<Property> = all.into_iter().filter(|p| predicate.matches(p)).collect();
        assert_eq!(from_sql, in_memory);
        assert_eq!(from_sql.len(), 2);

        let null_status = Predicate::new().and(Clause::NotIn(Column::Status, vec!["접수".into()]));
        let names: Vec<_> = select(&db, &null_status, SortOrder::new(Column::PropertyId, true))
            .unwrap()
            .into_iter()
            .filter_map(|p| p.store_name)
            .collect();
        assert_eq!(names, vec!["beta CAFE", "Gamma"]);
    }

    #[test]
    fn test_select_ids_limit() {
        let db = test_db();
        for i in 0..5 {
            insert(&db, &sample(&format!("p{}", i), "available", 10.0)).unwrap();
        }
        let ids = select_ids(&db, &Predicate::new(), Some(3)).unwrap();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(select_ids(&db, &Predicate::new(), None).unwrap().len(), 5);
        assert_eq!(
            select_ids(&db, &Predicate::new(), Some(i64::MAX as u64)).unwrap().len(),
            5
        );
        assert!(matches!(
            select_ids(&db, &Predicate::new(), Some(u64::MAX)),
            Err(DatabaseError::OutOfRange { name: "limit", .. })
        ));
    }

    #[test]
    fn test_query_rejects_unrepresentable_offset() {
        let db = test_db();
        insert(&db, &sample("Alpha", "접수", 30.0)).unwrap();
        let result = query(
            &db,
            &Predicate::new(),
            SortOrder::new(Column::PropertyId, true),
            20,
            u64::MAX,
        );
        assert!(matches!(
            result,
            Err(DatabaseError::OutOfRange { name: "offset", .. })
        ));
    }
}
