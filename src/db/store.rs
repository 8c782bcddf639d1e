// src/db/store.rs

//! Collection-oriented document store over SQLite.
//!
//! Every collection is a table of `(id, doc)` rows where `doc` is the JSON form
//! of a [`Document`]. Filters are typed predicates over top-level document
//! fields and compile to `json_extract` expressions with bound parameters.

use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

use crate::db::connection::Database;
use crate::errors::ServerError;

/// A record that lives in a named collection and carries its own domain id.
pub trait Document: Serialize + DeserializeOwned {
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
}

/// Scalar a predicate compares against.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Text(String),
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        FieldValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        FieldValue::Int(i64::from(v))
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<FieldValue> for SqlValue {
    fn from(v: FieldValue) -> Self {
        match v {
            FieldValue::Int(i) => SqlValue::Integer(i),
            FieldValue::Text(s) => SqlValue::Text(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq(&'static str, FieldValue),
    Gte(&'static str, FieldValue),
    Lte(&'static str, FieldValue),
    ContainsIgnoreCase(&'static str, String),
}

/// Conjunction of predicates. An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &'static str, value: impl Into<FieldValue>) -> Self {
        self.predicates.push(Predicate::Eq(field, value.into()));
        self
    }

    pub fn gte(mut self, field: &'static str, value: impl Into<FieldValue>) -> Self {
        self.predicates.push(Predicate::Gte(field, value.into()));
        self
    }

    pub fn lte(mut self, field: &'static str, value: impl Into<FieldValue>) -> Self {
        self.predicates.push(Predicate::Lte(field, value.into()));
        self
    }

    pub fn contains_ignore_case(mut self, field: &'static str, needle: impl Into<String>) -> Self {
        self.predicates
            .push(Predicate::ContainsIgnoreCase(field, needle.into()));
        self
    }

    /// `WHERE` clause (empty when there are no predicates) and its parameters.
    fn to_sql(&self) -> (String, Vec<SqlValue>) {
        if self.predicates.is_empty() {
            return (String::new(), Vec::new());
        }

        let mut clauses = Vec::with_capacity(self.predicates.len());
        let mut params = Vec::with_capacity(self.predicates.len());

        for p in &self.predicates {
            match p {
                Predicate::Eq(field, v) => {
                    clauses.push(format!("{} = ?", field_expr(field)));
                    params.push(v.clone().into());
                }
                Predicate::Gte(field, v) => {
                    clauses.push(format!("{} >= ?", field_expr(field)));
                    params.push(v.clone().into());
                }
                Predicate::Lte(field, v) => {
                    clauses.push(format!("{} <= ?", field_expr(field)));
                    params.push(v.clone().into());
                }
                Predicate::ContainsIgnoreCase(field, needle) => {
                    // ulower() is registered per connection and folds like to_lowercase.
                    clauses.push(format!("instr(ulower({}), ?) > 0", field_expr(field)));
                    params.push(SqlValue::Text(needle.to_lowercase()));
                }
            }
        }

        (format!(" WHERE {}", clauses.join(" AND ")), params)
    }
}

/// Result ordering for [`Collection::find_many`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sort {
    /// Insertion order.
    Natural,
    /// By a document field, largest first; ties fall back to newest insert.
    Desc(&'static str),
}

impl Sort {
    fn to_sql(self) -> String {
        match self {
            Sort::Natural => " ORDER BY rowid ASC".to_string(),
            Sort::Desc(field) => format!(" ORDER BY {} DESC, rowid DESC", field_expr(field)),
        }
    }
}

/// SQL expression for a top-level document field. Field names come from code,
/// never from request input.
fn field_expr(field: &'static str) -> String {
    debug_assert!(
        !field.is_empty() && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
        "invalid document field name: {field}"
    );
    if field == "id" {
        "id".to_string()
    } else {
        format!("json_extract(doc, '$.{field}')")
    }
}

/// Typed view of one collection.
pub struct Collection<'a, T> {
    db: &'a Database,
    _doc: PhantomData<fn() -> T>,
}

impl<'a, T: Document> Collection<'a, T> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            _doc: PhantomData,
        }
    }

    pub fn insert(&self, doc: &T) -> Result<(), ServerError> {
        let json = serde_json::to_string(doc)?;
        self.db.with_conn(|conn| {
            conn.execute(
                &format!("INSERT INTO {} (id, doc) VALUES (?, ?)", T::COLLECTION),
                rusqlite::params![doc.id(), json],
            )
            .map_err(|e| ServerError::Store(format!("insert into {} failed: {e}", T::COLLECTION)))?;
            Ok(())
        })
    }

    pub fn find_one(&self, filter: &Filter) -> Result<Option<T>, ServerError> {
        let (where_sql, params) = filter.to_sql();
        let sql = format!("SELECT doc FROM {}{} LIMIT 1", T::COLLECTION, where_sql);

        let raw: Option<String> = self.db.with_conn(|conn| {
            conn.query_row(&sql, params_from_iter(params), |row| row.get(0))
                .optional()
                .map_err(ServerError::from)
        })?;

        raw.map(|json| serde_json::from_str(&json).map_err(ServerError::from))
            .transpose()
    }

    /// Run a fresh query and feed each matching document to `sink` as rows are
    /// read. Stops at the first error returned by `sink`. The connection is
    /// held for the whole scan, so `sink` must not call back into the store.
    pub fn scan<F>(&self, filter: &Filter, sort: Sort, mut sink: F) -> Result<(), ServerError>
    where
        F: FnMut(T) -> Result<(), ServerError>,
    {
        let (where_sql, params) = filter.to_sql();
        let sql = format!(
            "SELECT doc FROM {}{}{}",
            T::COLLECTION,
            where_sql,
            sort.to_sql()
        );

        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(params))?;
            while let Some(row) = rows.next()? {
                let json: String = row.get(0)?;
                sink(serde_json::from_str(&json)?)?;
            }
            Ok(())
        })
    }

    pub fn find_many(&self, filter: &Filter, sort: Sort) -> Result<Vec<T>, ServerError> {
        let mut out = Vec::new();
        self.scan(filter, sort, |doc| {
            out.push(doc);
            Ok(())
        })?;
        Ok(out)
    }

    /// Merge `patch` (a JSON object) into the first matching document.
    /// Returns whether a document matched.
    pub fn update_one(
        &self,
        filter: &Filter,
        patch: &serde_json::Value,
    ) -> Result<bool, ServerError> {
        if !patch.is_object() {
            return Err(ServerError::Internal);
        }
        let (where_sql, params) = filter.to_sql();
        let sql = format!(
            "UPDATE {table} SET doc = json_patch(doc, ?)
             WHERE rowid = (SELECT rowid FROM {table}{where_sql} LIMIT 1)",
            table = T::COLLECTION,
        );

        let mut all = Vec::with_capacity(params.len() + 1);
        all.push(SqlValue::Text(patch.to_string()));
        all.extend(params);

        let changed = self
            .db
            .with_conn(|conn| conn.execute(&sql, params_from_iter(all)).map_err(ServerError::from))?;
        Ok(changed > 0)
    }

    /// Remove the first matching document. Returns whether one matched.
    pub fn delete_one(&self, filter: &Filter) -> Result<bool, ServerError> {
        let (where_sql, params) = filter.to_sql();
        let sql = format!(
            "DELETE FROM {table}
             WHERE rowid = (SELECT rowid FROM {table}{where_sql} LIMIT 1)",
            table = T::COLLECTION,
        );

        let changed = self
            .db
            .with_conn(|conn| conn.execute(&sql, params_from_iter(params)).map_err(ServerError::from))?;
        Ok(changed > 0)
    }

    pub fn count(&self, filter: &Filter) -> Result<i64, ServerError> {
        let (where_sql, params) = filter.to_sql();
        let sql = format!("SELECT COUNT(*) FROM {}{}", T::COLLECTION, where_sql);

        self.db.with_conn(|conn| {
            conn.query_row(&sql, params_from_iter(params), |row| row.get(0))
                .map_err(ServerError::from)
        })
    }
}
