//! SQLite-backed document store.
//!
//! # Responsibility
//! - Persist documents as JSON bodies in the `documents` table.
//! - Compile `Query` values into `json_extract` predicates and ordering.
//!
//! # Invariants
//! - Field paths and values are always bound, never spliced into SQL.
//! - Filters are type-strict via `json_type`, matching `MemoryDocumentStore`.
//! - Rows with a non-object body are rejected instead of skipped.

use super::query::{Filter, Query};
use super::{
    merge_fields, Document, DocumentId, DocumentStore, StoreError, StoreResult, StoredDocument,
};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, Row};
use serde_json::Value;

/// Document store over an opened (and migrated) SQLite connection.
pub struct SqliteDocumentStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDocumentStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn read_body(&self, collection: &str, id: &DocumentId) -> StoreResult<Option<Document>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, body FROM documents
             WHERE collection = ?1 AND id = ?2;",
        )?;
        let mut rows = stmt.query(params![collection, id.as_str()])?;
        let fields = match rows.next()? {
            Some(row) => Some(parse_document_row(row)?.fields),
            None => None,
        };
        Ok(fields)
    }
}

impl DocumentStore for SqliteDocumentStore<'_> {
    fn insert(&self, collection: &str, fields: &Document) -> StoreResult<DocumentId> {
        let id = DocumentId::generate();
        let body = serde_json::to_string(fields)?;
        self.conn.execute(
            "INSERT INTO documents (collection, id, body) VALUES (?1, ?2, ?3);",
            params![collection, id.as_str(), body],
        )?;
        Ok(id)
    }

    fn get(&self, collection: &str, id: &DocumentId) -> StoreResult<Option<StoredDocument>> {
        Ok(self
            .read_body(collection, id)?
            .map(|fields| StoredDocument {
                id: id.clone(),
                fields,
            }))
    }

    fn query(&self, collection: &str, query: &Query) -> StoreResult<Vec<StoredDocument>> {
        query.validate().map_err(StoreError::InvalidQuery)?;

        let mut sql = String::from("SELECT id, body FROM documents WHERE collection = ?");
        let mut bind_values = vec![SqlValue::Text(collection.to_string())];

        for filter in &query.filters {
            push_filter(&mut sql, &mut bind_values, filter)?;
        }

        match &query.order_by {
            Some(order) => {
                let path = field_path(&order.field);
                sql.push_str(" AND json_type(body, ?) IS NOT NULL");
                bind_values.push(SqlValue::Text(path.clone()));
                sql.push_str(&format!(
                    " ORDER BY json_extract(body, ?) {}, id ASC",
                    order.direction.as_sql()
                ));
                bind_values.push(SqlValue::Text(path));
            }
            None => sql.push_str(" ORDER BY id ASC"),
        }

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(SqlValue::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut documents = Vec::new();
        while let Some(row) = rows.next()? {
            documents.push(parse_document_row(row)?);
        }
        Ok(documents)
    }

    fn update(&self, collection: &str, id: &DocumentId, changes: &Document) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let mut fields = self
            .read_body(collection, id)?
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.clone(),
            })?;
        merge_fields(&mut fields, changes);
        let body = serde_json::to_string(&fields)?;
        tx.execute(
            "UPDATE documents SET body = ?3 WHERE collection = ?1 AND id = ?2;",
            params![collection, id.as_str(), body],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn delete(&self, collection: &str, id: &DocumentId) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND id = ?2;",
            params![collection, id.as_str()],
        )?;
        Ok(changed > 0)
    }

    fn delete_all(&self, collection: &str) -> StoreResult<usize> {
        let changed = self.conn.execute(
            "DELETE FROM documents WHERE collection = ?1;",
            [collection],
        )?;
        Ok(changed)
    }
}

fn field_path(field: &str) -> String {
    format!("$.\"{field}\"")
}

fn push_filter(
    sql: &mut String,
    bind_values: &mut Vec<SqlValue>,
    filter: &Filter,
) -> StoreResult<()> {
    let path = field_path(&filter.field);
    match &filter.value {
        Value::Null => {
            sql.push_str(" AND json_type(body, ?) = 'null'");
            bind_values.push(SqlValue::Text(path));
        }
        Value::Bool(flag) => {
            sql.push_str(" AND json_type(body, ?) = ?");
            bind_values.push(SqlValue::Text(path));
            bind_values.push(SqlValue::Text(flag.to_string()));
        }
        Value::Number(number) => {
            sql.push_str(
                " AND json_type(body, ?) IN ('integer', 'real') AND json_extract(body, ?) = ?",
            );
            bind_values.push(SqlValue::Text(path.clone()));
            bind_values.push(SqlValue::Text(path));
            let bound = match number.as_i64() {
                Some(value) => SqlValue::Integer(value),
                None => SqlValue::Real(number.as_f64().unwrap_or(f64::NAN)),
            };
            bind_values.push(bound);
        }
        Value::String(text) => {
            sql.push_str(" AND json_type(body, ?) = 'text' AND json_extract(body, ?) = ?");
            bind_values.push(SqlValue::Text(path.clone()));
            bind_values.push(SqlValue::Text(path));
            bind_values.push(SqlValue::Text(text.clone()));
        }
        Value::Array(_) | Value::Object(_) => {
            let json_type = if filter.value.is_array() {
                "array"
            } else {
                "object"
            };
            sql.push_str(" AND json_type(body, ?) = ? AND json_extract(body, ?) = json(?)");
            bind_values.push(SqlValue::Text(path.clone()));
            bind_values.push(SqlValue::Text(json_type.to_string()));
            bind_values.push(SqlValue::Text(path));
            bind_values.push(SqlValue::Text(serde_json::to_string(&filter.value)?));
        }
    }
    Ok(())
}

fn parse_document_row(row: &Row<'_>) -> StoreResult<StoredDocument> {
    let id: String = row.get("id")?;
    let body: String = row.get("body")?;
    match serde_json::from_str::<Value>(&body)? {
        Value::Object(fields) => Ok(StoredDocument {
            id: DocumentId::from(id),
            fields,
        }),
        other => Err(StoreError::InvalidData(format!(
            "document `{id}` body is not an object (found `{}`)",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
