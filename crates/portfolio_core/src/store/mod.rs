//! Document store abstraction and backends.
//!
//! # Responsibility
//! - Define the flat-collection document contract used by services.
//! - Provide a SQLite-backed store and an in-memory test double with the
//!   same query semantics.
//!
//! # Invariants
//! - Document identifiers are assigned by the store and never reused.
//! - The identifier is not part of the stored body.
//! - `update` is a shallow merge: top-level keys in `changes` replace the
//!   stored value whole (arrays included).
//! - Store APIs report a missing document on `update` as `NotFound`, never
//!   as a transport failure.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod memory_store;
pub mod query;
pub mod sqlite_store;

pub use memory_store::MemoryDocumentStore;
pub use query::{Filter, OrderBy, OrderDirection, Query};
pub use sqlite_store::SqliteDocumentStore;

/// Field/value map stored for one document.
pub type Document = Map<String, Value>;

pub type StoreResult<T> = Result<T, StoreError>;

/// Opaque store-assigned document identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Generates a fresh identifier for a new document.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One document as returned by a store read.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub fields: Document,
}

/// Store-level error for document persistence and queries.
#[derive(Debug)]
pub enum StoreError {
    /// SQLite transport failure.
    Sqlite(rusqlite::Error),
    /// The database was migrated by a newer build than this one.
    SchemaTooNew { found: u32, supported: u32 },
    /// Body could not be encoded or decoded as JSON.
    Serialization(serde_json::Error),
    /// Persisted body does not have the expected shape.
    InvalidData(String),
    /// Query uses a field name the store cannot address.
    InvalidQuery(String),
    /// Target document does not exist.
    NotFound { collection: String, id: DocumentId },
    /// Backend refused the call (offline, quota, injected fault).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "documents schema version {found} is newer than supported {supported}"
            ),
            Self::Serialization(err) => write!(f, "document serialization failed: {err}"),
            Self::InvalidData(message) => write!(f, "invalid stored document: {message}"),
            Self::InvalidQuery(message) => write!(f, "invalid document query: {message}"),
            Self::NotFound { collection, id } => {
                write!(f, "document not found: {collection}/{id}")
            }
            Self::Unavailable(message) => write!(f, "document store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Flat-collection document store contract.
///
/// Collections are created implicitly on first insert.
pub trait DocumentStore {
    /// Inserts a new document and returns its assigned identifier.
    fn insert(&self, collection: &str, fields: &Document) -> StoreResult<DocumentId>;

    /// Reads one document; `Ok(None)` when it does not exist.
    fn get(&self, collection: &str, id: &DocumentId) -> StoreResult<Option<StoredDocument>>;

    /// Runs an equality/order/limit query over one collection.
    fn query(&self, collection: &str, query: &Query) -> StoreResult<Vec<StoredDocument>>;

    /// Shallow-merges `changes` into an existing document.
    fn update(&self, collection: &str, id: &DocumentId, changes: &Document) -> StoreResult<()>;

    /// Deletes one document. Returns whether a document was removed.
    fn delete(&self, collection: &str, id: &DocumentId) -> StoreResult<bool>;

    /// Deletes every document in a collection and returns how many were removed.
    fn delete_all(&self, collection: &str) -> StoreResult<usize>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for &S {
    fn insert(&self, collection: &str, fields: &Document) -> StoreResult<DocumentId> {
        (**self).insert(collection, fields)
    }

    fn get(&self, collection: &str, id: &DocumentId) -> StoreResult<Option<StoredDocument>> {
        (**self).get(collection, id)
    }

    fn query(&self, collection: &str, query: &Query) -> StoreResult<Vec<StoredDocument>> {
        (**self).query(collection, query)
    }

    fn update(&self, collection: &str, id: &DocumentId, changes: &Document) -> StoreResult<()> {
        (**self).update(collection, id, changes)
    }

    fn delete(&self, collection: &str, id: &DocumentId) -> StoreResult<bool> {
        (**self).delete(collection, id)
    }

    fn delete_all(&self, collection: &str) -> StoreResult<usize> {
        (**self).delete_all(collection)
    }
}

/// Applies a shallow merge of `changes` onto `target`.
pub(crate) fn merge_fields(target: &mut Document, changes: &Document) {
    for (key, value) in changes {
        target.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::{merge_fields, Document, DocumentId};
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().expect("object literal")
    }

    #[test]
    fn merge_replaces_arrays_whole_and_keeps_untouched_keys() {
        let mut target = doc(json!({"title": "x", "technologies": ["a", "b"]}));
        merge_fields(&mut target, &doc(json!({"technologies": ["c"]})));
        assert_eq!(target["technologies"], json!(["c"]));
        assert_eq!(target["title"], json!("x"));
    }

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(DocumentId::generate(), DocumentId::generate());
    }
}
