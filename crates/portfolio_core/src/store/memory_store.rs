//! In-process document store used as a test double and for ephemeral runs.
//!
//! Query semantics mirror `SqliteDocumentStore`: type-strict equality,
//! documents missing the order field are excluded, ties broken by id.
//! Booleans order as `0`/`1` among numbers, and arrays/objects order as
//! their compact JSON text among strings, as `json_extract` yields them.

use super::query::{Filter, Query};
use super::{
    merge_fields, Document, DocumentId, DocumentStore, OrderDirection, StoreError, StoreResult,
    StoredDocument,
};
use serde_json::Value;
use std::borrow::Cow;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BTreeMap;

type Collection = BTreeMap<DocumentId, Document>;

/// Single-threaded in-memory document store.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RefCell<BTreeMap<String, Collection>>,
    outage: RefCell<Option<String>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with `StoreError::Unavailable`
    /// until cleared with `None`.
    pub fn set_outage(&self, message: Option<&str>) {
        *self.outage.borrow_mut() = message.map(str::to_string);
    }

    /// Number of documents currently held in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .borrow()
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn check_available(&self) -> StoreResult<()> {
        match self.outage.borrow().as_ref() {
            Some(message) => Err(StoreError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn insert(&self, collection: &str, fields: &Document) -> StoreResult<DocumentId> {
        self.check_available()?;
        let id = DocumentId::generate();
        self.collections
            .borrow_mut()
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields.clone());
        Ok(id)
    }

    fn get(&self, collection: &str, id: &DocumentId) -> StoreResult<Option<StoredDocument>> {
        self.check_available()?;
        let collections = self.collections.borrow();
        Ok(collections
            .get(collection)
            .and_then(|documents| documents.get(id))
            .map(|fields| StoredDocument {
                id: id.clone(),
                fields: fields.clone(),
            }))
    }

    fn query(&self, collection: &str, query: &Query) -> StoreResult<Vec<StoredDocument>> {
        self.check_available()?;
        query.validate().map_err(StoreError::InvalidQuery)?;

        let collections = self.collections.borrow();
        let Some(documents) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut hits: Vec<StoredDocument> = documents
            .iter()
            .filter(|(_, fields)| {
                query
                    .filters
                    .iter()
                    .all(|filter| filter_matches(fields, filter))
            })
            .filter(|(_, fields)| {
                query
                    .order_by
                    .as_ref()
                    .map_or(true, |order| fields.contains_key(&order.field))
            })
            .map(|(id, fields)| StoredDocument {
                id: id.clone(),
                fields: fields.clone(),
            })
            .collect();

        // BTreeMap iteration already yields id order; a stable sort keeps it
        // as the tie-breaker.
        if let Some(order) = &query.order_by {
            hits.sort_by(|left, right| {
                let ordering =
                    compare_values(&left.fields[&order.field], &right.fields[&order.field]);
                match order.direction {
                    OrderDirection::Asc => ordering,
                    OrderDirection::Desc => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit {
            hits.truncate(limit as usize);
        }
        Ok(hits)
    }

    fn update(&self, collection: &str, id: &DocumentId, changes: &Document) -> StoreResult<()> {
        self.check_available()?;
        let mut collections = self.collections.borrow_mut();
        let fields = collections
            .get_mut(collection)
            .and_then(|documents| documents.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.clone(),
            })?;
        merge_fields(fields, changes);
        Ok(())
    }

    fn delete(&self, collection: &str, id: &DocumentId) -> StoreResult<bool> {
        self.check_available()?;
        Ok(self
            .collections
            .borrow_mut()
            .get_mut(collection)
            .and_then(|documents| documents.remove(id))
            .is_some())
    }

    fn delete_all(&self, collection: &str) -> StoreResult<usize> {
        self.check_available()?;
        Ok(self
            .collections
            .borrow_mut()
            .remove(collection)
            .map_or(0, |documents| documents.len()))
    }
}

fn filter_matches(fields: &Document, filter: &Filter) -> bool {
    let Some(actual) = fields.get(&filter.field) else {
        return false;
    };
    match (actual, &filter.value) {
        (Value::Number(left), Value::Number(right)) => match (left.as_i64(), right.as_i64()) {
            (Some(left), Some(right)) => left == right,
            _ => left.as_f64() == right.as_f64(),
        },
        (actual, expected) => actual == expected,
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) | Value::Number(_) => 1,
        Value::String(_) | Value::Array(_) | Value::Object(_) => 2,
    }
}

fn text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(text) => Cow::Borrowed(text),
        other => Cow::Owned(other.to_string()),
    }
}

fn numeric(value: &Value) -> f64 {
    match value {
        Value::Bool(flag) => f64::from(u8::from(*flag)),
        Value::Number(number) => number.as_f64().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

fn compare_values(left: &Value, right: &Value) -> Ordering {
    let rank = type_rank(left).cmp(&type_rank(right));
    if rank != Ordering::Equal {
        return rank;
    }
    match (left, right) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::String(_) | Value::Array(_) | Value::Object(_), _) => {
            text(left).cmp(&text(right))
        }
        _ => numeric(left)
            .partial_cmp(&numeric(right))
            .unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::{compare_values, MemoryDocumentStore};
    use crate::store::{DocumentStore, OrderDirection, Query, StoreError};
    use serde_json::json;
    use std::cmp::Ordering;

    fn fields(value: serde_json::Value) -> crate::store::Document {
        value.as_object().cloned().expect("object literal")
    }

    #[test]
    fn null_sorts_before_numbers_and_numbers_before_text() {
        assert_eq!(compare_values(&json!(null), &json!(0)), Ordering::Less);
        assert_eq!(compare_values(&json!(10), &json!("1")), Ordering::Less);
        assert_eq!(compare_values(&json!(2), &json!(10.5)), Ordering::Less);
    }

    #[test]
    fn arrays_sort_as_json_text_among_strings() {
        assert_eq!(compare_values(&json!(["b"]), &json!("a")), Ordering::Less);
        assert_eq!(compare_values(&json!("c"), &json!(["b"])), Ordering::Greater);
        assert_eq!(compare_values(&json!(["a", "b"]), &json!(["a"])), Ordering::Less);
    }

    #[test]
    fn outage_fails_every_call_until_cleared() {
        let store = MemoryDocumentStore::new();
        store.set_outage(Some("offline"));
        let err = store.insert("c", &fields(json!({}))).unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(message) if message == "offline"));

        store.set_outage(None);
        store.insert("c", &fields(json!({}))).unwrap();
        assert_eq!(store.len("c"), 1);
    }

    #[test]
    fn update_missing_document_is_not_found() {
        let store = MemoryDocumentStore::new();
        let err = store
            .update("c", &"missing".into(), &fields(json!({"a": 1})))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn limit_applies_after_ordering() {
        let store = MemoryDocumentStore::new();
        for rank in [3, 1, 2] {
            store.insert("c", &fields(json!({ "rank": rank }))).unwrap();
        }
        let hits = store
            .query(
                "c",
                &Query::new().order_by("rank", OrderDirection::Asc).limit(2),
            )
            .unwrap();
        let ranks: Vec<_> = hits.iter().map(|doc| doc.fields["rank"].clone()).collect();
        assert_eq!(ranks, vec![json!(1), json!(2)]);
    }
}
