//! Portfolio domain model.
//!
//! # Responsibility
//! - Define the Work Item shape shared by the `projects` and `experiences`
//!   collections.
//! - Map between typed entities and stored documents.
//!
//! # Invariants
//! - `id` is assigned by the store and carried outside the stored body.
//! - `created_at <= updated_at`; `created_at` is written once at creation.
//! - `technologies` keeps insertion order end-to-end.

use crate::store::{Document, DocumentId, OrderDirection, StoreError, StoreResult, StoredDocument};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

pub mod experience;
pub mod options;
pub mod project;

pub const ID_FIELD: &str = "id";
pub const CREATED_AT_FIELD: &str = "createdAt";
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// Validation failure for entity input or query options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty after trim.
    BlankField(&'static str),
    /// `endDate` is earlier than `startDate`.
    DateRange { start: i64, end: i64 },
    /// `orderBy` names a field the collection does not order by.
    UnsupportedOrderField {
        field: String,
        allowed: &'static [&'static str],
    },
    /// `limit` must be a positive integer.
    InvalidLimit(u32),
    /// Collection name is not a plain identifier.
    InvalidCollectionName(String),
    /// Query references a field the store cannot address.
    InvalidQuery(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "`{field}` must not be blank"),
            Self::DateRange { start, end } => {
                write!(f, "endDate ({end}) must not be earlier than startDate ({start})")
            }
            Self::UnsupportedOrderField { field, allowed } => write!(
                f,
                "unsupported orderBy field `{field}`; expected one of {}",
                allowed.join("|")
            ),
            Self::InvalidLimit(limit) => {
                write!(f, "limit must be a positive integer, got {limit}")
            }
            Self::InvalidCollectionName(name) => write!(f, "invalid collection name `{name}`"),
            Self::InvalidQuery(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ValidationError {}

/// Common contract for entities stored in one flat collection.
pub trait WorkItem: Serialize + DeserializeOwned + Clone + Debug {
    /// Entity fields minus id and timestamps.
    type CreateInput: Serialize + Debug;
    /// Partial field set; only present fields are written.
    type Patch: Serialize + Debug;
    /// Collection-specific filter/sort/limit options.
    type QueryOptions: options::QueryOptions;

    /// Short label used in log events.
    const KIND: &'static str;
    /// Collection name used when none is configured.
    const DEFAULT_COLLECTION: &'static str;
    /// Fields accepted as `orderBy`.
    const ORDERABLE_FIELDS: &'static [&'static str];
    /// Ordering applied when options leave it unset.
    const DEFAULT_ORDER: (&'static str, OrderDirection);

    fn id(&self) -> &DocumentId;
    fn created_at(&self) -> i64;
    fn updated_at(&self) -> i64;

    fn validate_input(input: &Self::CreateInput) -> Result<(), ValidationError>;
    fn validate_patch(patch: &Self::Patch) -> Result<(), ValidationError>;

    /// Cross-field rules checked on the merged state before an update is
    /// written.
    fn validate_item(_item: &Self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Serializes a create input or patch into a document body.
pub(crate) fn encode_fields<V: Serialize>(value: &V) -> StoreResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(mut fields) => {
            fields.remove(ID_FIELD);
            Ok(fields)
        }
        other => Err(StoreError::InvalidData(format!(
            "expected a field map, got `{other}`"
        ))),
    }
}

/// Maps a stored document to its typed entity.
pub(crate) fn decode_item<T: WorkItem>(document: StoredDocument) -> StoreResult<T> {
    let StoredDocument { id, mut fields } = document;
    fields.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    serde_json::from_value(Value::Object(fields)).map_err(|err| {
        StoreError::InvalidData(format!("{} document `{id}`: {err}", T::KIND))
    })
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}
