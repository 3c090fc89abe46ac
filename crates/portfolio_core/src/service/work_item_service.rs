//! Generic Work Item data access service.
//!
//! # Invariants
//! - The service holds no mutable state; every call goes straight to the store.
//! - `create` stamps `createdAt == updatedAt` from one clock reading.
//! - `update` validates the merged state, re-stamps `updatedAt` only (never
//!   below the stored stamp) and returns the entity re-read from the store.
//! - Not-found is reported as `None` (reads) or `ServiceError::NotFound`
//!   (writes), never as a store fault.

use crate::clock::{Clock, SystemClock};
use crate::config::validate_collection_name;
use crate::logging::sanitize_message;
use crate::model::options::compile_query;
use crate::model::{
    decode_item, encode_fields, ValidationError, WorkItem, CREATED_AT_FIELD, UPDATED_AT_FIELD,
};
use crate::store::{merge_fields, DocumentId, DocumentStore, StoreError, StoredDocument};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use std::time::Instant;

const MAX_LOGGED_ERROR_CHARS: usize = 200;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure kinds surfaced to service callers.
#[derive(Debug)]
pub enum ServiceError {
    /// Transport, storage or data-shape failure below the service.
    Store(StoreError),
    /// Target document does not exist.
    NotFound { collection: String, id: DocumentId },
    /// Rejected input or query options.
    Validation(ValidationError),
}

impl ServiceError {
    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Store(_) => "store_fault",
            Self::NotFound { .. } => "not_found",
            Self::Validation(_) => "validation_fault",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::NotFound { collection, id } => write!(f, "{collection}/{id} not found"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound { collection, id } => Self::NotFound { collection, id },
            StoreError::InvalidQuery(message) => {
                Self::Validation(ValidationError::InvalidQuery(message))
            }
            other => Self::Store(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// CRUD and filtered listing over one collection of `T`.
///
/// The collection name is injected so that several logical collections
/// (or test fixtures) can share one store.
pub struct WorkItemService<T: WorkItem, S: DocumentStore, C: Clock = SystemClock> {
    store: S,
    collection: String,
    clock: C,
    _item: PhantomData<fn() -> T>,
}

impl<T: WorkItem, S: DocumentStore> WorkItemService<T, S> {
    /// Builds a service over `T::DEFAULT_COLLECTION`.
    pub fn new(store: S) -> Self {
        Self {
            store,
            collection: T::DEFAULT_COLLECTION.to_string(),
            clock: SystemClock::new(),
            _item: PhantomData,
        }
    }

    /// Builds a service over a configured collection name.
    pub fn with_collection(store: S, collection: impl Into<String>) -> ServiceResult<Self> {
        Self::with_clock(store, collection, SystemClock::new())
    }
}

impl<T: WorkItem, S: DocumentStore, C: Clock> WorkItemService<T, S, C> {
    /// Builds a service with an explicit timestamp source.
    pub fn with_clock(store: S, collection: impl Into<String>, clock: C) -> ServiceResult<Self> {
        let collection = collection.into();
        validate_collection_name(&collection)?;
        Ok(Self {
            store,
            collection,
            clock,
            _item: PhantomData,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Creates one item; the store assigns its id.
    pub fn create(&self, input: &T::CreateInput) -> ServiceResult<T> {
        let started_at = Instant::now();
        let result = self.create_inner(input);
        self.record("create", started_at, result)
    }

    /// Lists items matching every active filter, in the requested order.
    ///
    /// An empty result is not an error.
    pub fn list(&self, options: &T::QueryOptions) -> ServiceResult<Vec<T>> {
        let started_at = Instant::now();
        let result = self.list_inner(options);
        self.record("list", started_at, result)
    }

    /// Reads one item. `Ok(None)` means no document has this id.
    pub fn get_by_id(&self, id: &DocumentId) -> ServiceResult<Option<T>> {
        let started_at = Instant::now();
        let result = self.get_inner(id);
        self.record("get", started_at, result)
    }

    /// Merges `patch` into the stored item and returns the persisted state.
    ///
    /// Array fields in `patch` replace the stored arrays whole.
    pub fn update(&self, id: &DocumentId, patch: &T::Patch) -> ServiceResult<T> {
        let started_at = Instant::now();
        let result = self.update_inner(id, patch);
        self.record("update", started_at, result)
    }

    /// Deletes one item. Deleting an id that does not exist succeeds.
    pub fn delete(&self, id: &DocumentId) -> ServiceResult<()> {
        let started_at = Instant::now();
        let result: ServiceResult<bool> =
            self.store.delete(&self.collection, id).map_err(Into::into);
        if let Ok(existed) = &result {
            debug!(
                "event=work_item_delete module=service kind={} id={id} existed={existed}",
                T::KIND
            );
        }
        self.record("delete", started_at, result).map(|_| ())
    }

    /// Deletes every item in the collection and returns how many were removed.
    pub fn delete_all(&self) -> ServiceResult<usize> {
        let started_at = Instant::now();
        let result: ServiceResult<usize> =
            self.store.delete_all(&self.collection).map_err(Into::into);
        if let Ok(count) = &result {
            info!(
                "event=work_item_delete_all module=service kind={} collection={} count={count}",
                T::KIND,
                self.collection
            );
        }
        self.record("delete_all", started_at, result)
    }

    fn create_inner(&self, input: &T::CreateInput) -> ServiceResult<T> {
        T::validate_input(input)?;
        let mut fields = encode_fields(input)?;
        let now = self.clock.now_ms();
        fields.insert(CREATED_AT_FIELD.to_string(), now.into());
        fields.insert(UPDATED_AT_FIELD.to_string(), now.into());

        let id = self.store.insert(&self.collection, &fields)?;
        Ok(decode_item(StoredDocument { id, fields })?)
    }

    fn list_inner(&self, options: &T::QueryOptions) -> ServiceResult<Vec<T>> {
        let query = compile_query::<T>(options)?;
        self.store
            .query(&self.collection, &query)?
            .into_iter()
            .map(|document| decode_item(document).map_err(ServiceError::from))
            .collect()
    }

    fn get_inner(&self, id: &DocumentId) -> ServiceResult<Option<T>> {
        match self.store.get(&self.collection, id)? {
            Some(document) => Ok(Some(decode_item(document)?)),
            None => Ok(None),
        }
    }

    fn update_inner(&self, id: &DocumentId, patch: &T::Patch) -> ServiceResult<T> {
        T::validate_patch(patch)?;
        let mut changes = encode_fields(patch)?;
        changes.remove(CREATED_AT_FIELD);
        changes.remove(UPDATED_AT_FIELD);

        let mut merged = self
            .store
            .get(&self.collection, id)?
            .ok_or_else(|| self.not_found(id))?;
        merge_fields(&mut merged.fields, &changes);
        let current: T = decode_item(merged)?;
        T::validate_item(&current)?;

        // Stamps never move backwards, even when this process's wall clock
        // is behind the one that wrote the stored stamp.
        let stamp = self
            .clock
            .now_ms()
            .max(current.updated_at().saturating_add(1));
        changes.insert(UPDATED_AT_FIELD.to_string(), stamp.into());

        self.store.update(&self.collection, id, &changes)?;
        self.get_inner(id)?.ok_or_else(|| self.not_found(id))
    }

    fn not_found(&self, id: &DocumentId) -> ServiceError {
        ServiceError::NotFound {
            collection: self.collection.clone(),
            id: id.clone(),
        }
    }

    fn record<R>(
        &self,
        op: &'static str,
        started_at: Instant,
        result: ServiceResult<R>,
    ) -> ServiceResult<R> {
        let duration_ms = started_at.elapsed().as_millis();
        match &result {
            Ok(_) => debug!(
                "event=work_item_{op} module=service status=ok kind={} collection={} duration_ms={duration_ms}",
                T::KIND,
                self.collection
            ),
            Err(ServiceError::NotFound { id, .. }) => info!(
                "event=work_item_{op} module=service status=not_found kind={} collection={} id={id} duration_ms={duration_ms}",
                T::KIND,
                self.collection
            ),
            Err(err) => error!(
                "event=work_item_{op} module=service status=error kind={} collection={} duration_ms={duration_ms} error_code={} error={}",
                T::KIND,
                self.collection,
                err.code(),
                sanitize_message(&err.to_string(), MAX_LOGGED_ERROR_CHARS)
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::ServiceError;
    use crate::model::ValidationError;
    use crate::store::StoreError;

    #[test]
    fn store_not_found_stays_distinct_from_store_faults() {
        let err = ServiceError::from(StoreError::NotFound {
            collection: "projects".to_string(),
            id: "abc".into(),
        });
        assert!(err.is_not_found());
        assert_eq!(err.code(), "not_found");

        let err = ServiceError::from(StoreError::Unavailable("offline".to_string()));
        assert_eq!(err.code(), "store_fault");
    }

    #[test]
    fn invalid_query_maps_to_validation_fault() {
        let err = ServiceError::from(StoreError::InvalidQuery("bad".to_string()));
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::InvalidQuery(_))
        ));
    }
}
