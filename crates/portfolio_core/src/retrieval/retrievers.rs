//! Result-shape adapters between services and `RetrievalHook`.

use crate::clock::Clock;
use crate::model::WorkItem;
use crate::service::{ServiceResult, WorkItemService};
use crate::store::{DocumentId, DocumentStore};
use std::fmt::Debug;

/// One retrievable value keyed by an input.
///
/// `Ok(None)` is a legitimate "no data" answer (e.g. unknown id), distinct
/// from an error.
pub trait Retrieve {
    type Input: Clone + PartialEq + Debug;
    type Output: Clone;

    fn retrieve(&self, input: &Self::Input) -> ServiceResult<Option<Self::Output>>;
}

impl<R: Retrieve + ?Sized> Retrieve for &R {
    type Input = R::Input;
    type Output = R::Output;

    fn retrieve(&self, input: &Self::Input) -> ServiceResult<Option<Self::Output>> {
        (**self).retrieve(input)
    }
}

/// Lists a collection with query options as input.
pub struct ListRetriever<'s, T: WorkItem, S: DocumentStore, C: Clock> {
    service: &'s WorkItemService<T, S, C>,
}

impl<T: WorkItem, S: DocumentStore, C: Clock> Retrieve for ListRetriever<'_, T, S, C> {
    type Input = T::QueryOptions;
    type Output = Vec<T>;

    fn retrieve(&self, input: &T::QueryOptions) -> ServiceResult<Option<Vec<T>>> {
        self.service.list(input).map(Some)
    }
}

/// Reads one item with an optional id as input.
///
/// A `None` id resolves to "no data" without touching the store.
pub struct ByIdRetriever<'s, T: WorkItem, S: DocumentStore, C: Clock> {
    service: &'s WorkItemService<T, S, C>,
}

impl<T: WorkItem, S: DocumentStore, C: Clock> Retrieve for ByIdRetriever<'_, T, S, C> {
    type Input = Option<DocumentId>;
    type Output = T;

    fn retrieve(&self, input: &Option<DocumentId>) -> ServiceResult<Option<T>> {
        let Some(id) = input else {
            return Ok(None);
        };
        match self.service.get_by_id(id) {
            Err(err) if err.is_not_found() => Ok(None),
            other => other,
        }
    }
}

impl<T: WorkItem, S: DocumentStore, C: Clock> WorkItemService<T, S, C> {
    pub fn list_retriever(&self) -> ListRetriever<'_, T, S, C> {
        ListRetriever { service: self }
    }

    pub fn by_id_retriever(&self) -> ByIdRetriever<'_, T, S, C> {
        ByIdRetriever { service: self }
    }
}
