//! Query options shared by Work Item collections.
//!
//! Unset options never produce a predicate: `featured: None` lists every
//! item, `featured: Some(false)` lists only non-featured ones.

use super::{ValidationError, WorkItem};
use crate::store::{Filter, OrderDirection, Query};
use std::fmt::Debug;

/// Caller-supplied filter/sort/limit configuration for one collection.
///
/// `PartialEq` is the structural equality the retrieval hook uses to decide
/// whether a new options value needs a refetch.
pub trait QueryOptions: Clone + PartialEq + Default + Debug {
    /// Active equality filters, in declaration order.
    fn filters(&self) -> Vec<Filter>;
    fn limit(&self) -> Option<u32>;
    fn order_by(&self) -> Option<&str>;
    fn order_direction(&self) -> Option<OrderDirection>;
}

/// Compiles options into a store query, applying collection defaults.
///
/// # Errors
/// - `UnsupportedOrderField` when `order_by` is not orderable for `T`.
/// - `InvalidLimit` when `limit` is zero.
pub fn compile_query<T: WorkItem>(options: &T::QueryOptions) -> Result<Query, ValidationError> {
    let (default_field, default_direction) = T::DEFAULT_ORDER;
    let field = options.order_by().unwrap_or(default_field);
    if !T::ORDERABLE_FIELDS.contains(&field) {
        return Err(ValidationError::UnsupportedOrderField {
            field: field.to_string(),
            allowed: T::ORDERABLE_FIELDS,
        });
    }

    let mut query = Query {
        filters: options.filters(),
        ..Query::default()
    }
    .order_by(field, options.order_direction().unwrap_or(default_direction));

    match options.limit() {
        Some(0) => return Err(ValidationError::InvalidLimit(0)),
        Some(limit) => query = query.limit(limit),
        None => {}
    }

    Ok(query)
}

pub(crate) fn push_filter(
    filters: &mut Vec<Filter>,
    field: &str,
    value: Option<impl Into<serde_json::Value>>,
) {
    if let Some(value) = value {
        filters.push(Filter {
            field: field.to_string(),
            value: value.into(),
        });
    }
}
