//! Store-level query model: equality filters, one ordering, optional limit.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};

static FIELD_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid field name regex"));

/// Sort direction for `OrderBy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl Display for OrderDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

/// Equality predicate on one top-level field.
///
/// Matching is type-strict: `true` does not match `1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: OrderDirection,
}

/// Query over one collection.
///
/// Filters combine with AND. Results are ordered by `order_by` (documents
/// lacking that field are excluded) and then by document id ascending.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<u32>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: OrderDirection) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Checks that every referenced field is a plain top-level name.
    pub fn validate(&self) -> Result<(), String> {
        let fields = self
            .filters
            .iter()
            .map(|filter| filter.field.as_str())
            .chain(self.order_by.iter().map(|order| order.field.as_str()));
        for field in fields {
            if !is_valid_field_name(field) {
                return Err(format!("unsupported field name `{field}`"));
            }
        }
        Ok(())
    }
}

pub fn is_valid_field_name(field: &str) -> bool {
    FIELD_NAME_RE.is_match(field)
}

#[cfg(test)]
mod tests {
    use super::{OrderDirection, Query};

    #[test]
    fn builder_collects_filters_in_order() {
        let query = Query::new()
            .filter("featured", true)
            .filter("status", "planned")
            .order_by("sortOrder", OrderDirection::Asc)
            .limit(3);
        assert_eq!(query.filters.len(), 2);
        assert_eq!(query.filters[0].field, "featured");
        assert_eq!(query.limit, Some(3));
        assert!(query.validate().is_ok());
    }

    #[test]
    fn validate_rejects_path_like_field_names() {
        let query = Query::new().filter("a.b", 1);
        assert!(query.validate().unwrap_err().contains("a.b"));

        let query = Query::new().order_by("x\"y", OrderDirection::Desc);
        assert!(query.validate().is_err());
    }

    #[test]
    fn direction_serializes_lowercase() {
        let text = serde_json::to_string(&OrderDirection::Desc).unwrap();
        assert_eq!(text, "\"desc\"");
    }
}
