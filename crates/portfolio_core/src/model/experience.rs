//! Work experience records shown on the Experience page.
//!
//! Default ordering is `startDate` descending (most recent first). An
//! experience with `current == true` usually has no `end_date`.

use super::options::{push_filter, QueryOptions};
use super::{require_text, ValidationError, WorkItem};
use crate::store::{DocumentId, Filter, OrderDirection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: DocumentId,
    /// Human-readable period label, e.g. `December 2024 - Aug 2025`.
    pub period: String,
    pub company: String,
    pub logo: String,
    pub role: String,
    pub company_url: String,
    /// One paragraph per entry.
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    /// Unix epoch milliseconds.
    pub start_date: i64,
    #[serde(default)]
    pub end_date: Option<i64>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub featured: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceCreateInput {
    pub period: String,
    pub company: String,
    pub logo: String,
    pub role: String,
    pub company_url: String,
    pub description: Vec<String>,
    pub technologies: Vec<String>,
    pub start_date: i64,
    pub end_date: Option<i64>,
    pub current: bool,
    pub featured: bool,
}

/// Partial update.
///
/// `end_date: Some(None)` clears a stored end date; `None` leaves it alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperiencePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExperienceQueryOptions {
    pub featured: Option<bool>,
    pub current: Option<bool>,
    pub limit: Option<u32>,
    /// Defaults to `startDate`.
    pub order_by: Option<String>,
    /// Defaults to descending.
    pub order_direction: Option<OrderDirection>,
}

impl QueryOptions for ExperienceQueryOptions {
    fn filters(&self) -> Vec<Filter> {
        let mut filters = Vec::new();
        push_filter(&mut filters, "featured", self.featured);
        push_filter(&mut filters, "current", self.current);
        filters
    }

    fn limit(&self) -> Option<u32> {
        self.limit
    }

    fn order_by(&self) -> Option<&str> {
        self.order_by.as_deref()
    }

    fn order_direction(&self) -> Option<OrderDirection> {
        self.order_direction
    }
}

impl WorkItem for Experience {
    type CreateInput = ExperienceCreateInput;
    type Patch = ExperiencePatch;
    type QueryOptions = ExperienceQueryOptions;

    const KIND: &'static str = "experience";
    const DEFAULT_COLLECTION: &'static str = "experiences";
    /// Every top-level scalar field; `description` and `technologies` are lists.
    const ORDERABLE_FIELDS: &'static [&'static str] = &[
        "startDate",
        "endDate",
        "period",
        "company",
        "logo",
        "role",
        "companyUrl",
        "current",
        "featured",
        "createdAt",
        "updatedAt",
    ];
    const DEFAULT_ORDER: (&'static str, OrderDirection) = ("startDate", OrderDirection::Desc);

    fn id(&self) -> &DocumentId {
        &self.id
    }

    fn created_at(&self) -> i64 {
        self.created_at
    }

    fn updated_at(&self) -> i64 {
        self.updated_at
    }

    fn validate_input(input: &ExperienceCreateInput) -> Result<(), ValidationError> {
        require_text("role", &input.role)?;
        require_text("company", &input.company)?;
        check_date_range(input.start_date, input.end_date)
    }

    fn validate_patch(patch: &ExperiencePatch) -> Result<(), ValidationError> {
        if let Some(role) = &patch.role {
            require_text("role", role)?;
        }
        match &patch.company {
            Some(company) => require_text("company", company),
            None => Ok(()),
        }
    }

    fn validate_item(item: &Experience) -> Result<(), ValidationError> {
        check_date_range(item.start_date, item.end_date)
    }
}

fn check_date_range(start: i64, end: Option<i64>) -> Result<(), ValidationError> {
    match end {
        Some(end) if end < start => Err(ValidationError::DateRange { start, end }),
        _ => Ok(()),
    }
}
