//! Project records shown on the Projects page.
//!
//! Default ordering is `sortOrder` ascending.

use super::options::{push_filter, QueryOptions};
use super::{require_text, ValidationError, WorkItem};
use crate::store::{DocumentId, Filter, OrderDirection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    Mobile,
    Web,
    Desktop,
    Other,
}

impl ProjectCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Web => "web",
            Self::Desktop => "desktop",
            Self::Other => "other",
        }
    }
}

/// Project lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Completed,
    InProgress,
    Planned,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::InProgress => "in-progress",
            Self::Planned => "planned",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: DocumentId,
    pub title: String,
    pub description: String,
    pub thumbnail_file_name: String,
    pub link: String,
    pub category: ProjectCategory,
    /// Display order is insertion order.
    #[serde(default)]
    pub technologies: Vec<String>,
    pub status: ProjectStatus,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub sort_order: i64,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds, rewritten on every update.
    pub updated_at: i64,
}

/// Fields accepted by `create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCreateInput {
    pub title: String,
    pub description: String,
    pub thumbnail_file_name: String,
    pub link: String,
    pub category: ProjectCategory,
    pub technologies: Vec<String>,
    pub status: ProjectStatus,
    pub featured: bool,
    pub sort_order: i64,
}

/// Partial update. `technologies` replaces the stored list whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ProjectCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectQueryOptions {
    pub category: Option<ProjectCategory>,
    pub featured: Option<bool>,
    pub status: Option<ProjectStatus>,
    pub limit: Option<u32>,
    /// Defaults to `sortOrder`.
    pub order_by: Option<String>,
    /// Defaults to ascending.
    pub order_direction: Option<OrderDirection>,
}

impl QueryOptions for ProjectQueryOptions {
    fn filters(&self) -> Vec<Filter> {
        let mut filters = Vec::new();
        push_filter(&mut filters, "category", self.category.map(ProjectCategory::as_str));
        push_filter(&mut filters, "featured", self.featured);
        push_filter(&mut filters, "status", self.status.map(ProjectStatus::as_str));
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

impl WorkItem for Project {
    type CreateInput = ProjectCreateInput;
    type Patch = ProjectPatch;
    type QueryOptions = ProjectQueryOptions;

    const KIND: &'static str = "project";
    const DEFAULT_COLLECTION: &'static str = "projects";
    /// Every top-level scalar field; `technologies` is a list and not orderable.
    const ORDERABLE_FIELDS: &'static [&'static str] = &[
        "sortOrder",
        "title",
        "description",
        "thumbnailFileName",
        "link",
        "category",
        "status",
        "featured",
        "createdAt",
        "updatedAt",
    ];
    const DEFAULT_ORDER: (&'static str, OrderDirection) = ("sortOrder", OrderDirection::Asc);

    fn id(&self) -> &DocumentId {
        &self.id
    }

    fn created_at(&self) -> i64 {
        self.created_at
    }

    fn updated_at(&self) -> i64 {
        self.updated_at
    }

    fn validate_input(input: &ProjectCreateInput) -> Result<(), ValidationError> {
        require_text("title", &input.title)
    }

    fn validate_patch(patch: &ProjectPatch) -> Result<(), ValidationError> {
        match &patch.title {
            Some(title) => require_text("title", title),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Project, ProjectCategory, ProjectPatch, ProjectQueryOptions, ProjectStatus};
    use crate::model::options::compile_query;
    use crate::model::ValidationError;
    use crate::store::OrderDirection;
    use serde_json::json;

    #[test]
    fn status_uses_kebab_case_on_the_wire() {
        let value = serde_json::to_value(ProjectStatus::InProgress).unwrap();
        assert_eq!(value, json!("in-progress"));
        assert_eq!(ProjectStatus::InProgress.as_str(), "in-progress");
    }

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = ProjectPatch {
            featured: Some(false),
            ..ProjectPatch::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"featured": false}));
    }

    #[test]
    fn unset_options_compile_to_default_order_without_filters() {
        let query = compile_query::<Project>(&ProjectQueryOptions::default()).unwrap();
        assert!(query.filters.is_empty());
        let order = query.order_by.unwrap();
        assert_eq!(order.field, "sortOrder");
        assert_eq!(order.direction, OrderDirection::Asc);
        assert_eq!(query.limit, None);
    }

    #[test]
    fn featured_false_is_a_filter_not_an_absence() {
        let options = ProjectQueryOptions {
            featured: Some(false),
            category: Some(ProjectCategory::Web),
            ..ProjectQueryOptions::default()
        };
        let query = compile_query::<Project>(&options).unwrap();
        assert_eq!(query.filters.len(), 2);
        assert_eq!(query.filters[0].field, "category");
        assert_eq!(query.filters[0].value, json!("web"));
        assert_eq!(query.filters[1].value, json!(false));
    }

    #[test]
    fn unknown_order_field_and_zero_limit_are_rejected() {
        let options = ProjectQueryOptions {
            order_by: Some("startDate".to_string()),
            ..ProjectQueryOptions::default()
        };
        let err = compile_query::<Project>(&options).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedOrderField { ref field, .. } if field == "startDate"));

        let options = ProjectQueryOptions {
            limit: Some(0),
            ..ProjectQueryOptions::default()
        };
        assert_eq!(
            compile_query::<Project>(&options).unwrap_err(),
            ValidationError::InvalidLimit(0)
        );
    }
}
