//! Project-specific queries on top of `WorkItemService`.

use super::work_item_service::{ServiceResult, WorkItemService};
use crate::clock::{Clock, SystemClock};
use crate::model::project::{
    Project, ProjectCategory, ProjectCreateInput, ProjectQueryOptions, ProjectStatus,
};
use crate::store::{DocumentStore, OrderDirection};

pub type ProjectService<S, C = SystemClock> = WorkItemService<Project, S, C>;

impl<S: DocumentStore, C: Clock> WorkItemService<Project, S, C> {
    /// Featured projects by `sortOrder` ascending.
    pub fn featured_projects(&self) -> ServiceResult<Vec<Project>> {
        self.list(&ProjectQueryOptions {
            featured: Some(true),
            order_by: Some("sortOrder".to_string()),
            order_direction: Some(OrderDirection::Asc),
            ..ProjectQueryOptions::default()
        })
    }

    /// Projects in one category by `sortOrder` ascending.
    pub fn projects_by_category(&self, category: ProjectCategory) -> ServiceResult<Vec<Project>> {
        self.list(&ProjectQueryOptions {
            category: Some(category),
            order_by: Some("sortOrder".to_string()),
            order_direction: Some(OrderDirection::Asc),
            ..ProjectQueryOptions::default()
        })
    }
}

/// Demo record used to seed an empty collection.
pub fn sample_project() -> ProjectCreateInput {
    ProjectCreateInput {
        title: "Transcom Digital Mobile app".to_string(),
        description: "Online shopping platform for original electronic appliances, \
                      covering almost every kind of home electronics."
            .to_string(),
        thumbnail_file_name: "transcomdigital.jpg".to_string(),
        link: "https://transcomdigital.com".to_string(),
        category: ProjectCategory::Mobile,
        technologies: vec![
            "React Native".to_string(),
            "TypeScript".to_string(),
            "Firebase".to_string(),
        ],
        status: ProjectStatus::Completed,
        featured: true,
        sort_order: 1,
    }
}
