//! Data access services, one instance per collection.
//!
//! # Responsibility
//! - Expose create/list/get/update/delete over typed Work Items.
//! - Convert store failures into the three-kind `ServiceError` taxonomy.
//! - Keep presentation callers away from the store client.

pub mod experience_service;
pub mod project_service;
pub mod work_item_service;

pub use experience_service::{sample_experience, ExperienceService, FEATURED_EXPERIENCE_LIMIT};
pub use project_service::{sample_project, ProjectService};
pub use work_item_service::{ServiceError, ServiceResult, WorkItemService};
