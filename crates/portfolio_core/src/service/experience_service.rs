//! Experience-specific queries on top of `WorkItemService`.

use super::work_item_service::{ServiceResult, WorkItemService};
use crate::clock::{Clock, SystemClock};
use crate::model::experience::{Experience, ExperienceCreateInput, ExperienceQueryOptions};
use crate::store::{DocumentStore, OrderDirection};

pub type ExperienceService<S, C = SystemClock> = WorkItemService<Experience, S, C>;

/// Cap applied to the featured experiences strip.
pub const FEATURED_EXPERIENCE_LIMIT: u32 = 5;

impl<S: DocumentStore, C: Clock> WorkItemService<Experience, S, C> {
    /// Up to five featured experiences, most recent first.
    pub fn featured_experiences(&self) -> ServiceResult<Vec<Experience>> {
        self.list(&ExperienceQueryOptions {
            featured: Some(true),
            limit: Some(FEATURED_EXPERIENCE_LIMIT),
            ..ExperienceQueryOptions::default()
        })
    }

    /// Positions still held (`current == true`).
    pub fn current_experiences(&self) -> ServiceResult<Vec<Experience>> {
        self.list(&ExperienceQueryOptions {
            current: Some(true),
            ..ExperienceQueryOptions::default()
        })
    }

    /// Every experience by `startDate` descending.
    pub fn all_experiences(&self) -> ServiceResult<Vec<Experience>> {
        self.list(&ExperienceQueryOptions {
            order_by: Some("startDate".to_string()),
            order_direction: Some(OrderDirection::Desc),
            ..ExperienceQueryOptions::default()
        })
    }
}

/// Demo record used to seed an empty collection.
pub fn sample_experience() -> ExperienceCreateInput {
    ExperienceCreateInput {
        period: "December 2024 - Aug 2025".to_string(),
        company: "Ausis Accommodation Services".to_string(),
        logo: "/images/experiences/ausis.png".to_string(),
        role: "Freelance Full Stack Software Engineer (Contractual)".to_string(),
        company_url: "https://www.airpaz.com/en/hotel/ausis-accommodation-services.5377238"
            .to_string(),
        description: vec![
            "Gathered business requirements, estimated tasks and implemented features for the \
             new website, automating manual work and supporting existing products."
                .to_string(),
        ],
        technologies: ["Python", "PHP", "Laravel", "Vue.js", "Mysql", "AWS"]
            .into_iter()
            .map(str::to_string)
            .collect(),
        // 2024-12-01 and 2025-08-31, UTC.
        start_date: 1_733_011_200_000,
        end_date: Some(1_756_598_400_000),
        current: false,
        featured: true,
    }
}
