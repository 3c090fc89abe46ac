//! Data access core for the portfolio site.
//!
//! Typed `projects` / `experiences` collections over a document store,
//! with filter/sort/limit query options and a retrieval state adapter for
//! presentation code.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod retrieval;
pub mod service;
pub mod store;

pub use clock::{Clock, StepClock, SystemClock};
pub use config::PortfolioConfig;
pub use logging::{
    default_log_level, init_from_config, init_logging, logging_status, LoggingError,
};
pub use model::experience::{
    Experience, ExperienceCreateInput, ExperiencePatch, ExperienceQueryOptions,
};
pub use model::options::{compile_query, QueryOptions};
pub use model::project::{
    Project, ProjectCategory, ProjectCreateInput, ProjectPatch, ProjectQueryOptions,
    ProjectStatus,
};
pub use model::{ValidationError, WorkItem};
pub use retrieval::{
    ByIdRetriever, FetchTicket, ListRetriever, RetrievalHook, RetrievalState, Retrieve,
};
pub use service::{
    sample_experience, sample_project, ExperienceService, ProjectService, ServiceError,
    ServiceResult, WorkItemService,
};
pub use store::{
    DocumentId, DocumentStore, MemoryDocumentStore, OrderDirection, Query, SqliteDocumentStore,
    StoreError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
