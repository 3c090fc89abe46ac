//! Process configuration for the portfolio store.
//!
//! # Responsibility
//! - Resolve database location, collection names and logging settings from
//!   environment variables, falling back to defaults.
//!
//! # Invariants
//! - Blank variables are treated as unset.
//! - Collection names are validated before any service is built.

use crate::logging::default_log_level;
use crate::model::experience::Experience;
use crate::model::project::Project;
use crate::model::{ValidationError, WorkItem};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "PORTFOLIO_DB_PATH";
pub const PROJECTS_COLLECTION_ENV: &str = "PORTFOLIO_PROJECTS_COLLECTION";
pub const EXPERIENCES_COLLECTION_ENV: &str = "PORTFOLIO_EXPERIENCES_COLLECTION";
pub const LOG_LEVEL_ENV: &str = "PORTFOLIO_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "PORTFOLIO_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "portfolio.sqlite3";

static COLLECTION_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_-]{0,63}$").expect("valid collection name regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioConfig {
    pub db_path: PathBuf,
    pub projects_collection: String,
    pub experiences_collection: String,
    pub log_level: String,
    /// Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            projects_collection: Project::DEFAULT_COLLECTION.to_string(),
            experiences_collection: Experience::DEFAULT_COLLECTION.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl PortfolioConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ValidationError> {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(name) = read(PROJECTS_COLLECTION_ENV) {
            config.projects_collection = name;
        }
        if let Some(name) = read(EXPERIENCES_COLLECTION_ENV) {
            config.experiences_collection = name;
        }
        if let Some(level) = read(LOG_LEVEL_ENV) {
            config.log_level = level;
        }
        config.log_dir = read(LOG_DIR_ENV).map(PathBuf::from);

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_collection_name(&self.projects_collection)?;
        validate_collection_name(&self.experiences_collection)
    }
}

pub fn validate_collection_name(name: &str) -> Result<(), ValidationError> {
    if COLLECTION_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(ValidationError::InvalidCollectionName(name.to_string()))
    }
}
