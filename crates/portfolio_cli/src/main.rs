//! Admin entry point over the SQLite-backed document store.
//!
//! # Responsibility
//! - Map subcommands onto project/experience service calls.
//! - Print results as JSON on stdout; failures go to stderr with exit code 1.

use clap::Parser;
use log::info;
use portfolio_core::db::open_db;
use portfolio_core::{
    init_from_config, sample_experience, sample_project, DocumentId, ExperiencePatch,
    ExperienceQueryOptions, ExperienceService, LoggingError, OrderDirection, PortfolioConfig,
    ProjectPatch, ProjectQueryOptions, ProjectService, ServiceError, SqliteDocumentStore,
    StoreError, ValidationError,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::fmt;
use std::process::ExitCode;

mod args;
use args::{Cli, Commands, Kind, ListArgs};

#[derive(Debug)]
enum CliError {
    Config(ValidationError),
    Logging(LoggingError),
    Store(StoreError),
    Service(ServiceError),
    Usage(String),
    Output(serde_json::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::Logging(err) => write!(f, "logging setup failed: {err}"),
            Self::Store(err) => write!(f, "cannot open database: {err}"),
            Self::Service(err) => write!(f, "[{}] {err}", err.code()),
            Self::Usage(message) => write!(f, "{message}"),
            Self::Output(err) => write!(f, "cannot render output: {err}"),
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(value: ValidationError) -> Self {
        Self::Config(value)
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<StoreError> for CliError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ServiceError> for CliError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String, CliError> {
    let mut config = PortfolioConfig::from_env()?;
    if let Some(path) = cli.db {
        config.db_path = path;
    }
    init_from_config(&config)?;
    info!(
        "event=cli_start module=cli status=ok version={} db_path={}",
        portfolio_core::core_version(),
        config.db_path.display()
    );

    let conn = open_db(&config.db_path)?;
    let store = SqliteDocumentStore::new(&conn);
    let projects = ProjectService::with_collection(&store, config.projects_collection.as_str())?;
    let experiences =
        ExperienceService::with_collection(&store, config.experiences_collection.as_str())?;

    let value = match cli.command {
        Commands::List { kind, options } => match kind {
            Kind::Projects => json!(projects.list(&project_options(options)?)?),
            Kind::Experiences => json!(experiences.list(&experience_options(options)?)?),
        },
        Commands::Get { kind, id } => {
            let id = DocumentId::from(id);
            let found = match kind {
                Kind::Projects => projects.get_by_id(&id)?.map(|item| json!(item)),
                Kind::Experiences => experiences.get_by_id(&id)?.map(|item| json!(item)),
            };
            found.ok_or_else(|| CliError::Usage(format!("no item with id `{id}`")))?
        }
        Commands::CreateSample { kind } => match kind {
            Kind::Projects => json!(projects.create(&sample_project())?),
            Kind::Experiences => json!(experiences.create(&sample_experience())?),
        },
        Commands::SetFeatured { kind, id, featured } => {
            let id = DocumentId::from(id);
            match kind {
                Kind::Projects => json!(projects.update(
                    &id,
                    &ProjectPatch {
                        featured: Some(featured),
                        ..ProjectPatch::default()
                    }
                )?),
                Kind::Experiences => json!(experiences.update(
                    &id,
                    &ExperiencePatch {
                        featured: Some(featured),
                        ..ExperiencePatch::default()
                    }
                )?),
            }
        }
        Commands::Delete { kind, id } => {
            let id = DocumentId::from(id);
            match kind {
                Kind::Projects => projects.delete(&id)?,
                Kind::Experiences => experiences.delete(&id)?,
            }
            json!({ "deleted": id })
        }
        Commands::DeleteAll { kind, yes } => {
            if !yes {
                return Err(CliError::Usage(
                    "delete-all removes the whole collection; pass --yes to confirm".to_string(),
                ));
            }
            let removed = match kind {
                Kind::Projects => projects.delete_all()?,
                Kind::Experiences => experiences.delete_all()?,
            };
            json!({ "removed": removed })
        }
    };

    Ok(serde_json::to_string_pretty(&value)?)
}

fn project_options(args: ListArgs) -> Result<ProjectQueryOptions, CliError> {
    if args.current.is_some() {
        return Err(CliError::Usage("--current applies to experiences only".to_string()));
    }
    Ok(ProjectQueryOptions {
        category: args.category.map(|raw| parse_keyword(&raw, "category")).transpose()?,
        featured: args.featured,
        status: args.status.map(|raw| parse_keyword(&raw, "status")).transpose()?,
        limit: args.limit,
        order_by: args.order_by,
        order_direction: args.direction.map(|raw| parse_keyword(&raw, "direction")).transpose()?,
    })
}

fn experience_options(args: ListArgs) -> Result<ExperienceQueryOptions, CliError> {
    if args.category.is_some() || args.status.is_some() {
        return Err(CliError::Usage(
            "--category and --status apply to projects only".to_string(),
        ));
    }
    Ok(ExperienceQueryOptions {
        featured: args.featured,
        current: args.current,
        limit: args.limit,
        order_by: args.order_by,
        order_direction: args.direction.map(|raw| parse_keyword(&raw, "direction")).transpose()?,
    })
}

/// Parses a lowercase keyword through the type's serde names.
fn parse_keyword<V: DeserializeOwned>(raw: &str, flag: &str) -> Result<V, CliError> {
    serde_json::from_value(Value::String(raw.trim().to_ascii_lowercase()))
        .map_err(|_| CliError::Usage(format!("unsupported --{flag} value `{raw}`")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use portfolio_core::{ProjectCategory, ProjectStatus};

    #[test]
    fn parses_keywords_through_serde_names() {
        let status: ProjectStatus = parse_keyword("In-Progress", "status").unwrap();
        assert_eq!(status, ProjectStatus::InProgress);
        let direction: OrderDirection = parse_keyword("desc", "direction").unwrap();
        assert_eq!(direction, OrderDirection::Desc);
        assert!(parse_keyword::<ProjectCategory>("tablet", "category").is_err());
    }

    #[test]
    fn rejects_flags_from_the_other_collection() {
        let args = ListArgs {
            current: Some(true),
            ..ListArgs::default()
        };
        assert!(project_options(args).is_err());

        let args = ListArgs {
            category: Some("web".to_string()),
            ..ListArgs::default()
        };
        assert!(experience_options(args).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
