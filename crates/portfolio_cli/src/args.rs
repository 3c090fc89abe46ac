use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "portfolio")]
#[command(about = "Inspect and maintain portfolio content", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database file, overrides PORTFOLIO_DB_PATH
    #[arg(long, global = true)]
    pub db: Option<std::path::PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Kind {
    Projects,
    Experiences,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List items in a collection
    #[command(alias = "ls")]
    List {
        kind: Kind,

        #[command(flatten)]
        options: ListArgs,
    },

    /// Print one item by id
    Get { kind: Kind, id: String },

    /// Insert the built-in sample item
    CreateSample { kind: Kind },

    /// Mark an item featured or not
    SetFeatured {
        kind: Kind,
        id: String,
        #[arg(action = clap::ArgAction::Set)]
        featured: bool,
    },

    /// Delete one item by id
    #[command(alias = "rm")]
    Delete { kind: Kind, id: String },

    /// Delete every item in a collection
    DeleteAll {
        kind: Kind,

        /// Required confirmation
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Only featured (true) or non-featured (false) items
    #[arg(long)]
    pub featured: Option<bool>,

    /// Projects only: mobile, web, desktop or other
    #[arg(long)]
    pub category: Option<String>,

    /// Projects only: completed, in-progress or planned
    #[arg(long)]
    pub status: Option<String>,

    /// Experiences only: current positions (true) or past ones (false)
    #[arg(long)]
    pub current: Option<bool>,

    /// Field to order by
    #[arg(long)]
    pub order_by: Option<String>,

    /// asc or desc
    #[arg(long)]
    pub direction: Option<String>,

    /// Maximum number of items
    #[arg(long)]
    pub limit: Option<u32>,
}
