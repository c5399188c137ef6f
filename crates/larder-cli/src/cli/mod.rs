pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[clap(name = "larder", about = "Recipe box & meal planner")]
#[clap(version, author)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[clap(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List saved recipes
    #[clap(name = "recipes")]
    Recipes,

    /// Show the two-week meal planner
    #[clap(name = "plan")]
    Plan,

    /// Print the current dataset as a portable backup string
    #[clap(name = "export")]
    Export,

    /// Restore a dataset from a backup string or file
    #[clap(name = "import")]
    Import {
        /// Backup string, or path to a file containing one
        data: String,
    },

    /// Search recipes by title or ingredients
    #[clap(name = "search")]
    Search {
        /// Comma-separated terms, e.g. "chicken, rice"
        query: String,

        /// Also query the external recipe API
        #[clap(long)]
        remote: bool,
    },
}
