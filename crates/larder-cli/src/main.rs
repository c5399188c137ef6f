mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Recipes => cli::commands::list_recipes(cli.json).await?,
        Commands::Plan => cli::commands::show_plan(cli.json).await?,
        Commands::Export => cli::commands::export_backup().await?,
        Commands::Import { data } => cli::commands::import_backup(data, cli.json).await?,
        Commands::Search { query, remote } => {
            cli::commands::search(query, *remote, cli.json).await?
        }
    }

    Ok(())
}
