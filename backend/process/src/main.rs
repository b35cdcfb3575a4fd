use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use process::models::DEFAULT_SHEET_PATH;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replace all nootropics with the bundled dataset
    Seed,

    /// Replace all nootropics with the rows of a spreadsheet CSV export
    Import {
        #[arg(default_value = DEFAULT_SHEET_PATH)]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    server::init_tracing();

    let args = Args::parse();
    let repository = process::connect().await?;

    match args.command {
        Command::Seed => process::seed_nootropics(&repository).await?,
        Command::Import { path } => process::import_nootropics(&repository, &path).await?,
    };

    Ok(())
}
