use std::sync::Arc;

use clap::Parser;
use quiz_core::QuestionCatalog;
use services::{QuizFlow, StdRngSeed, ThreadRandomSeed};
use storage::repository::Storage;

mod config;
mod terminal;

use config::{Args, Command, normalize_sqlite_url, prepare_sqlite_file};

fn load_catalog(args: &Args) -> Result<QuestionCatalog, Box<dyn std::error::Error>> {
    match args.catalog_json()? {
        Some(raw) => Ok(QuestionCatalog::from_json(&raw)?),
        None => Ok(QuestionCatalog::standard()),
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let db_url = normalize_sqlite_url(&args.db_url);
    prepare_sqlite_file(&db_url)?;
    let catalog = Arc::new(load_catalog(&args)?);
    tracing::debug!(%db_url, questions = catalog.len(), "starting");

    let storage = Storage::sqlite(&db_url).await?;
    let mut flow = QuizFlow::open(&storage, catalog, &mut ThreadRandomSeed).await?;

    let mut stdout = std::io::stdout();
    match args.command() {
        Command::Take => {
            let mut stdin = tokio::io::BufReader::new(tokio::io::stdin());
            terminal::take(&mut flow, &mut stdin, &mut stdout, args.select_delay()).await?;
        }
        Command::Result => terminal::show_result(&flow, &mut stdout)?,
        Command::Stats => terminal::show_stats(&flow, &mut stdout)?,
        Command::Reset => {
            flow.restart().await;
            println!("Progress cleared.");
        }
        Command::Seed { seed } => {
            match seed {
                Some(value) => flow.tally_mut().reseed(&mut StdRngSeed::from_u64(value)).await?,
                None => flow.tally_mut().reseed(&mut ThreadRandomSeed).await?,
            }
            println!("Statistics reseeded: {} participants.", flow.tally().total_count());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
