//! `quiz` command-line entry point.

mod db;
mod take;

use std::net::SocketAddr;
use std::process::ExitCode;

use anyhow::Context;
use api::{AppState, create_router};
use clap::{Parser, Subcommand};
use quiz_core::model::TestId;
use services::{Clock, SeedOutcome, seed_sample_catalog};
use storage::repository::Storage;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::db::{normalize_sqlite_url, prepare_sqlite_file};

/// Quiz platform: catalog API, sample data and a terminal quiz runner.
#[derive(Parser, Debug)]
#[command(name = "quiz")]
#[command(version, about, long_about = None)]
struct Cli {
    /// SQLite database URL or file path
    #[arg(
        long,
        global = true,
        env = "QUIZ_DB_URL",
        default_value = "sqlite://quiz.sqlite3",
        value_name = "URL"
    )]
    db: String,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the catalog REST API
    Serve {
        /// Address to listen on
        #[arg(long, env = "QUIZ_ADDR", default_value = "127.0.0.1:3000")]
        addr: SocketAddr,

        /// Install the sample catalog first if the database is empty
        #[arg(long)]
        seed: bool,
    },
    /// Install the sample catalog into an empty database
    Seed,
    /// Take a test in the terminal
    Take {
        #[arg(long, value_name = "ID")]
        test_id: TestId,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Open + migrate SQLite here so the library crates stay storage-agnostic.
    let db_url = normalize_sqlite_url(&cli.db);
    prepare_sqlite_file(&db_url)?;
    let storage = Storage::sqlite(&db_url)
        .await
        .with_context(|| format!("opening database {db_url}"))?;
    info!(db = %db_url, "database ready");

    let clock = Clock::system();
    match cli.command {
        Command::Serve { addr, seed } => {
            if seed {
                report_seed(seed_sample_catalog(&storage, clock).await?);
            }
            serve(&storage, clock, addr).await
        }
        Command::Seed => {
            report_seed(seed_sample_catalog(&storage, clock).await?);
            Ok(())
        }
        Command::Take { test_id } => take::run(&storage, clock, test_id).await,
    }
}

fn report_seed(outcome: SeedOutcome) {
    match outcome {
        SeedOutcome::Seeded(report) => println!(
            "Seeded {} categories, {} tests, {} questions.",
            report.categories, report.tests, report.questions
        ),
        SeedOutcome::Skipped => println!("Database already has categories; nothing seeded."),
    }
}

async fn serve(storage: &Storage, clock: Clock, addr: SocketAddr) -> anyhow::Result<()> {
    let router = create_router(AppState::from_storage(storage, clock));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "catalog API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}
