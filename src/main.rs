mod config;
mod db;
mod error;
mod export;
mod menu;
mod models;
mod reports;
mod repo;
mod run;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::{DateMode, Settings};

#[derive(Parser)]
#[command(
    name = "fintrack",
    version,
    about = "FinTrack - local personal finance tracker for expenses, subscriptions and budgets"
)]
struct Cli {
    /// Database file (default: fintrack.db in the data directory)
    #[arg(long, env = "FINTRACK_DB", global = true)]
    db: Option<PathBuf>,

    /// Settings file (default: settings.json in the config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override how dates and months are compared
    #[arg(long, value_enum, global = true)]
    date_mode: Option<DateMode>,

    /// Log every SQL statement to stderr
    #[arg(long, global = true)]
    echo_sql: bool,

    #[command(subcommand)]
    command: Option<run::Command>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings_path = match cli.config {
        Some(path) => path,
        None => config::default_settings_path()?,
    };
    let mut settings = Settings::load(&settings_path)
        .with_context(|| format!("Failed to load settings: {}", settings_path.display()))?;
    if let Some(mode) = cli.date_mode {
        settings.date_mode = mode;
    }
    settings.echo_sql |= cli.echo_sql;

    init_logging(settings.echo_sql);

    let db_path = config::resolve_db_path(cli.db.as_deref(), &settings)?;
    let mut db = db::Storage::open(&db_path)
        .with_context(|| format!("Failed to open database: {}", db_path.display()))?;
    db.set_echo_sql(settings.echo_sql);

    let paths = config::Paths {
        settings: settings_path,
        database: db_path,
    };
    let command = cli.command.unwrap_or(run::Command::Menu);
    let result = run::as_cli(command, &mut db, &settings, &paths);
    db.close().context("Failed to close database")?;
    result
}

fn init_logging(echo_sql: bool) {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if echo_sql {
        if let Ok(directive) = "fintrack::sql=debug".parse() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
