//! repmax library root.
//! Exposes the CLI parser, the high-level run() function and the services
//! behind it (store, friend graph, feed, workout sessions).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod store;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use tracing_subscriber::{EnvFilter, fmt};

/// Lowest cost bcrypt accepts; only used with `--test`.
const TEST_PASSWORD_COST: u32 = 4;

/// Central command dispatcher
pub async fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli).await,
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::Signup { .. }
        | Commands::Signin { .. }
        | Commands::Signout
        | Commands::Whoami => commands::account::handle(&cli.command, cfg).await,
        Commands::Friends { .. } => commands::friends::handle(&cli.command, cfg).await,
        Commands::Feed => commands::feed::handle(&cli.command, cfg).await,
        Commands::History | Commands::Delete { .. } => {
            commands::history::handle(&cli.command, cfg).await
        }
        Commands::Exercises => commands::exercises::handle(&cli.command, cfg).await,
        Commands::Template { .. } => commands::template::handle(&cli.command, cfg).await,
        Commands::Workout { .. } => commands::workout::handle(&cli.command, cfg).await,
        Commands::Resume { .. } => commands::resume::handle(&cli.command, cfg).await,
        Commands::Export { .. } => commands::export::handle(&cli.command, cfg).await,
    }
}

/// Diagnostics go to stderr, filtered by `RUST_LOG`.
fn init_tracing() {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Entry point used by main.rs
pub async fn run() -> AppResult<()> {
    init_tracing();

    let cli = Cli::parse();

    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if cli.test {
        cfg.password_cost = TEST_PASSWORD_COST;
    }

    tracing::debug!(database = %cfg.database, test = cli.test, "configuration loaded");
    dispatch(&cli, &cfg).await
}
