use super::audit;
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::errors::AppResult;
use crate::store::SqliteStore;
use crate::ui::messages::success;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the SQLite database with all pending migrations
pub async fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;

    println!("⚙️  Initializing repmax…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Database   : {}", cfg.database);

    let store = SqliteStore::open(&cfg.database)?;
    success(format!("Database initialized at {}", cfg.database));

    audit(
        &store,
        "init",
        "database",
        &format!("Database initialized at {}", cfg.database),
    );

    println!("🎉 repmax initialization completed!");
    Ok(())
}
