use super::{audit, open_store, signed_in};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::export::ExportLogic;
use crate::core::history;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use std::path::Path;

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Export {
        format,
        file,
        force,
    } = cmd
    else {
        return Ok(());
    };

    let path = Path::new(file);
    if !path.is_absolute() {
        return Err(AppError::Export(format!(
            "Output file path must be absolute: {file}"
        )));
    }

    let store = open_store(cfg)?;
    let ctx = signed_in(&store).await?;
    let workouts = history::list_own(&store, &ctx.user_id).await?;
    if workouts.is_empty() {
        warning("No workouts found. Nothing to export.");
        return Ok(());
    }

    let written = ExportLogic::export(&workouts, *format, path, *force)?;
    audit(
        &store,
        "export",
        format.as_str(),
        &format!("Exported {written} record(s) to {}", path.display()),
    );
    success(format!("Exported {written} record(s) to {}", path.display()));
    Ok(())
}
