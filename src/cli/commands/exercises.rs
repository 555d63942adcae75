use super::{open_store, signed_in};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::exercises;
use crate::errors::AppResult;
use crate::models::catalog::is_catalog;
use crate::utils::colors::{GREY, RESET};

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if !matches!(cmd, Commands::Exercises) {
        return Ok(());
    }

    let store = open_store(cfg)?;
    let ctx = signed_in(&store).await?;

    for name in exercises::available(&store, &ctx.user_id).await? {
        if is_catalog(&name) {
            println!("  {name}");
        } else {
            println!("  {name} {GREY}(custom){RESET}");
        }
    }
    Ok(())
}
