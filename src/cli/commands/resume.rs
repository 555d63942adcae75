use super::workout::{describe_pending, print_summary, record_saved, run_session};
use super::{open_store, signed_in};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::session::SessionController;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::ui::prompt::Prompt;

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Resume { end } = cmd else {
        return Ok(());
    };

    let store = open_store(cfg)?;
    let ctx = signed_in(&store).await?;

    let mut session = SessionController::new(&store, ctx).with_tick(cfg.tick());
    session.on_authenticated().await?;

    let Some(snapshot) = session.pending() else {
        info("No unfinished workout.");
        return Ok(());
    };
    info(describe_pending(snapshot));

    if *end {
        let workout = session.end_pending().await?;
        record_saved(&store, &workout);
        print_summary(&workout);
        return Ok(());
    }

    session.resume().await?;
    let mut prompt = Prompt::stdin();
    run_session(&mut session, &store, &mut prompt).await
}
