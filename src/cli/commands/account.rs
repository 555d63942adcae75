use super::workout::{describe_pending, print_summary, record_saved, run_session};
use super::{audit, open_store, signed_in};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::auth::{AuthSession, ensure_user_document};
use crate::core::session::SessionController;
use crate::errors::AppResult;
use crate::store::SqliteStore;
use crate::ui::messages::{info, success, warning};
use crate::ui::prompt::{Prompt, ResumeChoice};

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let store = open_store(cfg)?;

    match cmd {
        Commands::Signup { email, password } => {
            let auth = AuthSession::new(&store);
            let ctx = auth.sign_up(email, password).await?;
            ensure_user_document(&store, &ctx).await?;
            audit(&store, "signup", ctx.user_id.as_str(), &format!("Account created for {}", ctx.email));
            success(format!("Account created. Signed in as {} (id {}).", ctx.email, ctx.user_id));
        }

        Commands::Signin { email, password } => {
            let auth = AuthSession::new(&store);
            let ctx = auth.sign_in(email, password).await?;
            success(format!("Signed in as {}.", ctx.email));

            let mut session = SessionController::new(&store, ctx).with_tick(cfg.tick());
            session.on_authenticated().await?;
            offer_resume(&mut session, &store).await?;
        }

        Commands::Signout => {
            let auth = AuthSession::new(&store);
            auth.restore().await?;
            if auth.current().is_none() {
                info("Not signed in.");
            } else {
                auth.sign_out().await?;
                success("Signed out.");
            }
        }

        Commands::Whoami => {
            let ctx = signed_in(&store).await?;
            println!("{} (id {})", ctx.email, ctx.user_id);
        }

        _ => {}
    }

    Ok(())
}

/// After sign-in: resume, end or keep an unfinished workout.
async fn offer_resume(
    session: &mut SessionController<'_, SqliteStore>,
    store: &SqliteStore,
) -> AppResult<()> {
    let Some(snapshot) = session.pending() else {
        return Ok(());
    };
    warning(describe_pending(snapshot));

    let mut prompt = Prompt::stdin();
    match prompt.resume_choice().await? {
        ResumeChoice::Resume => {
            session.resume().await?;
            run_session(session, store, &mut prompt).await?;
        }
        ResumeChoice::End => {
            let workout = session.end_pending().await?;
            record_saved(store, &workout);
            print_summary(&workout);
        }
        ResumeChoice::Later => {
            info("Kept for later. Run `repmax resume` when you are ready.");
        }
    }
    Ok(())
}
