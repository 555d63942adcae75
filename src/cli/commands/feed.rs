use super::{open_store, signed_in};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::feed::FeedResolver;
use crate::errors::AppResult;
use crate::models::workout::Workout;
use crate::ui::messages::info;
use crate::utils::colors::{CYAN, GREY, RESET};
use crate::utils::date::local_datetime;
use crate::utils::formatting::{bold, format_duration, format_set};

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if !matches!(cmd, Commands::Feed) {
        return Ok(());
    }

    let store = open_store(cfg)?;
    let ctx = signed_in(&store).await?;

    let workouts = FeedResolver::new(&store)
        .with_window(cfg.feed_window)
        .visible_workouts(&ctx.user_id)
        .await?;

    if workouts.is_empty() {
        info("Nothing in your feed yet.");
        return Ok(());
    }

    for w in &workouts {
        let who = if w.user_id == ctx.user_id {
            "You".to_string()
        } else {
            w.user_email.clone()
        };
        print_workout(&who, w);
    }
    Ok(())
}

/// Feed and history share the same card layout.
pub(crate) fn print_workout(who: &str, w: &Workout) {
    println!(
        "{CYAN}{}{RESET}  {}  {GREY}{} · {}{RESET}",
        bold(who),
        local_datetime(&w.performed_at),
        format_duration(w.duration),
        w.id
    );
    for ex in &w.exercises {
        println!("  {}", ex.name);
        for (i, set) in ex.sets.iter().enumerate() {
            println!("    {}", format_set(i, set.weight, set.reps));
        }
    }
    println!();
}
