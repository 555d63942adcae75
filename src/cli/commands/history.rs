use super::feed::print_workout;
use super::{audit, open_store, signed_in};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::history;
use crate::errors::AppResult;
use crate::models::WorkoutId;
use crate::ui::messages::{info, success};
use crate::ui::prompt::ask_confirmation;

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let store = open_store(cfg)?;
    let ctx = signed_in(&store).await?;

    match cmd {
        Commands::History => {
            let workouts = history::list_own(&store, &ctx.user_id).await?;
            if workouts.is_empty() {
                info("No workouts yet. Start one with `repmax workout`.");
                return Ok(());
            }
            println!("🏋️  {} workout(s):\n", workouts.len());
            for w in &workouts {
                print_workout(&w.performed_at.format("%A").to_string(), w);
            }
        }

        Commands::Delete { id, yes } => {
            let workout_id = WorkoutId::from(id.trim());
            if !*yes && !ask_confirmation(&format!("Delete workout {workout_id}?"))? {
                info("Nothing deleted.");
                return Ok(());
            }
            history::delete(&store, &ctx.user_id, &workout_id).await?;
            audit(&store, "workout_deleted", workout_id.as_str(), "Workout deleted by its owner");
            success(format!("Workout {workout_id} deleted."));
        }

        _ => {}
    }

    Ok(())
}
