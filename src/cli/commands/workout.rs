use super::{audit, open_store, signed_in};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::session::{SessionController, WorkoutSummary};
use crate::core::templates::TemplateBook;
use crate::errors::{AppError, AppResult};
use crate::models::snapshot::OngoingWorkoutSnapshot;
use crate::models::workout::{ExerciseEntry, Workout};
use crate::store::SqliteStore;
use crate::ui::messages::{error, header, info, success, warning};
use crate::ui::prompt::Prompt;
use crate::utils::colors::{RESET, color_for_set, colorize_raw};
use crate::utils::formatting::{bold, format_clock, format_weight};

const SESSION_HELP: &str = "\
Commands:
  add NAME                   add an exercise
  set N [WEIGHT] [REPS]      add a set to exercise N
  edit N S WEIGHT REPS       change set S of exercise N
  check N S                  tick / untick set S of exercise N
  rm N S                     delete set S of exercise N
  show                       show the workout so far
  template NAME              save the exercises as a template
  end                        finish and save the workout
  quit                       leave; the workout can be resumed later";

/// One line typed during a workout. Indices are zero-based here and
/// one-based on screen.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Add(String),
    Set {
        exercise: usize,
        weight: String,
        reps: String,
    },
    Edit {
        exercise: usize,
        set: usize,
        weight: String,
        reps: String,
    },
    Check {
        exercise: usize,
        set: usize,
    },
    Remove {
        exercise: usize,
        set: usize,
    },
    Show,
    Template(String),
    Help,
    End,
    Quit,
}

fn position(raw: Option<&str>, what: &str) -> AppResult<usize> {
    let raw = raw.ok_or_else(|| AppError::Validation(format!("missing {what} number")))?;
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(AppError::Validation(format!("'{raw}' is not a valid {what} number"))),
    }
}

impl SessionCommand {
    pub fn parse(line: &str) -> AppResult<Self> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let mut args = rest.split_whitespace();

        let cmd = match verb.to_ascii_lowercase().as_str() {
            "add" if !rest.is_empty() => Self::Add(rest.to_string()),
            "add" => return Err(AppError::Validation("usage: add NAME".into())),
            "set" => Self::Set {
                exercise: position(args.next(), "exercise")?,
                weight: args.next().unwrap_or_default().to_string(),
                reps: args.next().unwrap_or_default().to_string(),
            },
            "edit" => {
                let exercise = position(args.next(), "exercise")?;
                let set = position(args.next(), "set")?;
                Self::Edit {
                    exercise,
                    set,
                    weight: args.next().unwrap_or_default().to_string(),
                    reps: args.next().unwrap_or_default().to_string(),
                }
            }
            "check" => Self::Check {
                exercise: position(args.next(), "exercise")?,
                set: position(args.next(), "set")?,
            },
            "rm" => Self::Remove {
                exercise: position(args.next(), "exercise")?,
                set: position(args.next(), "set")?,
            },
            "show" => Self::Show,
            "template" if !rest.is_empty() => Self::Template(rest.to_string()),
            "template" => return Err(AppError::Validation("usage: template NAME".into())),
            "help" | "?" => Self::Help,
            "end" => Self::End,
            "quit" | "exit" => Self::Quit,
            other => {
                return Err(AppError::Validation(format!(
                    "unknown command '{other}' (type `help`)"
                )));
            }
        };
        Ok(cmd)
    }
}

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Workout { template } = cmd else {
        return Ok(());
    };

    let store = open_store(cfg)?;
    let ctx = signed_in(&store).await?;

    let mut session = SessionController::new(&store, ctx.clone()).with_tick(cfg.tick());
    session.on_authenticated().await?;

    let template = match template {
        Some(name) => Some(TemplateBook::new(&store, &ctx.user_id).find(name).await?),
        None => None,
    };

    session.start(template.as_ref()).await?;
    match &template {
        Some(t) => success(format!("Workout started from template '{}'.", t.name)),
        None => success("Workout started."),
    }

    let mut prompt = Prompt::stdin();
    run_session(&mut session, &store, &mut prompt).await
}

/// Interactive loop over an active session. Returns when the workout is
/// saved or left for later.
pub(crate) async fn run_session(
    session: &mut SessionController<'_, SqliteStore>,
    store: &SqliteStore,
    prompt: &mut Prompt,
) -> AppResult<()> {
    println!("{SESSION_HELP}\n");
    if let Some(exercises) = session.exercises() {
        print_exercises(exercises);
    }

    loop {
        let clock = format_clock(session.elapsed().unwrap_or_default());
        let Some(line) = prompt.read_line(&format!("[{clock}] > ")).await? else {
            println!();
            return leave(session).await;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match SessionCommand::parse(&line) {
            Ok(c) => c,
            Err(e) => {
                error(e);
                continue;
            }
        };

        let outcome = match command {
            SessionCommand::Add(name) => session.add_exercise(&name).await,
            SessionCommand::Set {
                exercise,
                weight,
                reps,
            } => session.add_set(exercise, &weight, &reps).await,
            SessionCommand::Edit {
                exercise,
                set,
                weight,
                reps,
            } => session.update_set(exercise, set, &weight, &reps).await,
            SessionCommand::Check { exercise, set } => session.toggle_set(exercise, set).await,
            SessionCommand::Remove { exercise, set } => session.delete_set(exercise, set).await,
            SessionCommand::Show => {
                if let Err(e) = session.checkpoint().await {
                    warning(format!("Could not save the clock: {e}"));
                }
                if let Some(exercises) = session.exercises() {
                    print_exercises(exercises);
                }
                continue;
            }
            SessionCommand::Template(name) => {
                save_template(session, store, &name).await;
                continue;
            }
            SessionCommand::Help => {
                println!("{SESSION_HELP}");
                continue;
            }
            SessionCommand::Quit => return leave(session).await,
            SessionCommand::End => match session.end().await {
                Ok(workout) => {
                    record_saved(store, &workout);
                    print_summary(&workout);
                    return Ok(());
                }
                Err(e) if session.is_active() => {
                    error(e);
                    warning("The workout is still open: try `end` again, or `quit` to keep it for later.");
                    continue;
                }
                Err(e) => return Err(e),
            },
        };

        match outcome {
            Ok(()) => {
                if let Some(exercises) = session.exercises() {
                    print_exercises(exercises);
                }
            }
            Err(e) => error(e),
        }
    }
}

async fn leave(session: &mut SessionController<'_, SqliteStore>) -> AppResult<()> {
    session.suspend().await?;
    info("Workout kept for later. Run `repmax resume` to continue it.");
    Ok(())
}

async fn save_template(
    session: &SessionController<'_, SqliteStore>,
    store: &SqliteStore,
    name: &str,
) {
    let names: Vec<String> = session
        .exercises()
        .unwrap_or_default()
        .iter()
        .map(|e| e.name.clone())
        .collect();

    match TemplateBook::new(store, &session.context().user_id)
        .create(name, &names)
        .await
    {
        Ok(t) => {
            audit(store, "template_saved", t.id.as_str(), &format!("Template '{}' saved", t.name));
            success(format!("Template '{}' saved ({} exercises).", t.name, t.exercises.len()));
        }
        Err(e) => error(e),
    }
}

pub(crate) fn record_saved(store: &SqliteStore, workout: &Workout) {
    audit(
        store,
        "workout_saved",
        workout.id.as_str(),
        &format!(
            "Workout saved: {} exercises, {} sets, {}s",
            workout.exercises.len(),
            workout.set_count(),
            workout.duration
        ),
    );
}

pub(crate) fn print_exercises(exercises: &[ExerciseEntry]) {
    if exercises.is_empty() {
        println!("  (no exercises yet: `add NAME`)");
        return;
    }
    for (i, ex) in exercises.iter().enumerate() {
        println!("{}. {}", i + 1, bold(&ex.name));
        for (j, set) in ex.sets.iter().enumerate() {
            let mark = if set.completed { "✔" } else { "·" };
            println!(
                "   {}{}{} Set {}: {} lbs x {} reps",
                color_for_set(set.completed),
                mark,
                RESET,
                j + 1,
                colorize_raw(&set.weight, "0"),
                colorize_raw(&set.reps, "0"),
            );
        }
    }
}

pub(crate) fn describe_pending(snapshot: &OngoingWorkoutSnapshot) -> String {
    format!(
        "Unfinished workout: {} exercise(s), {} set(s), {} elapsed",
        snapshot.exercises.len(),
        snapshot.set_count(),
        format_clock(snapshot.elapsed_time)
    )
}

pub(crate) fn print_summary(workout: &Workout) {
    let summary = WorkoutSummary::of(workout);
    header("Workout Complete!");
    println!("Duration:  {}", summary.duration);
    println!("Exercises: {}", summary.exercise_count);
    println!("Volume:    {} lbs", format_weight(workout.volume()));
    for line in &summary.lines {
        println!("  {line}");
    }
    success(format!("Workout saved ({}).", workout.id));
}
