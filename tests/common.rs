#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, Utc};
use repmax::models::UserId;
use repmax::models::user::SessionContext;
use repmax::models::workout::{Exercise, WorkoutDoc, WorkoutSet};
use repmax::models::WorkoutId;
use repmax::store::DocumentStore;
use std::env;
use std::fs;
use std::path::PathBuf;

pub const PASSWORD: &str = "hunter22";

pub fn rpm() -> Command {
    cargo_bin_cmd!("repmax")
}

/// `repmax --db <db> --test`
pub fn rpm_db(db_path: &str) -> Command {
    let mut cmd = rpm();
    cmd.args(["--db", db_path, "--test"]);
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_repmax.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_repmax_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub fn init(db_path: &str) {
    rpm_db(db_path).arg("init").assert().success();
}

/// Create an account; it becomes the signed-in one.
pub fn signup(db_path: &str, email: &str) {
    rpm_db(db_path)
        .args(["signup", "--email", email, "--password", PASSWORD])
        .assert()
        .success();
}

/// Switch the signed-in account (no unfinished workout expected).
pub fn signin(db_path: &str, email: &str) {
    rpm_db(db_path)
        .args(["signin", "--email", email, "--password", PASSWORD])
        .write_stdin("")
        .assert()
        .success();
}

/// Run an interactive workout fed with `lines`; returns stdout.
pub fn workout(db_path: &str, lines: &str) -> String {
    let out = rpm_db(db_path)
        .arg("workout")
        .write_stdin(lines)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8_lossy(&out).to_string()
}

/// The id printed in "Workout saved (<id>)."
pub fn saved_workout_id(stdout: &str) -> String {
    let start = stdout
        .find("Workout saved (")
        .map(|i| i + "Workout saved (".len())
        .expect("no saved workout in output");
    let end = stdout[start..].find(')').expect("unterminated workout id");
    stdout[start..start + end].to_string()
}

// ---------------------------------------------------------------------------
// library-level helpers
// ---------------------------------------------------------------------------

/// A user document the way the identity provider would create it.
pub async fn new_user<S: DocumentStore>(store: &S, email: &str) -> SessionContext {
    let ctx = SessionContext {
        user_id: UserId::generate(),
        email: email.to_string(),
    };
    store
        .ensure_user(&ctx.user_id, &ctx.email)
        .await
        .expect("ensure user");
    ctx
}

pub fn workout_doc(
    owner: &SessionContext,
    timestamp: Option<DateTime<Utc>>,
    date: &str,
) -> WorkoutDoc {
    WorkoutDoc {
        id: WorkoutId::generate(),
        user_id: owner.user_id.clone(),
        user_email: owner.email.clone(),
        exercises: vec![Exercise {
            name: "Squat".into(),
            sets: vec![WorkoutSet {
                weight: 135.0,
                reps: 5,
            }],
        }],
        duration: 600,
        timestamp,
        date: date.to_string(),
    }
}

pub fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .expect("valid instant")
        .with_timezone(&Utc)
}
